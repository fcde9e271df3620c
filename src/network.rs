use std::fs::File;
use std::io::Write;

use log::debug;

use rand::{thread_rng, Rng};

use serde::{Deserialize, Serialize};

use crate::err::NetworkError;
use crate::layer::Layer;
use crate::neuron::Neuron;
use crate::train_params::TrainParams;
use crate::util::{Float, NeuronHandle};

/// Multilayer perceptron network. It owns an ordered sequence of hidden
/// layers plus one output layer and drives forward propagation and the
/// backpropagation training step.
///
/// The ownership graph is exclusively top-down (network, layers, neurons),
/// external observers only ever get [NeuronHandle]s that expire together
/// with the network. Layer 0 sizes its factor counts from the raw input
/// vector, every later layer from the neuron count of the layer before it.
pub struct Network {
    inputs: Vec<Float>,
    hidden_layers: Vec<Layer>,
    output_layer: Layer,
    outputs: Vec<Float>,
    train_params: TrainParams,
}

/// Topology and training configuration, kept apart from trained weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub hidden_layers: usize,
    pub layer_size: usize,
    pub output_size: usize,
    pub train_params: TrainParams,
}

impl Default for Network {
    fn default() -> Self {
        Network::new(1, 1, 1)
    }
}

impl Network {
    /// Allocates `hidden_layers` layers of `layer_size` sigmoid neurons
    /// each plus one output layer of `output_size` neurons, then reshapes
    /// every layer to match its upstream size.
    pub fn new(hidden_layers: usize, layer_size: usize, output_size: usize) -> Self {
        let mut net = Network {
            inputs: Vec::new(),
            hidden_layers: Vec::new(),
            output_layer: Layer::new(),
            outputs: Vec::new(),
            train_params: TrainParams::default(),
        };

        net.update_network_map(hidden_layers, layer_size, output_size);
        net
    }

    pub fn from_config(cfg: &NetworkConfig) -> Self {
        let mut net = Network::new(cfg.hidden_layers, cfg.layer_size, cfg.output_size);
        net.train_params = cfg.train_params;
        net
    }

    pub fn from_cfg_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path)?;
        let cfg: NetworkConfig = serde_yaml::from_reader(file)?;

        Ok(Network::from_config(&cfg))
    }

    pub fn save_cfg(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let cfg = NetworkConfig {
            hidden_layers: self.hidden_layers.len(),
            layer_size: self.hidden_layers.first().map(|l| l.len()).unwrap_or(0),
            output_size: self.output_layer.len(),
            train_params: self.train_params,
        };

        let yaml = serde_yaml::to_string(&cfg)?;
        let mut output = File::create(path)?;
        output.write_all(yaml.as_bytes())?;

        Ok(())
    }

    /// Re-sizes the layer map, keeping already installed neurons where
    /// their slots survive, then runs a reshape pass over every layer.
    pub fn update_network_map(
        &mut self,
        hidden_layers: usize,
        layer_size: usize,
        output_size: usize,
    ) {
        self.hidden_layers.resize_with(hidden_layers, Layer::new);
        self.output_layer.resize(output_size);

        for layer in self.hidden_layers.iter_mut() {
            layer.resize(layer_size);
        }

        self.reshape_all();
    }

    /// Replaces the stored input vector. A length change reshapes layer 0
    /// factor counts, neuron counts of later layers are untouched.
    pub fn feed(&mut self, inputs: &[Float]) {
        let old_len = self.inputs.len();
        self.inputs = inputs.to_vec();

        if old_len != inputs.len() {
            self.reshape_layer(0);
        }
    }

    /// Hidden layer count plus the output layer.
    pub fn layers(&self) -> usize {
        self.hidden_layers.len() + 1
    }

    pub fn layer_size(&self, layer_index: usize) -> Result<usize, NetworkError> {
        Ok(self.layer(layer_index)?.len())
    }

    pub fn inputs(&self) -> &[Float] {
        &self.inputs
    }

    pub fn train_params(&self) -> TrainParams {
        self.train_params
    }

    pub fn set_train_params(&mut self, params: TrainParams) {
        self.train_params = params;
    }

    /// Installs a custom neuron. Later reshape passes only fit its factor
    /// count, they never overwrite its kind or bias setting.
    pub fn set_neuron(
        &mut self,
        layer_index: usize,
        neuron_index: usize,
        neuron: Neuron,
    ) -> Result<(), NetworkError> {
        self.layer_mut(layer_index)?.set_neuron(neuron_index, neuron)
    }

    /// Weak observation handle for the specified neuron.
    pub fn neuron(
        &self,
        layer_index: usize,
        neuron_index: usize,
    ) -> Result<NeuronHandle, NetworkError> {
        self.layer(layer_index)?.neuron(neuron_index)
    }

    /// Forward pass in strict dependency order, layer 0 reads the raw
    /// input vector, every later layer the previous layer's neurons.
    /// Afterwards the cached output vector mirrors the output layer.
    pub fn propagate(&mut self) -> Result<(), NetworkError> {
        for i in 0..self.layers() {
            let refs = self.layer(i)?.neuron_refs()?;

            if i == 0 {
                for n in refs.iter() {
                    n.borrow_mut().refresh_inputs(&self.inputs)?;
                }
            } else {
                let upstream = self.layer(i - 1)?.neuron_refs()?;

                for n in refs.iter() {
                    n.borrow_mut().refresh_layer(&upstream)?;
                }
            }

            debug!("[ok] layer {} forward pass", i);
        }

        let out_refs = self.output_layer.neuron_refs()?;
        self.outputs = out_refs.iter().map(|n| n.borrow().output()).collect();

        Ok(())
    }

    /// Normalizes the cached outputs by their plain sum. No underflow or
    /// divide-by-zero guard, a zero sum propagates NaN silently.
    pub fn apply_softmax(&mut self) {
        let sum: Float = self.outputs.iter().sum();

        for out in self.outputs.iter_mut() {
            *out /= sum;
        }
    }

    /// Cached outputs of the last propagation, empty before the first one.
    pub fn output(&self) -> &[Float] {
        &self.outputs
    }

    /// Feed, propagate and return the fresh outputs in one call.
    pub fn output_for(&mut self, inputs: &[Float]) -> Result<Vec<Float>, NetworkError> {
        self.feed(inputs);
        self.propagate()?;

        Ok(self.outputs.clone())
    }

    /// One full training step: forward pass, delta computation, gradient
    /// accumulation and the momentum weight update.
    pub fn backpropagate(&mut self, inputs: &[Float], expected: &[Float]) -> Result<(), NetworkError> {
        self.feed(inputs);
        self.propagate()?;
        self.reset_changes()?;
        self.update_deltas(expected)?;
        self.update_neuron_factors()?;
        self.adjust_weights()?;

        debug!("[ok] backpropagation step");

        Ok(())
    }

    /// Breaks the all-zero symmetry of freshly reshaped layers. Factors
    /// (and enabled biases) get uniform values from `low..high`.
    pub fn randomize_factors(&mut self, low: Float, high: Float) -> Result<(), NetworkError> {
        let mut rng = thread_rng();

        for i in 0..self.layers() {
            for n in self.layer(i)?.neuron_refs()? {
                let mut n = n.borrow_mut();

                for f in 0..n.factors_size() {
                    n.set_factor(f, rng.gen_range(low, high))?;
                }

                if n.bias_enabled() {
                    n.set_bias(rng.gen_range(low, high));
                }
            }
        }

        Ok(())
    }

    /// Toggles the bias of every neuron currently in the network.
    pub fn set_bias_enabled(&mut self, enabled: bool) -> Result<(), NetworkError> {
        for i in 0..self.layers() {
            for n in self.layer(i)?.neuron_refs()? {
                if enabled {
                    n.borrow_mut().enable_bias();
                } else {
                    n.borrow_mut().disable_bias();
                }
            }
        }

        Ok(())
    }

    fn layer(&self, layer_index: usize) -> Result<&Layer, NetworkError> {
        if layer_index == self.layers() - 1 {
            Ok(&self.output_layer)
        } else {
            self.hidden_layers
                .get(layer_index)
                .ok_or(NetworkError::IndexOutOfRange {
                    index: layer_index,
                    len: self.layers(),
                })
        }
    }

    fn layer_mut(&mut self, layer_index: usize) -> Result<&mut Layer, NetworkError> {
        let len = self.layers();

        if layer_index == len - 1 {
            Ok(&mut self.output_layer)
        } else {
            self.hidden_layers
                .get_mut(layer_index)
                .ok_or(NetworkError::IndexOutOfRange {
                    index: layer_index,
                    len,
                })
        }
    }

    /// Fits one layer to its upstream source: the raw input length for
    /// layer 0, the previous layer's neuron count otherwise.
    fn reshape_layer(&mut self, layer_index: usize) {
        let upstream_size = if layer_index == 0 {
            self.inputs.len()
        } else {
            self.layer_size(layer_index - 1).unwrap_or(0)
        };

        let len = self.layers();

        if layer_index == len - 1 {
            self.output_layer.reshape(upstream_size);
        } else if let Some(layer) = self.hidden_layers.get_mut(layer_index) {
            layer.reshape(upstream_size);
        }
    }

    /// Layer 0 first, later layers depend on earlier sizes.
    fn reshape_all(&mut self) {
        for i in 0..self.layers() {
            self.reshape_layer(i);
        }
    }

    fn reset_changes(&mut self) -> Result<(), NetworkError> {
        for i in 0..self.layers() {
            for n in self.layer(i)?.neuron_refs()? {
                n.borrow_mut().reset_changes();
            }
        }

        Ok(())
    }

    fn update_deltas(&mut self, expected: &[Float]) -> Result<(), NetworkError> {
        self.update_output_deltas(expected)?;
        self.update_hidden_deltas()
    }

    fn update_output_deltas(&mut self, expected: &[Float]) -> Result<(), NetworkError> {
        let out_refs = self.output_layer.neuron_refs()?;

        if expected.len() != out_refs.len() {
            return Err(NetworkError::ShapeMismatch {
                expected: out_refs.len(),
                found: expected.len(),
            });
        }

        for (exp, n) in expected.iter().zip(out_refs.iter()) {
            let mut n = n.borrow_mut();
            let out = n.output();
            let delta = -(exp - out) * n.activation().compute_deriv(out);

            n.set_delta(delta);
        }

        Ok(())
    }

    /// Last hidden layer first, going backward to layer 0. The downstream
    /// factor index mirrors the downstream neuron's own position, which
    /// only lines up when adjacent layers share a width; irregular widths
    /// fail fast here instead of reading a neighbouring coefficient.
    fn update_hidden_deltas(&mut self) -> Result<(), NetworkError> {
        for h in (0..self.hidden_layers.len()).rev() {
            let next_refs = self.layer(h + 1)?.neuron_refs()?;
            let cur_refs = self.hidden_layers[h].neuron_refs()?;

            for n in cur_refs.iter() {
                let mut sum = 0.0;

                for (i, next) in next_refs.iter().enumerate() {
                    let next = next.borrow();
                    sum += next.delta() * next.factor(i)?;
                }

                let mut n = n.borrow_mut();
                let out = n.output();
                let delta = n.activation().compute_deriv(out) * sum;

                n.set_delta(delta);
            }
        }

        Ok(())
    }

    /// Accumulates `delta * upstream_output` into every pending factor
    /// change, plus the plain delta into the pending bias change.
    fn update_neuron_factors(&mut self) -> Result<(), NetworkError> {
        for i in 0..self.layers() {
            let refs = self.layer(i)?.neuron_refs()?;

            if i == 0 {
                for n in refs.iter() {
                    let mut n = n.borrow_mut();

                    if n.factors_size() != self.inputs.len() {
                        return Err(NetworkError::ShapeMismatch {
                            expected: self.inputs.len(),
                            found: n.factors_size(),
                        });
                    }

                    let delta = n.delta();

                    for (f, input) in self.inputs.iter().enumerate() {
                        n.add_factor_change(f, delta * input)?;
                    }

                    n.add_bias_change(delta);
                }
            } else {
                let upstream = self.layer(i - 1)?.neuron_refs()?;

                for n in refs.iter() {
                    let mut n = n.borrow_mut();

                    if n.factors_size() != upstream.len() {
                        return Err(NetworkError::ShapeMismatch {
                            expected: upstream.len(),
                            found: n.factors_size(),
                        });
                    }

                    let delta = n.delta();

                    for (f, up) in upstream.iter().enumerate() {
                        n.add_factor_change(f, delta * up.borrow().output())?;
                    }

                    n.add_bias_change(delta);
                }
            }
        }

        Ok(())
    }

    fn adjust_weights(&mut self) -> Result<(), NetworkError> {
        let params = self.train_params;

        for i in 0..self.layers() {
            for n in self.layer(i)?.neuron_refs()? {
                n.borrow_mut().apply_changes(params.learn_rate, params.momentum);
            }
        }

        Ok(())
    }
}
