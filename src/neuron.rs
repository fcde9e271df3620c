use crate::err::NetworkError;
use crate::util::{Activation, Float, NeuronRef};

/// A single computational unit of the network. It holds one trainable
/// factor per upstream input, an optional bias and the delta/change
/// bookkeeping used by momentum gradient descent.
///
/// The three coefficient vectors (factors, pending changes, last applied
/// changes) always share the same length. `factor_changes` doubles as the
/// record of the previously set value and as the gradient accumulator,
/// which is why every training step starts with [Neuron::reset_changes].
#[derive(Clone, Debug)]
pub struct Neuron {
    factors: Vec<Float>,
    factor_changes: Vec<Float>,
    last_factor_changes: Vec<Float>,
    bias: Float,
    bias_change: Float,
    last_bias_change: Float,
    bias_enabled: bool,
    delta: Float,
    output: Float,
    activation: Activation,
}

impl Neuron {
    /// Zero-input neuron with bias disabled.
    pub fn new(activation: Activation) -> Self {
        Self {
            factors: Vec::new(),
            factor_changes: Vec::new(),
            last_factor_changes: Vec::new(),
            bias: 0.0,
            bias_change: 0.0,
            last_bias_change: 0.0,
            bias_enabled: false,
            delta: 0.0,
            output: 0.0,
            activation,
        }
    }

    pub fn with_size(activation: Activation, factors_size: usize, bias_enabled: bool) -> Self {
        let mut n = Neuron::new(activation);
        n.bias_enabled = bias_enabled;
        n.resize(factors_size);
        n
    }

    /// Default neuron kind installed by the reshape auto-fill.
    pub fn sigmoid(factors_size: usize, bias_enabled: bool) -> Self {
        Neuron::with_size(Activation::Sigmoid, factors_size, bias_enabled)
    }

    /// Sets the coefficient vector length to `factors_size`, zero-filling
    /// all three coefficient vectors. Prior factors and their recorded
    /// changes are discarded.
    pub fn resize(&mut self, factors_size: usize) {
        self.factors = vec![0.0; factors_size];
        self.factor_changes = vec![0.0; factors_size];
        self.last_factor_changes = vec![0.0; factors_size];
    }

    /// Shift-and-set bookkeeping for a single factor.
    pub fn set_factor(&mut self, index: usize, value: Float) -> Result<(), NetworkError> {
        if index >= self.factors.len() {
            return Err(NetworkError::IndexOutOfRange {
                index,
                len: self.factors.len(),
            });
        }

        self.last_factor_changes[index] = self.factor_changes[index];
        self.factor_changes[index] = self.factors[index];
        self.factors[index] = value;

        Ok(())
    }

    /// Bulk variant of [Neuron::set_factor]. A length change resizes all
    /// three vectors, new slots default their change history to zero.
    pub fn set_factors(&mut self, factors: &[Float]) {
        if factors.len() != self.factors.len() {
            self.factors.resize(factors.len(), 0.0);
            self.factor_changes.resize(factors.len(), 0.0);
            self.last_factor_changes.resize(factors.len(), 0.0);
        }

        self.last_factor_changes.copy_from_slice(&self.factor_changes);
        self.factor_changes.copy_from_slice(&self.factors);
        self.factors.copy_from_slice(factors);
    }

    pub fn enable_bias(&mut self) {
        self.bias_enabled = true;
    }

    /// Disabling keeps the stored bias value, it just becomes inert until
    /// the bias is enabled again.
    pub fn disable_bias(&mut self) {
        self.bias_enabled = false;
    }

    /// No-op while bias is disabled.
    pub fn set_bias(&mut self, value: Float) {
        if self.bias_enabled {
            self.last_bias_change = self.bias_change;
            self.bias_change = self.bias;
            self.bias = value;
        }
    }

    pub fn set_delta(&mut self, delta: Float) {
        self.delta = delta;
    }

    /// Accumulates one gradient contribution into the pending change of
    /// the given factor.
    pub fn add_factor_change(&mut self, index: usize, delta: Float) -> Result<(), NetworkError> {
        if index >= self.factor_changes.len() {
            return Err(NetworkError::IndexOutOfRange {
                index,
                len: self.factor_changes.len(),
            });
        }

        self.factor_changes[index] += delta;
        Ok(())
    }

    /// No-op while bias is disabled.
    pub fn add_bias_change(&mut self, delta: Float) {
        if self.bias_enabled {
            self.bias_change += delta;
        }
    }

    /// Zeroes every pending change, "last" changes stay untouched.
    pub fn reset_changes(&mut self) {
        for change in self.factor_changes.iter_mut() {
            *change = 0.0;
        }
        self.bias_change = 0.0;
    }

    /// Momentum gradient descent step. Each coefficient moves by
    /// `learn_rate * pending + momentum * learn_rate * last`, the applied
    /// amount is remembered as the new "last" change and the pending
    /// change is cleared. Pending changes accumulate positive gradient
    /// contributions, so the step is subtracted.
    pub fn apply_changes(&mut self, learn_rate: Float, momentum: Float) {
        for i in 0..self.factors.len() {
            let effective =
                learn_rate * self.factor_changes[i] + momentum * learn_rate * self.last_factor_changes[i];

            self.factors[i] -= effective;
            self.last_factor_changes[i] = effective;
            self.factor_changes[i] = 0.0;
        }

        if self.bias_enabled {
            let effective = learn_rate * self.bias_change + momentum * learn_rate * self.last_bias_change;

            self.bias -= effective;
            self.last_bias_change = effective;
            self.bias_change = 0.0;
        }
    }

    /// Recomputes and caches the output from a raw input vector.
    pub fn refresh_inputs(&mut self, inputs: &[Float]) -> Result<(), NetworkError> {
        if inputs.len() != self.factors.len() {
            return Err(NetworkError::ShapeMismatch {
                expected: self.factors.len(),
                found: inputs.len(),
            });
        }

        let mut sum = self.bias();
        for (factor, input) in self.factors.iter().zip(inputs.iter()) {
            sum += factor * input;
        }

        self.output = self.activation.compute(sum);
        Ok(())
    }

    /// Recomputes and caches the output from an upstream neuron layer,
    /// reading each upstream neuron's cached output.
    pub fn refresh_layer(&mut self, upstream: &[NeuronRef]) -> Result<(), NetworkError> {
        if upstream.len() != self.factors.len() {
            return Err(NetworkError::ShapeMismatch {
                expected: self.factors.len(),
                found: upstream.len(),
            });
        }

        let mut sum = self.bias();
        for (factor, neuron) in self.factors.iter().zip(upstream.iter()) {
            sum += factor * neuron.borrow().output();
        }

        self.output = self.activation.compute(sum);
        Ok(())
    }

    /// Cached result of the last refresh. Only fresh right after a
    /// propagation step has run for the current input.
    pub fn output(&self) -> Float {
        self.output
    }

    pub fn factor(&self, index: usize) -> Result<Float, NetworkError> {
        match self.factors.get(index) {
            Some(f) => Ok(*f),
            None => Err(NetworkError::IndexOutOfRange {
                index,
                len: self.factors.len(),
            }),
        }
    }

    pub fn factor_change(&self, index: usize) -> Result<Float, NetworkError> {
        match self.factor_changes.get(index) {
            Some(f) => Ok(*f),
            None => Err(NetworkError::IndexOutOfRange {
                index,
                len: self.factor_changes.len(),
            }),
        }
    }

    pub fn last_factor_change(&self, index: usize) -> Result<Float, NetworkError> {
        match self.last_factor_changes.get(index) {
            Some(f) => Ok(*f),
            None => Err(NetworkError::IndexOutOfRange {
                index,
                len: self.last_factor_changes.len(),
            }),
        }
    }

    pub fn factors_size(&self) -> usize {
        self.factors.len()
    }

    pub fn factors(&self) -> &[Float] {
        &self.factors
    }

    pub fn factor_changes(&self) -> &[Float] {
        &self.factor_changes
    }

    pub fn last_factor_changes(&self) -> &[Float] {
        &self.last_factor_changes
    }

    pub fn bias_enabled(&self) -> bool {
        self.bias_enabled
    }

    pub fn bias(&self) -> Float {
        if self.bias_enabled {
            self.bias
        } else {
            0.0
        }
    }

    pub fn bias_change(&self) -> Float {
        if self.bias_enabled {
            self.bias_change
        } else {
            0.0
        }
    }

    pub fn last_bias_change(&self) -> Float {
        if self.bias_enabled {
            self.last_bias_change
        } else {
            0.0
        }
    }

    pub fn delta(&self) -> Float {
        self.delta
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }
}
