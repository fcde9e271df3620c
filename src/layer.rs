use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::err::NetworkError;
use crate::neuron::Neuron;
use crate::util::{NeuronHandle, NeuronRef};

/// An ordered collection of neuron slots sharing the same upstream layer.
/// Slots may be empty until a reshape pass fills them, topology holes are
/// self-healing but always default to the bias-disabled sigmoid kind.
#[derive(Default)]
pub struct Layer {
    neurons: Vec<Option<NeuronRef>>,
}

impl Layer {
    pub fn new() -> Self {
        Layer { neurons: Vec::new() }
    }

    pub fn with_size(size: usize) -> Self {
        let mut l = Layer::new();
        l.resize(size);
        l
    }

    /// Changes the neuron count. New slots start empty, removed slots
    /// drop their neurons.
    pub fn resize(&mut self, size: usize) {
        self.neurons.resize_with(size, || None);
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Installs a neuron into the given slot, replacing whatever was
    /// there. Used to swap in a manually configured neuron kind.
    pub fn set_neuron(&mut self, index: usize, neuron: Neuron) -> Result<(), NetworkError> {
        if index >= self.neurons.len() {
            return Err(NetworkError::IndexOutOfRange {
                index,
                len: self.neurons.len(),
            });
        }

        self.neurons[index] = Some(Rc::new(RefCell::new(neuron)));
        Ok(())
    }

    /// Non-owning observation handle. An empty slot yields an already
    /// expired handle.
    pub fn neuron(&self, index: usize) -> Result<NeuronHandle, NetworkError> {
        match self.neurons.get(index) {
            Some(Some(n)) => Ok(Rc::downgrade(n)),
            Some(None) => Ok(Weak::new()),
            None => Err(NetworkError::IndexOutOfRange {
                index,
                len: self.neurons.len(),
            }),
        }
    }

    /// Fits every neuron's factor count to the upstream size. Existing
    /// neurons are resized in place, keeping their kind and bias setting,
    /// empty slots get a fresh bias-disabled sigmoid neuron.
    pub fn reshape(&mut self, upstream_size: usize) {
        for slot in self.neurons.iter_mut() {
            match slot {
                Some(n) => {
                    if n.borrow().factors_size() != upstream_size {
                        n.borrow_mut().resize(upstream_size);
                    }
                }
                None => {
                    *slot = Some(Rc::new(RefCell::new(Neuron::sigmoid(upstream_size, false))));
                }
            }
        }
    }

    /// Owning references to every neuron, in order. Fails when the layer
    /// is empty or a slot has not been filled by a reshape pass yet.
    pub(crate) fn neuron_refs(&self) -> Result<Vec<NeuronRef>, NetworkError> {
        if self.neurons.is_empty() {
            return Err(NetworkError::EmptyTopology);
        }

        let mut refs = Vec::with_capacity(self.neurons.len());
        for slot in self.neurons.iter() {
            match slot {
                Some(n) => refs.push(n.clone()),
                None => return Err(NetworkError::EmptyTopology),
            }
        }

        Ok(refs)
    }
}
