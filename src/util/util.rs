use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::neuron::Neuron;

pub type Float = f64;

/// Owning handle to a neuron. Layers are the sole owners, the reference
/// count only exists so external observers can hold [NeuronHandle]s.
pub type NeuronRef = Rc<RefCell<Neuron>>;

/// Non-owning observation handle. Expires together with the network.
pub type NeuronHandle = Weak<RefCell<Neuron>>;
