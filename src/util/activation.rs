use serde::{Deserialize, Serialize};

use crate::util::Float;

pub fn sigmoid(val: Float) -> Float {
    return 1.0 / (1.0 + (-val).exp());
}

/// Derivative expressed through the already computed output value.
pub fn sigmoid_deriv(val: Float) -> Float {
    return (1.0 - val) * val;
}

/// Closed set of activation kinds, picked at neuron creation time.
/// Only the logistic sigmoid exists for now, the seam stays open for
/// further variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Sigmoid,
}

impl Activation {
    pub fn compute(&self, weighted_sum: Float) -> Float {
        match self {
            Activation::Sigmoid => sigmoid(weighted_sum),
        }
    }

    pub fn compute_deriv(&self, output: Float) -> Float {
        match self {
            Activation::Sigmoid => sigmoid_deriv(output),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Activation::Sigmoid => "sigmoid",
        }
    }
}
