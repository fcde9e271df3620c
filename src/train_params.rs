use serde::{Deserialize, Serialize};

use crate::util::Float;

/// Gradient-descent step configuration, stored per network instead of
/// being hardcoded inside the weight adjustment pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainParams {
    pub learn_rate: Float,
    pub momentum: Float,
}

impl TrainParams {
    pub fn new(learn_rate: Float, momentum: Float) -> Self {
        Self {
            learn_rate,
            momentum,
        }
    }
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            learn_rate: 0.9,
            momentum: 0.1,
        }
    }
}
