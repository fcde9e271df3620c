use std::fmt;

/// Contract violations of the network core. These are caller errors,
/// not recoverable runtime conditions, so every operation that can hit
/// one fails fast instead of truncating to the shorter length.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// A coefficient vector disagrees with its upstream size.
    ShapeMismatch { expected: usize, found: usize },
    /// A layer, neuron or factor slot beyond bounds was addressed.
    IndexOutOfRange { index: usize, len: usize },
    /// A propagation step reached a layer with no neurons in it.
    EmptyTopology,
    /// The dataset collaborator got a malformed file.
    InvalidFormat(String),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetworkError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch : expected length {}, found {}", expected, found)
            }
            NetworkError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} is out of range for length {}", index, len)
            }
            NetworkError::EmptyTopology => {
                write!(f, "Network topology has an empty layer or neuron slot")
            }
            NetworkError::InvalidFormat(msg) => {
                write!(f, "Invalid dataset format : {}", msg)
            }
        }
    }
}

impl std::error::Error for NetworkError {}
