/// Folder
pub mod dataloader;
pub mod util;

/// Files
pub mod err;
pub mod layer;
pub mod network;
pub mod neuron;
pub mod train_params;

pub mod prelude {
    pub use crate::dataloader::{DataLoader, PlainTextDataset};
    pub use crate::err::NetworkError;
    pub use crate::network::{Network, NetworkConfig};
    pub use crate::neuron::Neuron;
    pub use crate::train_params::TrainParams;
    pub use crate::util::{Activation, Float, NeuronHandle, NeuronRef};
}
