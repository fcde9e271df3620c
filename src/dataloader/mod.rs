pub mod dataloader;
pub mod plain;

pub use dataloader::*;
pub use plain::*;
