mod util;
pub mod activation;

pub use activation::*;
pub use util::*;
