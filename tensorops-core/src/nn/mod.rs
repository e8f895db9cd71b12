// src/nn/mod.rs
// Layers built on the kernels of `ops`, and weight initializers.

pub mod init;
pub mod layer;
pub mod layers;

// Re-export common items
pub use layer::{Layer, LayerTensors};
pub use layers::convolution::{ConvolutionConfig, ConvolutionLayer};
pub use layers::dense::{DenseConfig, DenseLayer};
