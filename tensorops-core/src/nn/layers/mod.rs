// src/nn/layers/mod.rs

pub mod convolution;
pub mod dense;

// Re-export key layer structs
pub use convolution::{ConvolutionConfig, ConvolutionLayer};
pub use dense::{DenseConfig, DenseLayer};
