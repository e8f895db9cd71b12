// src/ops/conv/mod.rs

pub mod im2col;

pub use im2col::{im2col, output_extent, same_padding, Im2ColGeometry};
