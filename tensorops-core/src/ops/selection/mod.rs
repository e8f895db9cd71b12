// src/ops/selection/mod.rs

pub mod top_k;

pub use top_k::{top_k, TopKOp};
