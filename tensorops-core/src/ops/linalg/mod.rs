// src/ops/linalg/mod.rs

pub mod gemm;

pub use gemm::{gemm, matmul};
