// src/ops/permutation/mod.rs

pub mod roll;

pub use roll::{normalize_shift, roll_along_axes, roll_linear, RollOp};
