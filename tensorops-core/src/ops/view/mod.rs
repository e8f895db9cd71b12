// tensorops-core/src/ops/view/mod.rs

pub mod along_dimension;
pub mod permute;
pub mod reshape;

pub mod utils;

pub use along_dimension::all_tensors_along_dimension;
pub use permute::{permute_descriptor, permute_op};
pub use reshape::{reshape_descriptor, reshape_op};
