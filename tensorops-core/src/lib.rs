//! # TensorOps Core
//!
//! Tensor views over shared buffers, a shape-inference protocol, declarable
//! operations with a fail-fast validation pipeline, and the kernels and layers
//! built on top of them.
//!
//! The usual flow for an operation is:
//!
//! 1. build an [`OpInvocation`](ops::declarable::OpInvocation) from the input tensors and scalar arguments,
//! 2. ask the operation for its output shapes ([`ShapeList`](shape::ShapeList)) through a [`ShapeArena`](shape::ShapeArena),
//! 3. allocate the outputs from those shapes and attach them to the invocation,
//! 4. run the operation (validators first, then the kernel).

// Main modules of the crate
pub mod buffer;
pub mod error;
pub mod shape;
pub mod tensor;
pub mod types;

pub mod nn;
pub mod ops;
pub mod utils;

// Re-export the core types so they are reachable as `tensorops_core::Tensor` etc.
pub use error::{Status, TensorOpsError};
pub use ops::traits::TensorElement;
pub use shape::{ShapeArena, ShapeDescriptor, ShapeId, ShapeList};
pub use tensor::Tensor;
pub use types::{DType, MemoryOrder};

// Re-export traits required by public functions/structs
pub use num_traits;
