//! # Tensor Operations Module (`ops`)
//!
//! Central hub for the operations of TensorOps. Operations are grouped into
//! submodules by what they do.
//!
//! ## Structure:
//!
//! - **Kernel functions:** every kernel exists as a plain function over
//!   tensors (`segment_min`, `top_k`, `roll_linear`, ...). Kernels assume their
//!   arguments were validated and do no redundant checking.
//! - **Declarable operations:** kernels reachable through a dispatcher also
//!   implement [`declarable::DeclarableOp`], which bundles the arity
//!   descriptor, shape inference, the validators and the kernel call. They are
//!   looked up by name through an explicit [`declarable::OpRegistry`].
//!
//! ## Key Submodules:
//!
//! - [`view`]: permute, reshape and sub-view extraction (no copies).
//! - [`declarable`]: operation descriptor, invocation, validation pipeline, registry.
//! - [`reduction`]: segment-wise reductions.
//! - [`selection`]: top-k selection.
//! - [`permutation`]: circular roll.
//! - [`linalg`]: dense matrix multiply.
//! - [`activation`]: element-wise activation functions.
//! - [`conv`]: image-to-column expansion.

pub mod traits;

pub mod activation;
pub mod conv;
pub mod declarable;
pub mod linalg;
pub mod permutation;
pub mod reduction;
pub mod selection;
pub mod view;
