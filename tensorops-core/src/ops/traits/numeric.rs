use num_traits::{Float, NumAssignOps, NumOps};
use std::fmt::Debug;

use crate::types::DType;

/// A trait representing the element types usable in TensorOps tensors and kernels.
///
/// Every kernel is written once against this bound and monomorphized for `f32`
/// and `f64`. Integer-valued data (segment ids, top-k indices) is carried in
/// the same element type, which represents integers exactly up to 2^24 (`f32`)
/// or 2^53 (`f64`).
pub trait TensorElement:
    Float // Includes Num + Copy + NumCast + PartialOrd etc.
    + NumAssignOps // AddAssign, SubAssign, MulAssign, DivAssign, RemAssign
    + NumOps
    + PartialOrd
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// The runtime data type tag for this element type.
    const DTYPE: DType;

    fn from_f64(value: f64) -> Self;

    fn from_usize(value: usize) -> Self;

    fn as_f64(self) -> f64;
}

impl TensorElement for f32 {
    const DTYPE: DType = DType::F32;

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn from_usize(value: usize) -> Self {
        value as f32
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl TensorElement for f64 {
    const DTYPE: DType = DType::F64;

    fn from_f64(value: f64) -> Self {
        value
    }

    fn from_usize(value: usize) -> Self {
        value as f64
    }

    fn as_f64(self) -> f64 {
        self
    }
}
