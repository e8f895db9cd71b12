// src/ops/reduction/mod.rs
// Segment-wise reductions over the leading axis.

pub mod segment_min;

pub use segment_min::{segment_min, SegmentMinOp};
