use log::{debug, trace};

use crate::error::TensorOpsError;
use crate::ops::declarable::{ArgCount, DeclarableOp, OpDescriptor, OpInvocation};
use crate::ops::traits::TensorElement;
use crate::shape::{ShapeArena, ShapeDescriptor, ShapeList};
use crate::tensor::utils::normalize_axis;
use crate::tensor::Tensor;

const OP_NAME: &str = "roll";

/// Maps `shift` into `[0, len)`. Multiples of `len` (and `len == 0`) give `0`.
pub fn normalize_shift(shift: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    shift.rem_euclid(len as i64) as usize
}

// --- Rotation helpers ---
//
// A right rotation by `s` of n items is three reversals: all n, the first s,
// the last n - s. Every reversal is a set of disjoint pairwise swaps.

fn reverse_positions<T>(data: &mut [T], offsets: &[usize]) {
    let n = offsets.len();
    for i in 0..n / 2 {
        data.swap(offsets[i], offsets[n - 1 - i]);
    }
}

/// Rotates the elements of `view` (flat order) right by `shift` positions.
fn rotate_elements<T: TensorElement>(view: &Tensor<T>, shift: usize) -> Result<(), TensorOpsError> {
    if shift == 0 || view.numel() < 2 {
        return Ok(());
    }
    let offsets: Vec<usize> = view.offsets().collect();
    let mut data = view.buffer.write()?;
    reverse_positions(&mut data, &offsets);
    reverse_positions(&mut data, &offsets[..shift]);
    reverse_positions(&mut data, &offsets[shift..]);
    Ok(())
}

fn reverse_views<T: TensorElement>(views: &[Tensor<T>]) -> Result<(), TensorOpsError> {
    let n = views.len();
    for i in 0..n / 2 {
        views[i].swap_with(&views[n - 1 - i])?;
    }
    Ok(())
}

/// Rotates a sequence of equally shaped sub-views right by `shift` positions.
fn rotate_views<T: TensorElement>(views: &[Tensor<T>], shift: usize) -> Result<(), TensorOpsError> {
    if shift == 0 || views.len() < 2 {
        return Ok(());
    }
    reverse_views(views)?;
    reverse_views(&views[..shift])?;
    reverse_views(&views[shift..])
}

// --- Kernels ---

/// Circular shift of the flattened tensor: `output[i] = input[(i - shift) mod n]`.
///
/// Unless `in_place` is set, `output` first receives a copy of `input`, and
/// `input` is never written. With `in_place`, `output` must be `input` (or a
/// view of the same elements).
pub fn roll_linear<T: TensorElement>(
    input: &Tensor<T>,
    output: &Tensor<T>,
    shift: i64,
    in_place: bool,
) -> Result<(), TensorOpsError> {
    if !in_place {
        output.assign(input)?;
    }
    let effective = normalize_shift(shift, output.numel());
    debug!("roll_linear: shape {:?}, shift {} -> {}", output.shape(), shift, effective);
    rotate_elements(output, effective)
}

/// Circular shift along each of `axes` in turn.
///
/// Rolling along the last axis rotates every 1-D row independently; rolling
/// along any other axis rotates the whole slices spanning the axes after it.
/// The shift is reduced modulo the extent of each axis. Axes after the first
/// operate on the already rotated result. Negative axes count from the end.
pub fn roll_along_axes<T: TensorElement>(
    input: &Tensor<T>,
    output: &Tensor<T>,
    shift: i64,
    axes: &[i64],
    in_place: bool,
) -> Result<(), TensorOpsError> {
    let rank = output.rank();
    let axes = axes
        .iter()
        .map(|&a| {
            normalize_axis(a, rank).ok_or_else(|| {
                TensorOpsError::bad_arguments(
                    OP_NAME,
                    format!("axis {} is out of range for rank {}", a, rank),
                )
            })
        })
        .collect::<Result<Vec<usize>, _>>()?;

    if !in_place {
        output.assign(input)?;
    }
    debug!("roll_along_axes: shape {:?}, shift {}, axes {:?}", output.shape(), shift, axes);

    for axis in axes {
        let extent = output.shape()[axis];
        let effective = normalize_shift(shift, extent);
        trace!("roll: axis {} (extent {}) by {}", axis, extent, effective);
        if effective == 0 {
            continue;
        }
        if axis + 1 == rank {
            for row in output.all_tensors_along_dimension(&[axis])? {
                rotate_elements(&row, effective)?;
            }
        } else {
            let inner: Vec<usize> = (axis + 1..rank).collect();
            let slices = output.all_tensors_along_dimension(&inner)?;
            // Consecutive runs of `extent` slices differ only in `axis`.
            for group in slices.chunks(extent) {
                rotate_views(group, effective)?;
            }
        }
    }
    Ok(())
}

/// Declarable form of roll: one input, one output, integer arguments
/// `[shift, axes...]`. Without axes the tensor is rolled as a flat sequence.
/// May run in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollOp;

impl<T: TensorElement> DeclarableOp<T> for RollOp {
    fn descriptor(&self) -> OpDescriptor {
        OpDescriptor::new(OP_NAME, 1, 1)
            .with_int_args(ArgCount::Variable)
            .allow_in_place()
    }

    fn calculate_output_shape(&self, inv: &OpInvocation<'_, T>, arena: &mut ShapeArena) -> ShapeList {
        let descriptor = match inv.input(0) {
            Some(input) => ShapeDescriptor::contiguous(input.shape().to_vec(), input.order()),
            None => ShapeDescriptor::vector(0),
        };
        let mut list = ShapeList::new();
        list.push(arena.alloc(descriptor));
        list
    }

    fn validate_parameters(&self, inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        if inv.int_args.is_empty() {
            return Err(TensorOpsError::bad_arguments(OP_NAME, "missing shift argument"));
        }
        if !inv.float_args.is_empty() {
            return Err(TensorOpsError::bad_arguments(OP_NAME, "no float arguments expected"));
        }
        let rank = inv.input(0).map_or(0, |t| t.rank());
        if let Some(&bad) = inv.int_args[1..].iter().find(|&&a| normalize_axis(a, rank).is_none()) {
            return Err(TensorOpsError::bad_arguments(
                OP_NAME,
                format!("axis {} is out of range for rank {}", bad, rank),
            ));
        }
        Ok(())
    }

    fn execute(&self, inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        let (input, output) = (inv.inputs[0], inv.outputs[0]);
        let shift = inv.int_args[0];
        let axes = &inv.int_args[1..];
        if axes.is_empty() {
            roll_linear(input, output, shift, inv.in_place)
        } else {
            roll_along_axes(input, output, shift, axes, inv.in_place)
        }
    }
}

#[cfg(test)]
#[path = "roll_test.rs"]
mod tests;
