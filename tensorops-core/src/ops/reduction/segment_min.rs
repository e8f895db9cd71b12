use log::{trace, warn};

use crate::error::TensorOpsError;
use crate::ops::declarable::{DeclarableOp, OpDescriptor, OpInvocation};
use crate::ops::traits::TensorElement;
use crate::shape::{ShapeArena, ShapeDescriptor, ShapeList};
use crate::tensor::Tensor;

const OP_NAME: &str = "segment_min";

/// Segment id stored in an element-type value, if it is a non-negative integer.
fn segment_id<T: TensorElement>(value: T) -> Option<usize> {
    if value < T::zero() || value.fract() != T::zero() {
        return None;
    }
    value.to_usize()
}

/// Fails with `BadArguments` at the first pair of decreasing ids.
fn check_sorted<T: TensorElement>(ids: &[T]) -> Result<(), TensorOpsError> {
    for pair in ids.windows(2) {
        if pair[0] > pair[1] {
            return Err(TensorOpsError::bad_arguments(
                OP_NAME,
                format!(
                    "segment indices should be arranged, but {:?} > {:?}",
                    pair[0], pair[1]
                ),
            ));
        }
    }
    Ok(())
}

/// Element-wise minimum of the leading-axis rows of `input` within each segment.
///
/// `segment_ids` holds one non-decreasing id per row of `input`; output row
/// `id` receives the minimum over the rows carrying that id. The ordering is
/// checked before anything is written. Output rows whose id has no rows are
/// zero filled.
///
/// `output` must have shape `[last_id + 1, input.shape[1..]]`.
pub fn segment_min<T: TensorElement>(
    input: &Tensor<T>,
    segment_ids: &Tensor<T>,
    output: &Tensor<T>,
) -> Result<(), TensorOpsError> {
    let ids = segment_ids.to_vec()?;
    check_sorted(&ids)?;

    let inner_axes: Vec<usize> = (1..input.rank()).collect();
    let rows = input.all_tensors_along_dimension(&inner_axes)?;
    let out_rows = output.all_tensors_along_dimension(&inner_axes)?;
    output.fill(T::zero())?;

    let mut written = vec![false; out_rows.len()];
    let mut start = 0;
    while start < ids.len() {
        let mut end = start + 1;
        while end < ids.len() && ids[end] == ids[start] {
            end += 1;
        }
        let id = segment_id(ids[start]).ok_or_else(|| {
            TensorOpsError::bad_arguments(OP_NAME, format!("invalid segment id {:?}", ids[start]))
        })?;
        let target = out_rows.get(id).ok_or_else(|| {
            TensorOpsError::bad_output(
                OP_NAME,
                format!("segment id {} has no row in output of shape {:?}", id, output.shape()),
            )
        })?;

        let mut acc = rows[start].to_vec()?;
        for row in &rows[start + 1..end] {
            for (a, v) in acc.iter_mut().zip(row.to_vec()?) {
                if v < *a {
                    *a = v;
                }
            }
        }
        target.copy_from_slice(&acc)?;
        written[id] = true;
        trace!("segment_min: id {} covers rows {}..{}", id, start, end);
        start = end;
    }

    let gaps: Vec<usize> = written
        .iter()
        .enumerate()
        .filter(|(_, &w)| !w)
        .map(|(i, _)| i)
        .collect();
    if !gaps.is_empty() {
        warn!("segment_min: segment ids {:?} have no members; rows zero filled", gaps);
    }
    Ok(())
}

/// Declarable form of [`segment_min`]: inputs `[input, segment_ids]`, one output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentMinOp;

impl<T: TensorElement> DeclarableOp<T> for SegmentMinOp {
    fn descriptor(&self) -> OpDescriptor {
        OpDescriptor::new(OP_NAME, 2, 1)
    }

    /// Output rows come from the last segment id, so the ids must be readable
    /// at inference time. Missing or invalid ids give a zero leading extent.
    fn calculate_output_shape(&self, inv: &OpInvocation<'_, T>, arena: &mut ShapeArena) -> ShapeList {
        let mut list = ShapeList::new();
        let descriptor = match (inv.input(0), inv.input(1)) {
            (Some(input), Some(ids)) => {
                let last = ids.to_vec().ok().and_then(|v| v.last().copied());
                let num_segments = last.and_then(segment_id).map_or(0, |id| id + 1);
                let mut shape = vec![num_segments];
                shape.extend_from_slice(input.shape().get(1..).unwrap_or(&[]));
                ShapeDescriptor::contiguous(shape, input.order())
            }
            _ => ShapeDescriptor::vector(0),
        };
        list.push(arena.alloc(descriptor));
        list
    }

    fn validate_input(&self, inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        let desc = <Self as DeclarableOp<T>>::descriptor(self);
        if inv.inputs.len() < desc.min_inputs {
            return Err(TensorOpsError::bad_input(
                OP_NAME,
                format!("expected input and segment ids, got {} inputs", inv.inputs.len()),
            ));
        }
        let (input, ids) = (inv.inputs[0], inv.inputs[1]);
        if input.is_empty() {
            return Err(TensorOpsError::bad_input(OP_NAME, "input is empty"));
        }
        if input.rank() == 0 {
            return Err(TensorOpsError::bad_rank(OP_NAME, ">= 1", 0));
        }
        if !ids.is_vector() {
            return Err(TensorOpsError::bad_rank(
                OP_NAME,
                "segment indexes array should be a vector",
                ids.rank(),
            ));
        }
        if ids.numel() != input.shape()[0] {
            return Err(TensorOpsError::bad_shape(
                OP_NAME,
                format!("{} segment ids (input first dimension)", input.shape()[0]),
                format!("{} segment ids", ids.numel()),
            ));
        }
        if let Some(bad) = ids.to_vec()?.into_iter().find(|&v| segment_id(v).is_none()) {
            return Err(TensorOpsError::bad_arguments(
                OP_NAME,
                format!("segment ids must be non-negative integers, got {:?}", bad),
            ));
        }
        Ok(())
    }

    fn execute(&self, inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        segment_min(inv.inputs[0], inv.inputs[1], inv.outputs[0])
    }
}

#[cfg(test)]
#[path = "segment_min_test.rs"]
mod tests;
