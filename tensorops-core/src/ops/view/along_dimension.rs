use log::trace;

use super::utils::derive_order;
use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::shape::ShapeDescriptor;
use crate::tensor::iter_utils::StridedOffsets;
use crate::tensor::Tensor;

/// Sorted, de-duplicated copy of `axes`, checked against `rank`.
fn normalize_axes(axes: &[usize], rank: usize) -> Result<Vec<usize>, TensorOpsError> {
    let mut sorted = axes.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != axes.len() {
        return Err(TensorOpsError::bad_arguments(
            "all_tensors_along_dimension",
            format!("duplicate axes in {:?}", axes),
        ));
    }
    if let Some(&bad) = sorted.iter().find(|&&a| a >= rank) {
        return Err(TensorOpsError::bad_arguments(
            "all_tensors_along_dimension",
            format!("axis {} is out of range for rank {}", bad, rank),
        ));
    }
    Ok(sorted)
}

/// Every sub-view of `input` spanning `axes`.
///
/// One view is produced for each index combination of the remaining axes,
/// enumerated in row-major order of those axes. Each view has rank
/// `axes.len()` (axes taken in increasing order) and shares the buffer of
/// `input`. Empty `axes` yields one rank-0 view per element; all axes yield
/// a single view equal to `input`.
pub fn all_tensors_along_dimension<T: TensorElement>(
    input: &Tensor<T>,
    axes: &[usize],
) -> Result<Vec<Tensor<T>>, TensorOpsError> {
    let rank = input.rank();
    let kept = normalize_axes(axes, rank)?;

    let (mut outer_shape, mut outer_strides) = (Vec::new(), Vec::new());
    let (mut inner_shape, mut inner_strides) = (Vec::new(), Vec::new());
    for axis in 0..rank {
        let (dim, stride) = (input.shape()[axis], input.strides()[axis]);
        if kept.binary_search(&axis).is_ok() {
            inner_shape.push(dim);
            inner_strides.push(stride);
        } else {
            outer_shape.push(dim);
            outer_strides.push(stride);
        }
    }

    let order = derive_order(&inner_shape, &inner_strides, input.order());
    let descriptor = ShapeDescriptor::from_parts(inner_shape, inner_strides, order)?;
    let views: Vec<Tensor<T>> = StridedOffsets::new(&outer_shape, &outer_strides, input.offset())
        .map(|offset| Tensor::view_of(input.buffer.clone(), descriptor.clone(), offset))
        .collect();

    trace!(
        "all_tensors_along_dimension {:?} over axes {:?}: {} views of {:?}",
        input.shape(),
        kept,
        views.len(),
        descriptor.shape()
    );
    Ok(views)
}
