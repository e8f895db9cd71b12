use log::trace;

use super::utils::compute_view_strides;
use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::shape::ShapeDescriptor;
use crate::tensor::Tensor;
use crate::types::MemoryOrder;

/// Descriptor of `input` read as `new_shape` in `order`.
///
/// Extents are merged and split in `order`: row-major reshapes keep the last
/// axis fastest, column-major reshapes the first. Fails with `BadParams` on an
/// element-count mismatch, or when the strides of `input` cannot express
/// `new_shape` without a copy.
pub fn reshape_descriptor(
    input: &ShapeDescriptor,
    new_shape: &[usize],
    order: MemoryOrder,
) -> Result<ShapeDescriptor, TensorOpsError> {
    let new_numel: usize = new_shape.iter().product();
    if new_numel != input.numel() {
        return Err(TensorOpsError::bad_params(
            "reshape",
            format!(
                "cannot reshape {:?} ({} elements) into {:?} ({} elements)",
                input.shape(),
                input.numel(),
                new_shape,
                new_numel
            ),
        ));
    }
    let strides = compute_view_strides(input.shape(), input.strides(), new_shape, order)
        .ok_or_else(|| {
            TensorOpsError::bad_params(
                "reshape",
                format!(
                    "view with shape {:?} and strides {:?} cannot be read as {:?} in '{}' order without a copy",
                    input.shape(),
                    input.strides(),
                    new_shape,
                    order.as_char()
                ),
            )
        })?;
    ShapeDescriptor::from_parts(new_shape.to_vec(), strides, order)
}

// --- Forward Operation ---

/// Returns a view of `input` with extents `new_shape`, reshaped in `order`.
pub fn reshape_op<T: TensorElement>(
    input: &Tensor<T>,
    new_shape: &[usize],
    order: MemoryOrder,
) -> Result<Tensor<T>, TensorOpsError> {
    let descriptor = reshape_descriptor(input.descriptor(), new_shape, order)?;
    trace!(
        "reshape {:?} -> {:?} (order '{}', strides {:?})",
        input.shape(),
        new_shape,
        order.as_char(),
        descriptor.strides()
    );
    Ok(Tensor::view_of(input.buffer.clone(), descriptor, input.offset()))
}
