use crate::error::TensorOpsError;
use crate::shape::ShapeDescriptor;
use crate::types::MemoryOrder;

/// Validates permutation axes: `dims` must hold every axis of `[0, rank)` once.
pub fn validate_permutation(rank: usize, dims: &[usize]) -> Result<(), TensorOpsError> {
    if dims.len() != rank {
        return Err(TensorOpsError::InvalidPermutation {
            dims: dims.to_vec(),
            rank,
        });
    }
    let mut seen = vec![false; rank];
    for &axis in dims {
        if axis >= rank || seen[axis] {
            return Err(TensorOpsError::InvalidPermutation {
                dims: dims.to_vec(),
                rank,
            });
        }
        seen[axis] = true;
    }
    Ok(())
}

/// Calculates the new shape after permutation.
pub fn permute_shape(shape: &[usize], dims: &[usize]) -> Vec<usize> {
    dims.iter().map(|&axis| shape[axis]).collect()
}

/// Calculates the new strides after permutation.
pub fn permute_strides(strides: &[usize], dims: &[usize]) -> Vec<usize> {
    dims.iter().map(|&axis| strides[axis]).collect()
}

/// Inverse of a valid permutation.
pub fn inverse_permutation(dims: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; dims.len()];
    for (i, &axis) in dims.iter().enumerate() {
        inverse[axis] = i;
    }
    inverse
}

/// Memory order of a view layout.
///
/// Row-major dense strides give `RowMajor`, column-major dense strides give
/// `ColumnMajor`. Layouts that are both (at most one extent above one) or
/// neither keep `inherited`.
pub fn derive_order(shape: &[usize], strides: &[usize], inherited: MemoryOrder) -> MemoryOrder {
    let probe = match ShapeDescriptor::from_parts(shape.to_vec(), strides.to_vec(), inherited) {
        Ok(d) => d,
        Err(_) => return inherited,
    };
    match (probe.is_row_major_dense(), probe.is_column_major_dense()) {
        (true, false) => MemoryOrder::RowMajor,
        (false, true) => MemoryOrder::ColumnMajor,
        _ => inherited,
    }
}

/// Strides that let a view with `old_shape`/`old_strides` be read as
/// `new_shape` in row-major order without copying, or `None` if no such
/// strides exist.
///
/// Runs of old axes that are dense relative to each other are treated as one
/// chunk; the new axes must split each chunk exactly. Extent-1 axes get the
/// dense stride of their position.
fn row_major_view_strides(
    old_shape: &[usize],
    old_strides: &[usize],
    new_shape: &[usize],
) -> Option<Vec<usize>> {
    let old_numel: usize = old_shape.iter().product();
    if old_shape.is_empty() || old_numel == 0 {
        return Some(crate::tensor::utils::calculate_strides(new_shape));
    }

    let mut new_strides = vec![0; new_shape.len()];
    let mut view_d = new_shape.len() as isize - 1;
    let mut chunk_base_stride = old_strides[old_strides.len() - 1];
    let mut tensor_numel = 1;
    let mut view_numel = 1;

    for tensor_d in (0..old_shape.len()).rev() {
        tensor_numel *= old_shape[tensor_d];
        let chunk_ends = tensor_d == 0
            || (old_shape[tensor_d - 1] != 1
                && old_strides[tensor_d - 1] != tensor_numel * chunk_base_stride);
        if chunk_ends {
            while view_d >= 0
                && (view_numel < tensor_numel || new_shape[view_d as usize] == 1)
            {
                new_strides[view_d as usize] = view_numel * chunk_base_stride;
                view_numel *= new_shape[view_d as usize];
                view_d -= 1;
            }
            if view_numel != tensor_numel {
                return None;
            }
            if tensor_d > 0 {
                chunk_base_stride = old_strides[tensor_d - 1];
                tensor_numel = 1;
                view_numel = 1;
            }
        }
    }
    if view_d != -1 {
        return None;
    }
    Some(new_strides)
}

/// Strides for reading a view as `new_shape` in `order` without copying.
///
/// Column-major reshapes are solved as row-major reshapes of the reversed
/// axes.
pub fn compute_view_strides(
    old_shape: &[usize],
    old_strides: &[usize],
    new_shape: &[usize],
    order: MemoryOrder,
) -> Option<Vec<usize>> {
    match order {
        MemoryOrder::RowMajor => row_major_view_strides(old_shape, old_strides, new_shape),
        MemoryOrder::ColumnMajor => {
            let rev = |v: &[usize]| v.iter().rev().copied().collect::<Vec<_>>();
            let mut strides =
                row_major_view_strides(&rev(old_shape), &rev(old_strides), &rev(new_shape))?;
            strides.reverse();
            Some(strides)
        }
    }
}
