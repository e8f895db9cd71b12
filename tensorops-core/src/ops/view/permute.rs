use log::trace;

use super::utils;
use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::shape::ShapeDescriptor;
use crate::tensor::Tensor;

/// Descriptor of `input` with its axes reordered by `dims`.
///
/// Fails with `InvalidPermutation` (status `BadParams`) unless `dims` is a
/// permutation of `[0, rank)`.
pub fn permute_descriptor(
    input: &ShapeDescriptor,
    dims: &[usize],
) -> Result<ShapeDescriptor, TensorOpsError> {
    utils::validate_permutation(input.rank(), dims)?;
    let new_shape = utils::permute_shape(input.shape(), dims);
    let new_strides = utils::permute_strides(input.strides(), dims);
    let order = utils::derive_order(&new_shape, &new_strides, input.order());
    ShapeDescriptor::from_parts(new_shape, new_strides, order)
}

// --- Forward Operation ---

/// Returns a view of `input` with its axes reordered. No data is copied.
pub fn permute_op<T: TensorElement>(
    input: &Tensor<T>,
    dims: &[usize],
) -> Result<Tensor<T>, TensorOpsError> {
    let descriptor = permute_descriptor(input.descriptor(), dims)?;
    trace!(
        "permute {:?} by {:?} -> {:?} (order '{}')",
        input.shape(),
        dims,
        descriptor.shape(),
        descriptor.order().as_char()
    );
    Ok(Tensor::view_of(input.buffer.clone(), descriptor, input.offset()))
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;
    use crate::types::MemoryOrder;
    use crate::utils::testing::check_tensor_near;

    #[test]
    fn test_permute_basic() -> Result<(), TensorOpsError> {
        let t = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3])?;
        let permuted = permute_op(&t, &[1, 0])?;
        assert_eq!(permuted.to_vec()?, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert!(permuted.shares_buffer_with(&t));
        assert_eq!(permuted.order(), MemoryOrder::ColumnMajor);
        Ok(())
    }

    #[test]
    fn test_permute_higher_dim() -> Result<(), TensorOpsError> {
        let t = Tensor::new((0..24).map(|x| x as f32).collect(), vec![2, 3, 4])?;
        let permuted = permute_op(&t, &[2, 0, 1])?;
        let expected_data = vec![
            0.0, 4.0, 8.0, 12.0, 16.0, 20.0, //
            1.0, 5.0, 9.0, 13.0, 17.0, 21.0, //
            2.0, 6.0, 10.0, 14.0, 18.0, 22.0, //
            3.0, 7.0, 11.0, 15.0, 19.0, 23.0,
        ];
        check_tensor_near(&permuted, &[4, 2, 3], &expected_data, 1e-6);
        Ok(())
    }

    #[test]
    fn test_permute_invalid_axes() -> Result<(), TensorOpsError> {
        let t = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0], vec![2, 2])?;
        let bad_dims: Vec<Vec<usize>> = vec![vec![0], vec![0, 2], vec![0, 0], vec![0, 1, 2]];
        for dims in &bad_dims {
            let err = permute_op(&t, dims).unwrap_err();
            assert!(matches!(err, TensorOpsError::InvalidPermutation { .. }));
            assert_eq!(err.status(), Status::BadParams);
        }
        Ok(())
    }

    #[test]
    fn test_permute_identity_keeps_layout() -> Result<(), TensorOpsError> {
        let t = Tensor::new((0..6).map(|x| x as f64).collect(), vec![1, 2, 3])?;
        let same = permute_op(&t, &[0, 1, 2])?;
        assert_eq!(same.descriptor(), t.descriptor());
        Ok(())
    }
}
