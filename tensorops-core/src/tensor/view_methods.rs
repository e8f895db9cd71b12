use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::ops::view;
use crate::tensor::Tensor;
use crate::types::MemoryOrder;

/// This `impl` block provides methods for creating views of a `Tensor` or
/// changing its layout metadata.
///
/// The view-returning methods share the underlying buffer and only produce new
/// metadata. The `_in_place` variants rewrite the metadata of `self` and are
/// what a layer uses to temporarily re-lay out a borrowed parameter tensor.
impl<T: TensorElement> Tensor<T> {
    /// Creates a view with the axes reordered by `dims`.
    ///
    /// Fails with `BadParams` unless `dims` is a permutation of `[0, rank)`.
    ///
    /// # Example
    /// ```
    /// use tensorops_core::Tensor;
    ///
    /// let t = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
    /// let p = t.permute(&[1, 0]).unwrap();
    /// assert_eq!(p.shape(), &[3, 2]);
    /// assert_eq!(p.to_vec().unwrap(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    /// ```
    pub fn permute(&self, dims: &[usize]) -> Result<Self, TensorOpsError> {
        view::permute_op(self, dims)
    }

    /// Reorders the axes of `self` without copying.
    pub fn permute_in_place(&mut self, dims: &[usize]) -> Result<(), TensorOpsError> {
        self.descriptor = view::permute_descriptor(&self.descriptor, dims)?;
        Ok(())
    }

    /// Creates a view with extents `new_shape`, reshaped in the view's own
    /// memory order.
    ///
    /// Fails with `BadParams` on an element-count mismatch or when the current
    /// strides cannot express `new_shape`.
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Self, TensorOpsError> {
        view::reshape_op(self, new_shape, self.order())
    }

    /// Like [`reshape`](Tensor::reshape) with an explicit memory order.
    pub fn reshape_with_order(
        &self,
        new_shape: &[usize],
        order: MemoryOrder,
    ) -> Result<Self, TensorOpsError> {
        view::reshape_op(self, new_shape, order)
    }

    /// Reshapes `self` in its own memory order. On failure `self` is untouched.
    pub fn reshape_in_place(&mut self, new_shape: &[usize]) -> Result<(), TensorOpsError> {
        self.descriptor = view::reshape_descriptor(&self.descriptor, new_shape, self.order())?;
        Ok(())
    }

    /// Like [`reshape_in_place`](Tensor::reshape_in_place) with an explicit
    /// memory order. On failure `self` is untouched.
    pub fn reshape_in_place_with_order(
        &mut self,
        new_shape: &[usize],
        order: MemoryOrder,
    ) -> Result<(), TensorOpsError> {
        self.descriptor = view::reshape_descriptor(&self.descriptor, new_shape, order)?;
        Ok(())
    }

    /// Sub-views spanning `axes`, one per index combination of the other axes.
    /// See [`view::all_tensors_along_dimension`].
    pub fn all_tensors_along_dimension(&self, axes: &[usize]) -> Result<Vec<Self>, TensorOpsError> {
        view::all_tensors_along_dimension(self, axes)
    }
}

#[cfg(test)]
#[path = "view_methods_test.rs"]
mod tests;
