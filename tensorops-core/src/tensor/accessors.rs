use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::shape::ShapeDescriptor;
use crate::tensor::iter_utils::StridedOffsets;
use crate::tensor::utils::{coord_to_offset, index_to_coord};
use crate::tensor::Tensor;
use crate::types::{DType, MemoryOrder};

impl<T: TensorElement> Tensor<T> {
    // --- Metadata ---

    /// Returns the extents of the tensor.
    pub fn shape(&self) -> &[usize] {
        self.descriptor.shape()
    }

    /// Returns the strides of the tensor, in elements.
    pub fn strides(&self) -> &[usize] {
        self.descriptor.strides()
    }

    pub fn order(&self) -> MemoryOrder {
        self.descriptor.order()
    }

    /// Element offset of the first logical element in the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the shape metadata of this view.
    pub fn descriptor(&self) -> &ShapeDescriptor {
        &self.descriptor
    }

    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Returns the rank (number of dimensions) of the tensor.
    pub fn rank(&self) -> usize {
        self.descriptor.rank()
    }

    /// Returns the total number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.descriptor.numel()
    }

    /// Extent of `axis`; negative axes count from the end.
    pub fn extent_at(&self, axis: i64) -> Result<usize, TensorOpsError> {
        self.descriptor.extent_at(axis).ok_or_else(|| {
            TensorOpsError::bad_arguments(
                "extent_at",
                format!("axis {} is out of range for rank {}", axis, self.rank()),
            )
        })
    }

    /// Rank 1, or rank >= 1 with exactly one extent greater than one.
    pub fn is_vector(&self) -> bool {
        self.descriptor.is_vector()
    }

    pub fn is_scalar(&self) -> bool {
        self.descriptor.is_scalar()
    }

    /// True if any extent is zero.
    pub fn is_empty(&self) -> bool {
        self.descriptor.is_empty()
    }

    /// Checks if the view is dense in its own memory order.
    pub fn is_contiguous(&self) -> bool {
        self.descriptor.is_contiguous()
    }

    pub fn is_same_shape(&self, other: &Tensor<T>) -> bool {
        self.shape() == other.shape()
    }

    /// True when both tensors are views of the same buffer.
    pub fn shares_buffer_with(&self, other: &Tensor<T>) -> bool {
        self.buffer.ptr_eq(&other.buffer)
    }

    // --- Element access ---

    /// Buffer offsets of every element, in flat (row-major logical) order.
    pub fn offsets(&self) -> StridedOffsets<'_> {
        StridedOffsets::new(self.descriptor.shape(), self.descriptor.strides(), self.offset)
    }

    fn physical_offset(&self, coords: &[usize]) -> Result<usize, TensorOpsError> {
        let shape = self.shape();
        if coords.len() != shape.len() || coords.iter().zip(shape).any(|(&c, &d)| c >= d) {
            return Err(TensorOpsError::IndexOutOfBounds {
                index: coords.to_vec(),
                shape: shape.to_vec(),
            });
        }
        Ok(coord_to_offset(coords, self.strides(), self.offset))
    }

    pub(crate) fn flat_offset(&self, index: usize) -> Result<usize, TensorOpsError> {
        if index >= self.numel() {
            return Err(TensorOpsError::IndexOutOfBounds {
                index: vec![index],
                shape: vec![self.numel()],
            });
        }
        let coords = index_to_coord(index, self.shape());
        Ok(coord_to_offset(&coords, self.strides(), self.offset))
    }

    /// Reads the element at multi-index `coords`.
    pub fn get(&self, coords: &[usize]) -> Result<T, TensorOpsError> {
        let offset = self.physical_offset(coords)?;
        Ok(self.buffer.read()?[offset])
    }

    /// Writes `value` at multi-index `coords`.
    pub fn set(&self, coords: &[usize], value: T) -> Result<(), TensorOpsError> {
        let offset = self.physical_offset(coords)?;
        self.buffer.write()?[offset] = value;
        Ok(())
    }

    /// Reads the element at flat index `index`.
    pub fn get_flat(&self, index: usize) -> Result<T, TensorOpsError> {
        let offset = self.flat_offset(index)?;
        Ok(self.buffer.read()?[offset])
    }

    /// Writes `value` at flat index `index`.
    pub fn set_flat(&self, index: usize, value: T) -> Result<(), TensorOpsError> {
        let offset = self.flat_offset(index)?;
        self.buffer.write()?[offset] = value;
        Ok(())
    }

    /// Copies the elements of the view into a new vector, in flat order.
    pub fn to_vec(&self) -> Result<Vec<T>, TensorOpsError> {
        let data = self.buffer.read()?;
        Ok(self.offsets().map(|o| data[o]).collect())
    }

    /// Extracts the single value of a one-element tensor.
    pub fn item(&self) -> Result<T, TensorOpsError> {
        if self.numel() != 1 {
            return Err(TensorOpsError::bad_shape(
                "item",
                "1 element",
                format!("{} elements (shape {:?})", self.numel(), self.shape()),
            ));
        }
        Ok(self.buffer.read()?[self.offset])
    }

    /// Returns a dense row-major copy with its own buffer.
    pub fn deep_copy(&self) -> Result<Tensor<T>, TensorOpsError> {
        Tensor::new(self.to_vec()?, self.shape().to_vec())
    }
}
