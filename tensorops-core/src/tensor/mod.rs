use std::fmt;

use crate::buffer::Buffer;
use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::shape::ShapeDescriptor;
use crate::types::MemoryOrder;

// --- Implementation modules ---
mod accessors;
pub mod create;
mod inplace_methods;
pub mod iter_utils;
pub mod utils;
mod view_methods;

// Re-export creation functions to make them public
pub use create::{arange, full, ones, zeros, zeros_like};

/// A multi-dimensional view over a shared element buffer.
///
/// A `Tensor` is the pair of a [`Buffer`] and the metadata that addresses it:
/// a [`ShapeDescriptor`] (extents, strides, memory order) carried by value and
/// an element offset into the buffer.
///
/// `Clone` is cheap and produces another view of the same elements; writes
/// through one view are visible through every other. Views created by
/// [`permute`](Tensor::permute), [`reshape`](Tensor::reshape) or
/// [`all_tensors_along_dimension`](Tensor::all_tensors_along_dimension) never
/// copy. Use [`deep_copy`](Tensor::deep_copy) or [`assign`](Tensor::assign)
/// to move element values.
///
/// Element-wise writes take `&self`: the buffer carries its own lock, so an
/// output tensor can be borrowed immutably by an operation invocation and
/// still be filled by the kernel.
#[derive(Clone)]
pub struct Tensor<T: TensorElement> {
    pub(crate) buffer: Buffer<T>,
    pub(crate) descriptor: ShapeDescriptor,
    pub(crate) offset: usize,
}

impl<T: TensorElement> Tensor<T> {
    /// Creates a row-major tensor from `data` and `shape`.
    ///
    /// Fails with `TensorCreationError` when `data.len()` differs from the
    /// product of `shape`.
    ///
    /// # Example
    /// ```
    /// use tensorops_core::Tensor;
    ///
    /// let t = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
    /// assert_eq!(t.shape(), &[2, 3]);
    /// assert_eq!(t.get(&[1, 0]).unwrap(), 4.0);
    /// ```
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> Result<Self, TensorOpsError> {
        Self::new_with_order(data, shape, MemoryOrder::RowMajor)
    }

    /// Creates a tensor whose buffer is laid out in `order`.
    ///
    /// `data` is the buffer content, so for `ColumnMajor` the first axis varies
    /// fastest in `data`.
    pub fn new_with_order(
        data: Vec<T>,
        shape: Vec<usize>,
        order: MemoryOrder,
    ) -> Result<Self, TensorOpsError> {
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(TensorOpsError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Ok(Tensor {
            buffer: Buffer::new(data),
            descriptor: ShapeDescriptor::contiguous(shape, order),
            offset: 0,
        })
    }

    /// Rank-0 tensor holding `value`.
    pub fn scalar(value: T) -> Self {
        Tensor {
            buffer: Buffer::new(vec![value]),
            descriptor: ShapeDescriptor::scalar(),
            offset: 0,
        }
    }

    /// Zero-filled tensor with the extents and order of `descriptor`.
    ///
    /// The new tensor is always dense; view strides in `descriptor` are not
    /// reproduced.
    pub fn from_descriptor(descriptor: &ShapeDescriptor) -> Self {
        let shape = descriptor.shape().to_vec();
        Tensor {
            buffer: Buffer::new(vec![T::zero(); descriptor.numel()]),
            descriptor: ShapeDescriptor::contiguous(shape, descriptor.order()),
            offset: 0,
        }
    }

    /// Builds a view over an existing buffer.
    pub(crate) fn view_of(buffer: Buffer<T>, descriptor: ShapeDescriptor, offset: usize) -> Self {
        Tensor {
            buffer,
            descriptor,
            offset,
        }
    }
}

impl<T: TensorElement> PartialEq for Tensor<T> {
    /// Two tensors are equal when they have the same shape and the same
    /// elements in flat order. Strides, order and buffer identity are ignored.
    fn eq(&self, other: &Self) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        match (self.to_vec(), other.to_vec()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: TensorElement> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Tensor");
        s.field("dtype", &T::DTYPE)
            .field("shape", &self.descriptor.shape())
            .field("strides", &self.descriptor.strides())
            .field("order", &self.descriptor.order().as_char())
            .field("offset", &self.offset);
        if self.numel() <= 16 {
            if let Ok(values) = self.to_vec() {
                s.field("data", &values);
            }
        }
        s.finish()
    }
}
