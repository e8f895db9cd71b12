//! Shape metadata without a buffer, and the arena that shape inference
//! allocates it from.

use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::tensor::utils::{calculate_strides_for_order, normalize_axis};
use crate::tensor::Tensor;
use crate::types::MemoryOrder;

/// Rank, extents, strides and memory order of a tensor layout.
///
/// This is what shape inference produces and what every `Tensor` carries by
/// value. A descriptor produced by [`ShapeDescriptor::contiguous`] is dense in
/// its order; descriptors of permuted or reshaped views may carry arbitrary
/// strides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeDescriptor {
    shape: Vec<usize>,
    strides: Vec<usize>,
    order: MemoryOrder,
}

impl ShapeDescriptor {
    /// Dense layout of `shape` in the given memory order.
    pub fn contiguous(shape: Vec<usize>, order: MemoryOrder) -> Self {
        let strides = calculate_strides_for_order(&shape, order);
        ShapeDescriptor { shape, strides, order }
    }

    /// Dense row-major vector of `len` elements.
    pub fn vector(len: usize) -> Self {
        Self::contiguous(vec![len], MemoryOrder::RowMajor)
    }

    /// Rank-0 descriptor holding a single element.
    pub fn scalar() -> Self {
        Self::contiguous(Vec::new(), MemoryOrder::RowMajor)
    }

    /// Builds a descriptor from explicit strides (view layouts).
    pub fn from_parts(
        shape: Vec<usize>,
        strides: Vec<usize>,
        order: MemoryOrder,
    ) -> Result<Self, TensorOpsError> {
        if shape.len() != strides.len() {
            return Err(TensorOpsError::bad_shape(
                "ShapeDescriptor::from_parts",
                format!("{} strides", shape.len()),
                format!("{} strides", strides.len()),
            ));
        }
        Ok(ShapeDescriptor { shape, strides, order })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn order(&self) -> MemoryOrder {
        self.order
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements (`1` for rank 0).
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Extent of `axis`; negative axes count from the end.
    pub fn extent_at(&self, axis: i64) -> Option<usize> {
        normalize_axis(axis, self.rank()).map(|a| self.shape[a])
    }

    /// Rank 1, or rank >= 1 with exactly one extent greater than one.
    pub fn is_vector(&self) -> bool {
        match self.rank() {
            0 => false,
            1 => true,
            _ => self.shape.iter().filter(|&&d| d > 1).count() == 1,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.rank() == 0
    }

    /// True if any extent is zero (no element is addressable).
    pub fn is_empty(&self) -> bool {
        self.shape.iter().any(|&d| d == 0)
    }

    /// Dense with the last axis varying fastest. Extent-1 axes are ignored.
    pub fn is_row_major_dense(&self) -> bool {
        let mut expected = 1;
        for i in (0..self.rank()).rev() {
            let dim = self.shape[i];
            if dim == 0 {
                return true;
            }
            if dim != 1 {
                if self.strides[i] != expected {
                    return false;
                }
                expected *= dim;
            }
        }
        true
    }

    /// Dense with the first axis varying fastest. Extent-1 axes are ignored.
    pub fn is_column_major_dense(&self) -> bool {
        let mut expected = 1;
        for i in 0..self.rank() {
            let dim = self.shape[i];
            if dim == 0 {
                return true;
            }
            if dim != 1 {
                if self.strides[i] != expected {
                    return false;
                }
                expected *= dim;
            }
        }
        true
    }

    /// Dense in its own memory order.
    pub fn is_contiguous(&self) -> bool {
        match self.order {
            MemoryOrder::RowMajor => self.is_row_major_dense(),
            MemoryOrder::ColumnMajor => self.is_column_major_dense(),
        }
    }
}

/// Handle to a descriptor allocated in a [`ShapeArena`].
///
/// Ids carry the arena generation they were allocated in, so an id that
/// outlives [`ShapeArena::clear`] resolves to nothing instead of to a
/// descriptor allocated later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId {
    index: usize,
    generation: u64,
}

/// Ordered output shapes of one shape-inference call, one per declared output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeList {
    ids: Vec<ShapeId>,
}

impl ShapeList {
    pub fn new() -> Self {
        ShapeList { ids: Vec::new() }
    }

    pub fn push(&mut self, id: ShapeId) {
        self.ids.push(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ShapeId> {
        self.ids.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.ids.iter().copied()
    }
}

/// Caller-supplied workspace for shape inference.
///
/// Allocation is index based; descriptors are never freed one by one but
/// released together by [`ShapeArena::clear`].
#[derive(Debug, Default)]
pub struct ShapeArena {
    descriptors: Vec<ShapeDescriptor>,
    generation: u64,
}

impl ShapeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ShapeArena {
            descriptors: Vec::with_capacity(capacity),
            generation: 0,
        }
    }

    /// Stores `descriptor` and returns its handle.
    pub fn alloc(&mut self, descriptor: ShapeDescriptor) -> ShapeId {
        self.descriptors.push(descriptor);
        ShapeId {
            index: self.descriptors.len() - 1,
            generation: self.generation,
        }
    }

    pub fn get(&self, id: ShapeId) -> Option<&ShapeDescriptor> {
        if id.generation != self.generation {
            return None;
        }
        self.descriptors.get(id.index)
    }

    /// Resolves every id of `list`, failing on ids from a released generation.
    pub fn resolve(&self, list: &ShapeList) -> Result<Vec<&ShapeDescriptor>, TensorOpsError> {
        list.iter()
            .map(|id| {
                self.get(id).ok_or_else(|| {
                    TensorOpsError::bad_arguments(
                        "ShapeArena::resolve",
                        format!("shape id {:?} is not live in this arena", id),
                    )
                })
            })
            .collect()
    }

    /// Allocates one zero-filled tensor per shape of `list`.
    pub fn allocate_outputs<T: TensorElement>(
        &self,
        list: &ShapeList,
    ) -> Result<Vec<Tensor<T>>, TensorOpsError> {
        Ok(self
            .resolve(list)?
            .into_iter()
            .map(Tensor::from_descriptor)
            .collect())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Releases every descriptor at once. Previously issued ids become stale.
    pub fn clear(&mut self) {
        self.descriptors.clear();
        self.generation += 1;
    }
}
