use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::tensor::Tensor;

/// Element-wise writes through a view.
///
/// All methods take `&self`; the writes land in the shared buffer and are
/// visible through every view of it.
impl<T: TensorElement> Tensor<T> {
    /// Sets every element of the view to `value`.
    pub fn fill(&self, value: T) -> Result<(), TensorOpsError> {
        let mut data = self.buffer.write()?;
        for o in self.offsets() {
            data[o] = value;
        }
        Ok(())
    }

    /// Applies `f` to every element of the view.
    pub fn map_inplace<F>(&self, f: F) -> Result<(), TensorOpsError>
    where
        F: Fn(T) -> T,
    {
        let mut data = self.buffer.write()?;
        for o in self.offsets() {
            data[o] = f(data[o]);
        }
        Ok(())
    }

    /// Writes `values` into the view in flat order.
    pub fn copy_from_slice(&self, values: &[T]) -> Result<(), TensorOpsError> {
        if values.len() != self.numel() {
            return Err(TensorOpsError::bad_shape(
                "copy_from_slice",
                format!("{} values", self.numel()),
                format!("{} values", values.len()),
            ));
        }
        let mut data = self.buffer.write()?;
        for (o, &v) in self.offsets().zip(values) {
            data[o] = v;
        }
        Ok(())
    }

    /// Deep element-wise copy of `source` into this view.
    ///
    /// Shapes must match exactly (`BadShape`). Strides and order may differ.
    /// The source is read completely before the first write, so overlapping
    /// views of the same buffer are copied as if the source were a snapshot.
    pub fn assign(&self, source: &Tensor<T>) -> Result<(), TensorOpsError> {
        if !self.is_same_shape(source) {
            return Err(TensorOpsError::bad_shape(
                "assign",
                format!("{:?}", self.shape()),
                format!("{:?}", source.shape()),
            ));
        }
        let values = source.to_vec()?;
        self.copy_from_slice(&values)
    }

    /// Exchanges the elements at flat positions `i` and `j`.
    pub fn swap(&self, i: usize, j: usize) -> Result<(), TensorOpsError> {
        let numel = self.numel();
        if i >= numel || j >= numel {
            return Err(TensorOpsError::IndexOutOfBounds {
                index: vec![i.max(j)],
                shape: vec![numel],
            });
        }
        if i == j {
            return Ok(());
        }
        let a = self.flat_offset(i)?;
        let b = self.flat_offset(j)?;
        self.buffer.write()?.swap(a, b);
        Ok(())
    }

    /// Exchanges every element of this view with the element at the same flat
    /// position of `other`.
    ///
    /// The views must have the same shape and should not overlap; they may
    /// belong to the same buffer. When the buffers differ both locks are taken
    /// in address order.
    pub fn swap_with(&self, other: &Tensor<T>) -> Result<(), TensorOpsError> {
        if !self.is_same_shape(other) {
            return Err(TensorOpsError::bad_shape(
                "swap_with",
                format!("{:?}", self.shape()),
                format!("{:?}", other.shape()),
            ));
        }
        if self.shares_buffer_with(other) {
            let mut data = self.buffer.write()?;
            for (a, b) in self.offsets().zip(other.offsets()) {
                data.swap(a, b);
            }
            return Ok(());
        }

        let (mut mine, mut theirs) = if self.buffer.addr() < other.buffer.addr() {
            let mine = self.buffer.write()?;
            let theirs = other.buffer.write()?;
            (mine, theirs)
        } else {
            let theirs = other.buffer.write()?;
            let mine = self.buffer.write()?;
            (mine, theirs)
        };
        for (a, b) in self.offsets().zip(other.offsets()) {
            std::mem::swap(&mut mine[a], &mut theirs[b]);
        }
        Ok(())
    }

    /// Adds `row` to every row of a 2-D tensor.
    ///
    /// `row` may have any rank as long as it holds exactly one element per
    /// column (`[cols]` or `[1, cols]`).
    pub fn add_row_vector(&self, row: &Tensor<T>) -> Result<(), TensorOpsError> {
        if self.rank() != 2 {
            return Err(TensorOpsError::bad_rank("add_row_vector", "2", self.rank()));
        }
        let cols = self.shape()[1];
        if row.numel() != cols {
            return Err(TensorOpsError::bad_shape(
                "add_row_vector",
                format!("{} elements", cols),
                format!("{} elements (shape {:?})", row.numel(), row.shape()),
            ));
        }
        let values = row.to_vec()?;
        let mut data = self.buffer.write()?;
        for (k, o) in self.offsets().enumerate() {
            data[o] += values[k % cols];
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "inplace_methods_test.rs"]
mod tests;
