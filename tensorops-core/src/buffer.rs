use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::TensorOpsError;

/// Contiguous element storage shared by a tensor and all of its views.
///
/// Cloning a `Buffer` shares the allocation (cheap `Arc` clone). Reads and
/// writes go through an `RwLock`, so element-wise writes through a view are
/// visible to every other view of the same buffer.
pub struct Buffer<T> {
    data: Arc<RwLock<Vec<T>>>,
}

impl<T> Buffer<T> {
    /// Takes ownership of `data` as a new buffer.
    pub fn new(data: Vec<T>) -> Self {
        Buffer {
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Acquires a read lock on the elements.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, TensorOpsError> {
        self.data.read().map_err(|_| TensorOpsError::LockError {
            lock_type: "read".to_string(),
            reason: "tensor buffer lock poisoned".to_string(),
        })
    }

    /// Acquires a write lock on the elements.
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, TensorOpsError> {
        self.data.write().map_err(|_| TensorOpsError::LockError {
            lock_type: "write".to_string(),
            reason: "tensor buffer lock poisoned".to_string(),
        })
    }

    /// Number of elements in the allocation (not the logical length of a view).
    pub fn len(&self) -> Result<usize, TensorOpsError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, TensorOpsError> {
        Ok(self.len()? == 0)
    }

    /// True when both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Buffer<T>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Number of live handles (tensors and views) sharing this allocation.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.data)
    }

    /// Address of the allocation, used to order lock acquisition.
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.data) as *const () as usize
    }
}

impl<T> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        Buffer {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.data.read().map(|d| d.len()).ok();
        f.debug_struct("Buffer")
            .field("len", &len)
            .field("handles", &Arc::strong_count(&self.data))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_sharing() -> Result<(), TensorOpsError> {
        let a = Buffer::new(vec![1.0f32, 2.0, 3.0]);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.handle_count(), 2);
        b.write()?[1] = 20.0;
        assert_eq!(a.read()?[1], 20.0);
        assert_eq!(a.len()?, 3);
        Ok(())
    }

    #[test]
    fn test_distinct_buffers() {
        let a = Buffer::new(vec![0.0f64]);
        let b = Buffer::new(vec![0.0f64]);
        assert!(!a.ptr_eq(&b));
        assert_ne!(a.addr(), b.addr());
    }
}
