// src/tensor/create.rs

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::tensor::Tensor;

/// Creates a new row-major tensor filled with zeros.
pub fn zeros<T: TensorElement>(shape: &[usize]) -> Result<Tensor<T>, TensorOpsError> {
    full(shape, T::zero())
}

/// Creates a new row-major tensor filled with ones.
pub fn ones<T: TensorElement>(shape: &[usize]) -> Result<Tensor<T>, TensorOpsError> {
    full(shape, T::one())
}

/// Creates a new row-major tensor filled with `value`.
pub fn full<T: TensorElement>(shape: &[usize], value: T) -> Result<Tensor<T>, TensorOpsError> {
    let numel: usize = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Creates a new zero-filled tensor with the shape and memory order of `other`.
pub fn zeros_like<T: TensorElement>(other: &Tensor<T>) -> Result<Tensor<T>, TensorOpsError> {
    Ok(Tensor::from_descriptor(other.descriptor()))
}

/// Vector `[0, 1, ..., n - 1]`.
pub fn arange<T: TensorElement>(n: usize) -> Result<Tensor<T>, TensorOpsError> {
    Tensor::new((0..n).map(T::from_usize).collect(), vec![n])
}

/// Uniform samples in `[0, 1)` drawn from `rng`.
pub fn rand_with<T: TensorElement, R: Rng + ?Sized>(
    shape: &[usize],
    rng: &mut R,
) -> Result<Tensor<T>, TensorOpsError> {
    let numel: usize = shape.iter().product();
    let data_vec: Vec<T> = (0..numel).map(|_| T::from_f64(rng.gen::<f64>())).collect();
    Tensor::new(data_vec, shape.to_vec())
}

/// Standard normal samples drawn from `rng`.
pub fn randn_with<T: TensorElement, R: Rng + ?Sized>(
    shape: &[usize],
    rng: &mut R,
) -> Result<Tensor<T>, TensorOpsError> {
    let numel: usize = shape.iter().product();
    let data_vec: Vec<T> = (0..numel)
        .map(|_| {
            let v: f64 = StandardNormal.sample(&mut *rng);
            T::from_f64(v)
        })
        .collect();
    Tensor::new(data_vec, shape.to_vec())
}

pub fn rand<T: TensorElement>(shape: &[usize]) -> Result<Tensor<T>, TensorOpsError> {
    rand_with(shape, &mut rand::thread_rng())
}

pub fn randn<T: TensorElement>(shape: &[usize]) -> Result<Tensor<T>, TensorOpsError> {
    randn_with(shape, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MemoryOrder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_constant_fills() -> Result<(), TensorOpsError> {
        let z = zeros::<f32>(&[2, 3])?;
        assert_eq!(z.shape(), &[2, 3]);
        assert!(z.to_vec()?.iter().all(|&v| v == 0.0));
        assert_eq!(ones::<f64>(&[2])?.to_vec()?, vec![1.0, 1.0]);
        assert_eq!(full(&[1, 2], 7.5f32)?.to_vec()?, vec![7.5, 7.5]);
        assert_eq!(arange::<f32>(4)?.to_vec()?, vec![0.0, 1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_zeros_like_keeps_order() -> Result<(), TensorOpsError> {
        let t = Tensor::new_with_order(vec![1.0f32; 6], vec![2, 3], MemoryOrder::ColumnMajor)?;
        let z = zeros_like(&t)?;
        assert_eq!(z.shape(), &[2, 3]);
        assert_eq!(z.order(), MemoryOrder::ColumnMajor);
        assert!(!z.shares_buffer_with(&t));
        Ok(())
    }

    #[test]
    fn test_seeded_random_is_reproducible() -> Result<(), TensorOpsError> {
        let a = rand_with::<f32, _>(&[10], &mut StdRng::seed_from_u64(3))?;
        let b = rand_with::<f32, _>(&[10], &mut StdRng::seed_from_u64(3))?;
        assert_eq!(a, b);
        assert!(a.to_vec()?.iter().all(|&v| (0.0..1.0).contains(&v)));

        let n = randn_with::<f64, _>(&[1000], &mut StdRng::seed_from_u64(5))?;
        let mean = n.to_vec()?.iter().sum::<f64>() / 1000.0;
        assert!(mean.abs() < 0.2);
        Ok(())
    }

    #[test]
    fn test_thread_rng_shapes() -> Result<(), TensorOpsError> {
        assert_eq!(rand::<f32>(&[2, 2])?.numel(), 4);
        assert_eq!(randn::<f64>(&[3])?.shape(), &[3]);
        Ok(())
    }
}
