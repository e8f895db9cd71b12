use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::tensor::Tensor;

/// Fills the tensor with zeros. Operates in place through the view.
pub fn zeros_<T: TensorElement>(tensor: &Tensor<T>) -> Result<(), TensorOpsError> {
    tensor.fill(T::zero())
}

/// Fills the tensor with ones. Operates in place through the view.
pub fn ones_<T: TensorElement>(tensor: &Tensor<T>) -> Result<(), TensorOpsError> {
    tensor.fill(T::one())
}

/// Fills the tensor with samples from `U(low, high)`.
pub fn uniform_<T: TensorElement, R: Rng + ?Sized>(
    tensor: &Tensor<T>,
    low: f64,
    high: f64,
    rng: &mut R,
) -> Result<(), TensorOpsError> {
    if !(low < high) {
        return Err(TensorOpsError::bad_arguments(
            "uniform_",
            format!("empty range [{}, {})", low, high),
        ));
    }
    let dist = Uniform::new(low, high);
    let values: Vec<T> = (0..tensor.numel())
        .map(|_| T::from_f64(dist.sample(&mut *rng)))
        .collect();
    tensor.copy_from_slice(&values)
}

/// `(fan_in, fan_out)` of a weight tensor.
///
/// Rank-2 tensors are dense weights laid out `[in, out]`. Rank-3 and higher
/// are convolution weights `[out, in, k...]` whose receptive field multiplies
/// both fans.
pub fn calculate_fan_in_and_fan_out<T: TensorElement>(
    tensor: &Tensor<T>,
) -> Result<(usize, usize), TensorOpsError> {
    match *tensor.shape() {
        [fan_in, fan_out] => Ok((fan_in, fan_out)),
        [out_channels, in_channels, ref kernel @ ..] if !kernel.is_empty() => {
            let receptive: usize = kernel.iter().product();
            Ok((in_channels * receptive, out_channels * receptive))
        }
        _ => Err(TensorOpsError::bad_rank(
            "calculate_fan_in_and_fan_out",
            ">= 2",
            tensor.rank(),
        )),
    }
}

/// Kaiming (He) uniform initialization for ReLU networks:
/// `U(-b, b)` with `b = sqrt(6 / fan_in)`.
pub fn kaiming_uniform_<T: TensorElement, R: Rng + ?Sized>(
    tensor: &Tensor<T>,
    rng: &mut R,
) -> Result<(), TensorOpsError> {
    let (fan_in, _) = calculate_fan_in_and_fan_out(tensor)?;
    if fan_in == 0 {
        return Err(TensorOpsError::bad_shape("kaiming_uniform_", "fan_in > 0", "fan_in = 0"));
    }
    let bound = (6.0 / fan_in as f64).sqrt();
    debug!("kaiming_uniform_: shape {:?}, bound {}", tensor.shape(), bound);
    uniform_(tensor, -bound, bound, rng)
}

/// Xavier (Glorot) uniform initialization:
/// `U(-b, b)` with `b = sqrt(6 / (fan_in + fan_out))`.
pub fn xavier_uniform_<T: TensorElement, R: Rng + ?Sized>(
    tensor: &Tensor<T>,
    rng: &mut R,
) -> Result<(), TensorOpsError> {
    let (fan_in, fan_out) = calculate_fan_in_and_fan_out(tensor)?;
    if fan_in + fan_out == 0 {
        return Err(TensorOpsError::bad_shape(
            "xavier_uniform_",
            "fan_in + fan_out > 0",
            "0",
        ));
    }
    let bound = (6.0 / (fan_in + fan_out) as f64).sqrt();
    debug!("xavier_uniform_: shape {:?}, bound {}", tensor.shape(), bound);
    uniform_(tensor, -bound, bound, rng)
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
