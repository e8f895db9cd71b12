// src/ops/activation/mod.rs

use log::trace;

use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::tensor::Tensor;

/// Element-wise activation applied to a layer's output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Activation {
    #[default]
    Identity,
    /// `max(0, x)`
    Relu,
    /// `1 / (1 + e^-x)`
    Sigmoid,
    Tanh,
    /// `x` for positive inputs, `alpha * x` otherwise.
    LeakyRelu(f64),
}

impl Activation {
    pub fn name(&self) -> &'static str {
        match self {
            Activation::Identity => "identity",
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
            Activation::LeakyRelu(_) => "leaky_relu",
        }
    }

    /// Value of the activation at `x`.
    pub fn apply<T: TensorElement>(&self, x: T) -> T {
        match *self {
            Activation::Identity => x,
            Activation::Relu => {
                if x > T::zero() {
                    x
                } else {
                    T::zero()
                }
            }
            Activation::Sigmoid => T::one() / (T::one() + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::LeakyRelu(alpha) => {
                if x > T::zero() {
                    x
                } else {
                    T::from_f64(alpha) * x
                }
            }
        }
    }

    /// Applies the activation to every element of `tensor` (through its view).
    pub fn apply_inplace<T: TensorElement>(&self, tensor: &Tensor<T>) -> Result<(), TensorOpsError> {
        if *self == Activation::Identity {
            return Ok(());
        }
        trace!("activation {} over shape {:?}", self.name(), tensor.shape());
        let activation = *self;
        tensor.map_inplace(move |x| activation.apply(x))
    }
}
