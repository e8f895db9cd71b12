use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::tensor::Tensor;

/// Tensors bound to a layer for one forward or backward call.
///
/// The layer never owns them. `params` is held mutably because a forward pass
/// may temporarily re-lay out the weight view (it is always restored before
/// the call returns).
#[derive(Debug)]
pub struct LayerTensors<'a, T: TensorElement> {
    pub input: Option<&'a Tensor<T>>,
    pub params: Option<&'a mut Tensor<T>>,
    pub bias: Option<&'a Tensor<T>>,
    pub output: Option<&'a Tensor<T>>,
    pub gradient_w: Option<&'a Tensor<T>>,
    pub gradient_b: Option<&'a Tensor<T>>,
    pub epsilon: Option<&'a Tensor<T>>,
    pub epsilon_next: Option<&'a Tensor<T>>,
}

impl<'a, T: TensorElement> Default for LayerTensors<'a, T> {
    fn default() -> Self {
        LayerTensors {
            input: None,
            params: None,
            bias: None,
            output: None,
            gradient_w: None,
            gradient_b: None,
            epsilon: None,
            epsilon_next: None,
        }
    }
}

impl<'a, T: TensorElement> LayerTensors<'a, T> {
    /// Shared view of the bound weights.
    pub fn weights(&self) -> Option<&Tensor<T>> {
        self.params.as_deref()
    }

    pub(crate) fn require_input(&self, layer: &str) -> Result<&'a Tensor<T>, TensorOpsError> {
        match self.input {
            Some(input) if !input.is_empty() => Ok(input),
            Some(_) => Err(TensorOpsError::bad_input(layer, "input is empty")),
            None => Err(TensorOpsError::bad_input(layer, "no input bound")),
        }
    }

    pub(crate) fn require_weights(&self, layer: &str) -> Result<&Tensor<T>, TensorOpsError> {
        self.weights()
            .ok_or_else(|| TensorOpsError::bad_params(layer, "no weights bound"))
    }

    pub(crate) fn require_bias(&self, layer: &str) -> Result<&'a Tensor<T>, TensorOpsError> {
        self.bias
            .ok_or_else(|| TensorOpsError::bad_params(layer, "no bias bound"))
    }

    pub(crate) fn require_output(&self, layer: &str) -> Result<&'a Tensor<T>, TensorOpsError> {
        match self.output {
            Some(output) if !output.is_empty() => Ok(output),
            Some(_) => Err(TensorOpsError::bad_output(layer, "output is empty")),
            None => Err(TensorOpsError::bad_output(layer, "no output bound")),
        }
    }
}

/// Checks a bias of shape `[out]` or `[1, out]`.
pub(crate) fn check_bias<T: TensorElement>(
    layer: &str,
    bias: &Tensor<T>,
    out_features: usize,
) -> Result<(), TensorOpsError> {
    let well_formed = match bias.shape() {
        [n] => *n == out_features,
        [1, n] => *n == out_features,
        [_, _] => false,
        _ => return Err(TensorOpsError::bad_rank(layer, "1 or 2 (bias)", bias.rank())),
    };
    if !well_formed {
        return Err(TensorOpsError::bad_shape(
            layer,
            format!("bias [{}] or [1, {}]", out_features, out_features),
            format!("{:?}", bias.shape()),
        ));
    }
    Ok(())
}

/// Capabilities of a layer: validation of the bound tensors, the forward
/// pass and the backward pass.
///
/// A caller binds tensors, runs [`Layer::validate_forward`] (or the three
/// validators in order) and then [`Layer::feed_forward`].
pub trait Layer<T: TensorElement> {
    fn name(&self) -> &'static str;

    fn validate_input(&self) -> Result<(), TensorOpsError>;

    fn validate_parameters(&self) -> Result<(), TensorOpsError>;

    fn validate_output(&self) -> Result<(), TensorOpsError>;

    fn validate_gradients(&self) -> Result<(), TensorOpsError>;

    /// Runs the forward pass into the bound output.
    fn feed_forward(&mut self) -> Result<(), TensorOpsError>;

    /// Runs the backward pass into the bound gradient tensors.
    fn back_propagate(&mut self) -> Result<(), TensorOpsError>;

    /// Input, parameters and output validation, stopping at the first failure.
    fn validate_forward(&self) -> Result<(), TensorOpsError> {
        self.validate_input()?;
        self.validate_parameters()?;
        self.validate_output()
    }
}
