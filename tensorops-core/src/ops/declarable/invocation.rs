use crate::ops::traits::TensorElement;
use crate::tensor::Tensor;

/// Arguments of one operation call.
///
/// Built per call and dropped afterwards. Tensors are borrowed, never owned:
/// the caller allocates outputs (usually from the shapes returned by
/// [`DeclarableOp::calculate_output_shape`](super::DeclarableOp::calculate_output_shape))
/// and keeps them after the invocation is gone.
#[derive(Debug, Clone)]
pub struct OpInvocation<'a, T: TensorElement> {
    pub inputs: Vec<&'a Tensor<T>>,
    pub outputs: Vec<&'a Tensor<T>>,
    pub int_args: Vec<i64>,
    pub float_args: Vec<f64>,
    pub in_place: bool,
}

impl<'a, T: TensorElement> OpInvocation<'a, T> {
    /// Invocation over `inputs` with no outputs and no scalar arguments yet.
    pub fn new(inputs: Vec<&'a Tensor<T>>) -> Self {
        OpInvocation {
            inputs,
            outputs: Vec::new(),
            int_args: Vec::new(),
            float_args: Vec::new(),
            in_place: false,
        }
    }

    /// In-place invocation: the inputs double as outputs.
    pub fn new_in_place(inputs: Vec<&'a Tensor<T>>) -> Self {
        OpInvocation {
            outputs: inputs.clone(),
            inputs,
            int_args: Vec::new(),
            float_args: Vec::new(),
            in_place: true,
        }
    }

    pub fn with_outputs(mut self, outputs: Vec<&'a Tensor<T>>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_int_args(mut self, int_args: Vec<i64>) -> Self {
        self.int_args = int_args;
        self
    }

    pub fn with_float_args(mut self, float_args: Vec<f64>) -> Self {
        self.float_args = float_args;
        self
    }

    pub fn input(&self, index: usize) -> Option<&'a Tensor<T>> {
        self.inputs.get(index).copied()
    }

    pub fn output(&self, index: usize) -> Option<&'a Tensor<T>> {
        self.outputs.get(index).copied()
    }

    pub fn int_arg(&self, index: usize) -> Option<i64> {
        self.int_args.get(index).copied()
    }
}
