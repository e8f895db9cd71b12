use log::{debug, trace};

use crate::error::TensorOpsError;
use crate::nn::layer::{check_bias, Layer, LayerTensors};
use crate::ops::activation::Activation;
use crate::ops::conv::{im2col, output_extent, same_padding, Im2ColGeometry};
use crate::ops::linalg::gemm;
use crate::ops::traits::TensorElement;
use crate::tensor::{self, Tensor};
use crate::types::MemoryOrder;

const LAYER_NAME: &str = "convolution";

/// Axis order that turns `[C_out, C_in, kH, kW]` weights into `[kW, kH, C_in, C_out]`.
const WEIGHT_MATRIX_AXES: [usize; 4] = [3, 2, 1, 0];

/// Hyper-parameters of a 2-D convolution. `Default` is a 3x3 kernel with unit
/// stride, no padding and no activation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvolutionConfig {
    pub kernel_h: usize,
    pub kernel_w: usize,
    pub stride_h: usize,
    pub stride_w: usize,
    pub pad_h: usize,
    pub pad_w: usize,
    /// Derive padding so that the output extent is `ceil(input / stride)`.
    /// `pad_h` and `pad_w` are ignored when set.
    pub same_padding: bool,
    pub activation: Activation,
}

impl Default for ConvolutionConfig {
    fn default() -> Self {
        ConvolutionConfig::new(3, 3)
    }
}

impl ConvolutionConfig {
    pub fn new(kernel_h: usize, kernel_w: usize) -> Self {
        ConvolutionConfig {
            kernel_h,
            kernel_w,
            stride_h: 1,
            stride_w: 1,
            pad_h: 0,
            pad_w: 0,
            same_padding: false,
            activation: Activation::Identity,
        }
    }

    pub fn with_stride(mut self, stride_h: usize, stride_w: usize) -> Self {
        self.stride_h = stride_h;
        self.stride_w = stride_w;
        self
    }

    pub fn with_padding(mut self, pad_h: usize, pad_w: usize) -> Self {
        self.pad_h = pad_h;
        self.pad_w = pad_w;
        self
    }

    pub fn with_same_padding(mut self, same_padding: bool) -> Self {
        self.same_padding = same_padding;
        self
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Window layout for an `in_h` x `in_w` image.
    ///
    /// Fails with `BadShape` when the configured padding does not make the
    /// windows tile the image exactly.
    pub fn geometry(&self, in_h: usize, in_w: usize) -> Result<Im2ColGeometry, TensorOpsError> {
        let axis = |input: usize, kernel: usize, stride: usize, pad: usize, name: &str| {
            if self.same_padding {
                return Ok(same_padding(input, kernel, stride));
            }
            output_extent(input, kernel, stride, pad)
                .map(|out| (out, pad))
                .ok_or_else(|| {
                    TensorOpsError::bad_shape(
                        LAYER_NAME,
                        format!(
                            "integral ({} - {} + 2 * {}) / {} + 1 along {}",
                            input, kernel, pad, stride, name
                        ),
                        format!("input {} extent {}", name, input),
                    )
                })
        };
        let (out_h, pad_h) = axis(in_h, self.kernel_h, self.stride_h, self.pad_h, "height")?;
        let (out_w, pad_w) = axis(in_w, self.kernel_w, self.stride_w, self.pad_w, "width")?;
        Ok(Im2ColGeometry {
            kernel_h: self.kernel_h,
            kernel_w: self.kernel_w,
            stride_h: self.stride_h,
            stride_w: self.stride_w,
            pad_h,
            pad_w,
            out_h,
            out_w,
        })
    }
}

/// 2-D convolution over `[N, C_in, H, W]` inputs with `[C_out, C_in, kH, kW]`
/// weights, a `[1, C_out]` or `[C_out]` bias and an `[N, C_out, oH, oW]` output.
#[derive(Debug)]
pub struct ConvolutionLayer<'a, T: TensorElement> {
    config: ConvolutionConfig,
    tensors: LayerTensors<'a, T>,
}

impl<'a, T: TensorElement> ConvolutionLayer<'a, T> {
    pub fn new(config: ConvolutionConfig) -> Self {
        ConvolutionLayer {
            config,
            tensors: LayerTensors::default(),
        }
    }

    pub fn config(&self) -> &ConvolutionConfig {
        &self.config
    }

    pub fn tensors(&self) -> &LayerTensors<'a, T> {
        &self.tensors
    }

    pub fn bind_input(&mut self, input: &'a Tensor<T>) -> &mut Self {
        self.tensors.input = Some(input);
        self
    }

    pub fn bind_params(&mut self, weights: &'a mut Tensor<T>) -> &mut Self {
        self.tensors.params = Some(weights);
        self
    }

    pub fn bind_bias(&mut self, bias: &'a Tensor<T>) -> &mut Self {
        self.tensors.bias = Some(bias);
        self
    }

    pub fn bind_output(&mut self, output: &'a Tensor<T>) -> &mut Self {
        self.tensors.output = Some(output);
        self
    }

    pub fn bind_gradients(&mut self, gradient_w: &'a Tensor<T>, gradient_b: &'a Tensor<T>) -> &mut Self {
        self.tensors.gradient_w = Some(gradient_w);
        self.tensors.gradient_b = Some(gradient_b);
        self
    }

    pub fn bind_epsilons(&mut self, epsilon: &'a Tensor<T>, epsilon_next: &'a Tensor<T>) -> &mut Self {
        self.tensors.epsilon = Some(epsilon);
        self.tensors.epsilon_next = Some(epsilon_next);
        self
    }

    /// `[C_out, C_in, kH, kW]` of the bound weights.
    fn weight_dims(&self) -> Result<[usize; 4], TensorOpsError> {
        self.weight_dims_of(self.tensors.require_weights(LAYER_NAME)?)
    }

    fn weight_dims_of(&self, weights: &Tensor<T>) -> Result<[usize; 4], TensorOpsError> {
        match *weights.shape() {
            [c_out, c_in, kh, kw] => Ok([c_out, c_in, kh, kw]),
            _ => Err(TensorOpsError::bad_rank(
                LAYER_NAME,
                "4 (weights [C_out, C_in, kH, kW])",
                weights.rank(),
            )),
        }
    }

    /// GEMM, bias, activation and NCHW scatter, with the weights already laid
    /// out as a `[kW * kH * C_in, C_out]` matrix.
    fn forward_with_weight_matrix(
        &self,
        columns: &Tensor<T>,
        weight_matrix: &Tensor<T>,
        geometry: &Im2ColGeometry,
    ) -> Result<(), TensorOpsError> {
        let input = self.tensors.require_input(LAYER_NAME)?;
        let bias = self.tensors.require_bias(LAYER_NAME)?;
        let output = self.tensors.require_output(LAYER_NAME)?;
        let c_out = weight_matrix.shape()[1];

        let result = tensor::zeros(&[columns.shape()[0], c_out])?;
        gemm(columns, weight_matrix, &result, T::one(), T::zero())?;
        result.add_row_vector(bias)?;
        self.config.activation.apply_inplace(&result)?;

        // Rows of `result` run over (n, oy, ox); the output view is permuted to match.
        let nhwc = result.reshape(&[input.shape()[0], geometry.out_h, geometry.out_w, c_out])?;
        output.permute(&[0, 2, 3, 1])?.assign(&nhwc)
    }

    /// Lays `weights` out as the `[kW * kH * C_in, C_out]` matrix, runs the
    /// forward pass and puts the original descriptor back.
    ///
    /// Matrix rows follow the im2col column order `kw + kW * (kh + kH * c)`,
    /// which is the column-major flattening of the permuted `[kW, kH, C_in]`
    /// axes whatever the storage order of the weights. When the strides
    /// cannot express that matrix, it is gathered into a scratch tensor and
    /// the weights are only read.
    fn forward_with_relaid_weights(
        &self,
        weights: &mut Tensor<T>,
        columns: &Tensor<T>,
        geometry: &Im2ColGeometry,
    ) -> Result<(), TensorOpsError> {
        let [c_out, c_in, kh, kw] = self.weight_dims_of(weights)?;
        let rows = kw * kh * c_in;
        let original = weights.descriptor().clone();
        weights.permute_in_place(&WEIGHT_MATRIX_AXES)?;
        let forward = match weights.reshape_in_place_with_order(&[rows, c_out], MemoryOrder::ColumnMajor) {
            Ok(()) => {
                trace!("{}: weight matrix strides {:?}", LAYER_NAME, weights.strides());
                self.forward_with_weight_matrix(columns, weights, geometry)
            }
            Err(_) => {
                debug!(
                    "{}: weights with strides {:?} have no matrix view, gathering a copy",
                    LAYER_NAME,
                    original.strides()
                );
                weights.descriptor = original.clone();
                // Row-major [C_out, C_in, kH, kW] data is the column-major matrix buffer.
                Tensor::new_with_order(weights.to_vec()?, vec![rows, c_out], MemoryOrder::ColumnMajor)
                    .and_then(|matrix| self.forward_with_weight_matrix(columns, &matrix, geometry))
            }
        };
        weights.descriptor = original;
        forward
    }
}

impl<'a, T: TensorElement> Layer<T> for ConvolutionLayer<'a, T> {
    fn name(&self) -> &'static str {
        LAYER_NAME
    }

    fn validate_input(&self) -> Result<(), TensorOpsError> {
        let input = self.tensors.require_input(LAYER_NAME)?;
        if input.rank() != 4 {
            return Err(TensorOpsError::bad_rank(LAYER_NAME, "4 (input [N, C, H, W])", input.rank()));
        }
        let [_, c_in, _, _] = self.weight_dims()?;
        if input.shape()[1] != c_in {
            return Err(TensorOpsError::bad_shape(
                LAYER_NAME,
                format!("{} input channels", c_in),
                format!("input of shape {:?}", input.shape()),
            ));
        }
        Ok(())
    }

    fn validate_parameters(&self) -> Result<(), TensorOpsError> {
        let cfg = &self.config;
        if cfg.kernel_h == 0 || cfg.kernel_w == 0 || cfg.stride_h == 0 || cfg.stride_w == 0 {
            return Err(TensorOpsError::bad_params(
                LAYER_NAME,
                format!(
                    "kernel {}x{} and stride {}x{} must be positive",
                    cfg.kernel_h, cfg.kernel_w, cfg.stride_h, cfg.stride_w
                ),
            ));
        }
        let bias = self.tensors.require_bias(LAYER_NAME)?;
        let [c_out, _, kh, kw] = self.weight_dims()?;
        if (kh, kw) != (cfg.kernel_h, cfg.kernel_w) {
            return Err(TensorOpsError::bad_params(
                LAYER_NAME,
                format!(
                    "weights have a {}x{} kernel, layer is configured for {}x{}",
                    kh, kw, cfg.kernel_h, cfg.kernel_w
                ),
            ));
        }
        check_bias(LAYER_NAME, bias, c_out)
    }

    fn validate_output(&self) -> Result<(), TensorOpsError> {
        let output = self.tensors.require_output(LAYER_NAME)?;
        if output.rank() != 4 {
            return Err(TensorOpsError::bad_rank(LAYER_NAME, "4 (output [N, C, H, W])", output.rank()));
        }
        let input = self.tensors.require_input(LAYER_NAME)?;
        let [c_out, _, _, _] = self.weight_dims()?;
        let (out, inp) = (output.shape(), input.shape());
        if out[0] != inp[0] || out[1] != c_out {
            return Err(TensorOpsError::bad_output(
                LAYER_NAME,
                format!(
                    "expected batch {} and {} channels, got output of shape {:?}",
                    inp[0], c_out, out
                ),
            ));
        }
        let geometry = self.config.geometry(inp[2], inp[3])?;
        if (out[2], out[3]) != (geometry.out_h, geometry.out_w) {
            return Err(TensorOpsError::bad_shape(
                LAYER_NAME,
                format!("spatial extent [{}, {}]", geometry.out_h, geometry.out_w),
                format!("[{}, {}]", out[2], out[3]),
            ));
        }
        Ok(())
    }

    fn validate_gradients(&self) -> Result<(), TensorOpsError> {
        Err(TensorOpsError::not_implemented("convolution backward"))
    }

    /// Column expansion, weight matrix view, GEMM, bias, activation and a
    /// scatter into the NCHW output.
    ///
    /// The weights are permuted and reshaped in place for the multiply and
    /// put back to their original shape, strides and order before returning,
    /// also when a step in between fails. Weights whose strides have no
    /// matrix view are read into a scratch matrix instead.
    fn feed_forward(&mut self) -> Result<(), TensorOpsError> {
        self.validate_forward()?;
        let input = self.tensors.require_input(LAYER_NAME)?;
        let [c_out, c_in, kh, kw] = self.weight_dims()?;
        let geometry = self.config.geometry(input.shape()[2], input.shape()[3])?;
        debug!(
            "{}: input {:?}, weights [{}, {}, {}, {}], output [{}, {}]",
            LAYER_NAME,
            input.shape(),
            c_out,
            c_in,
            kh,
            kw,
            geometry.out_h,
            geometry.out_w
        );
        let columns = im2col(input, &geometry)?;

        let weights = match self.tensors.params.take() {
            Some(w) => w,
            None => return Err(TensorOpsError::bad_params(LAYER_NAME, "no weights bound")),
        };
        let result = self.forward_with_relaid_weights(&mut *weights, &columns, &geometry);
        self.tensors.params = Some(weights);
        result
    }

    fn back_propagate(&mut self) -> Result<(), TensorOpsError> {
        Err(TensorOpsError::not_implemented("convolution backward"))
    }
}

#[cfg(test)]
#[path = "convolution_test.rs"]
mod tests;
