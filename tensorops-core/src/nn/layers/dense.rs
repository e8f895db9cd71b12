use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Bernoulli, Distribution};

use crate::error::TensorOpsError;
use crate::nn::layer::{check_bias, Layer, LayerTensors};
use crate::ops::activation::Activation;
use crate::ops::linalg::gemm;
use crate::ops::traits::TensorElement;
use crate::tensor::Tensor;

const LAYER_NAME: &str = "dense";

/// Hyper-parameters of a fully connected layer.
///
/// `dropout` and `drop_connect` are drop probabilities in `[0, 1)`; zero
/// disables them. `seed` fixes the mask generator, otherwise it is seeded
/// from the OS.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DenseConfig {
    pub activation: Activation,
    pub dropout: f64,
    pub drop_connect: f64,
    pub seed: Option<u64>,
}

impl DenseConfig {
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_dropout(mut self, p: f64) -> Self {
        self.dropout = p;
        self
    }

    pub fn with_drop_connect(mut self, p: f64) -> Self {
        self.drop_connect = p;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Copy of `source` with each element kept with probability `1 - p` and
/// scaled by `1 / (1 - p)`, or zeroed.
fn inverted_dropout<T: TensorElement>(
    source: &Tensor<T>,
    p: f64,
    rng: &mut StdRng,
) -> Result<Tensor<T>, TensorOpsError> {
    let keep = Bernoulli::new(1.0 - p)
        .map_err(|e| TensorOpsError::bad_params(LAYER_NAME, format!("drop probability {}: {}", p, e)))?;
    let scale = T::from_f64(1.0 / (1.0 - p));
    let masked: Vec<T> = source
        .to_vec()?
        .into_iter()
        .map(|v| if keep.sample(&mut *rng) { v * scale } else { T::zero() })
        .collect();
    Tensor::new(masked, source.shape().to_vec())
}

fn check_probability(name: &str, p: f64) -> Result<(), TensorOpsError> {
    if !(0.0..1.0).contains(&p) {
        return Err(TensorOpsError::bad_params(
            LAYER_NAME,
            format!("{} probability must be in [0, 1), got {}", name, p),
        ));
    }
    Ok(())
}

/// Fully connected layer: `output = activation(input · weights + bias)` with
/// input `[N, in]`, weights `[in, out]`, bias `[1, out]` or `[out]` and output
/// `[N, out]`.
///
/// Dropout masks a copy of the input and drop-connect masks a copy of the
/// weights, so only the output is ever written.
#[derive(Debug)]
pub struct DenseLayer<'a, T: TensorElement> {
    config: DenseConfig,
    tensors: LayerTensors<'a, T>,
    rng: StdRng,
}

impl<'a, T: TensorElement> DenseLayer<'a, T> {
    pub fn new(config: DenseConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        DenseLayer {
            config,
            tensors: LayerTensors::default(),
            rng,
        }
    }

    pub fn config(&self) -> &DenseConfig {
        &self.config
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

    /// `[in, out]` of the bound weights.
    fn weight_dims(&self) -> Result<(usize, usize), TensorOpsError> {
        let weights = self.tensors.require_weights(LAYER_NAME)?;
        match *weights.shape() {
            [fan_in, fan_out] => Ok((fan_in, fan_out)),
            _ => Err(TensorOpsError::bad_rank(LAYER_NAME, "2 (weights [in, out])", weights.rank())),
        }
    }
}

impl<'a, T: TensorElement> Layer<T> for DenseLayer<'a, T> {
    fn name(&self) -> &'static str {
        LAYER_NAME
    }

    fn validate_input(&self) -> Result<(), TensorOpsError> {
        let input = self.tensors.require_input(LAYER_NAME)?;
        if input.rank() != 2 {
            return Err(TensorOpsError::bad_rank(LAYER_NAME, "2 (input [N, in])", input.rank()));
        }
        let (fan_in, _) = self.weight_dims()?;
        if input.shape()[1] != fan_in {
            return Err(TensorOpsError::bad_shape(
                LAYER_NAME,
                format!("{} input features", fan_in),
                format!("input of shape {:?}", input.shape()),
            ));
        }
        Ok(())
    }

    fn validate_parameters(&self) -> Result<(), TensorOpsError> {
        check_probability("dropout", self.config.dropout)?;
        check_probability("drop-connect", self.config.drop_connect)?;
        let bias = self.tensors.require_bias(LAYER_NAME)?;
        let (_, fan_out) = self.weight_dims()?;
        check_bias(LAYER_NAME, bias, fan_out)
    }

    fn validate_output(&self) -> Result<(), TensorOpsError> {
        let output = self.tensors.require_output(LAYER_NAME)?;
        if output.rank() != 2 {
            return Err(TensorOpsError::bad_rank(LAYER_NAME, "2 (output [N, out])", output.rank()));
        }
        let input = self.tensors.require_input(LAYER_NAME)?;
        let (_, fan_out) = self.weight_dims()?;
        if output.shape() != &[input.shape()[0], fan_out][..] {
            return Err(TensorOpsError::bad_output(
                LAYER_NAME,
                format!(
                    "expected [{}, {}], got {:?}",
                    input.shape()[0],
                    fan_out,
                    output.shape()
                ),
            ));
        }
        Ok(())
    }

    fn validate_gradients(&self) -> Result<(), TensorOpsError> {
        Err(TensorOpsError::not_implemented("dense backward"))
    }

    fn feed_forward(&mut self) -> Result<(), TensorOpsError> {
        self.validate_forward()?;
        let input = self.tensors.require_input(LAYER_NAME)?;
        let bias = self.tensors.require_bias(LAYER_NAME)?;
        let output = self.tensors.require_output(LAYER_NAME)?;
        let (dropout, drop_connect) = (self.config.dropout, self.config.drop_connect);
        debug!(
            "{}: input {:?}, output {:?}, dropout {}, drop-connect {}",
            LAYER_NAME,
            input.shape(),
            output.shape(),
            dropout,
            drop_connect
        );

        let x = if dropout > 0.0 {
            inverted_dropout(input, dropout, &mut self.rng)?
        } else {
            input.clone()
        };
        let weights = match self.tensors.params.as_deref() {
            Some(w) if drop_connect > 0.0 => inverted_dropout(w, drop_connect, &mut self.rng)?,
            Some(w) => w.clone(),
            None => return Err(TensorOpsError::bad_params(LAYER_NAME, "no weights bound")),
        };
        trace!("{}: masks applied", LAYER_NAME);

        gemm(&x, &weights, output, T::one(), T::zero())?;
        output.add_row_vector(bias)?;
        self.config.activation.apply_inplace(output)
    }

    fn back_propagate(&mut self) -> Result<(), TensorOpsError> {
        Err(TensorOpsError::not_implemented("dense backward"))
    }
}
