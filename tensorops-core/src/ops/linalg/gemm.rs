use log::trace;

use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::tensor::Tensor;

fn matrix_dims<T: TensorElement>(t: &Tensor<T>, what: &str) -> Result<(usize, usize), TensorOpsError> {
    if t.rank() != 2 {
        return Err(TensorOpsError::bad_rank(
            "gemm",
            format!("2 ({} must be a matrix)", what),
            t.rank(),
        ));
    }
    Ok((t.shape()[0], t.shape()[1]))
}

/// General matrix multiply: `c = alpha * a · b + beta * c`.
///
/// `a` is `[m, k]`, `b` is `[k, n]`, `c` is `[m, n]`. Any strides and memory
/// order are accepted; operands are read through their views. When `beta` is
/// zero the previous content of `c` is not read.
pub fn gemm<T: TensorElement>(
    a: &Tensor<T>,
    b: &Tensor<T>,
    c: &Tensor<T>,
    alpha: T,
    beta: T,
) -> Result<(), TensorOpsError> {
    let (m, k) = matrix_dims(a, "a")?;
    let (kb, n) = matrix_dims(b, "b")?;
    let (mc, nc) = matrix_dims(c, "c")?;
    if k != kb {
        return Err(TensorOpsError::bad_shape(
            "gemm",
            format!("b with {} rows", k),
            format!("b of shape {:?}", b.shape()),
        ));
    }
    if (mc, nc) != (m, n) {
        return Err(TensorOpsError::bad_shape(
            "gemm",
            format!("c of shape [{}, {}]", m, n),
            format!("{:?}", c.shape()),
        ));
    }
    trace!("gemm: [{}, {}] x [{}, {}]", m, k, k, n);

    let a_data = a.to_vec()?;
    let b_data = b.to_vec()?;
    let mut result = vec![T::zero(); m * n];
    for i in 0..m {
        let row = &mut result[i * n..(i + 1) * n];
        for p in 0..k {
            let a_ip = a_data[i * k + p];
            let b_row = &b_data[p * n..(p + 1) * n];
            for (r, &b_pj) in row.iter_mut().zip(b_row) {
                *r += a_ip * b_pj;
            }
        }
    }

    if beta == T::zero() {
        for r in result.iter_mut() {
            *r *= alpha;
        }
    } else {
        let previous = c.to_vec()?;
        for (r, &old) in result.iter_mut().zip(&previous) {
            *r = alpha * *r + beta * old;
        }
    }
    c.copy_from_slice(&result)
}

/// Matrix product `a · b` into a new row-major `[m, n]` tensor.
pub fn matmul<T: TensorElement>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>, TensorOpsError> {
    let (m, _) = matrix_dims(a, "a")?;
    let (_, n) = matrix_dims(b, "b")?;
    let c = crate::tensor::zeros(&[m, n])?;
    gemm(a, b, &c, T::one(), T::zero())?;
    Ok(c)
}
