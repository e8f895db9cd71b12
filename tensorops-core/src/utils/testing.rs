use crate::ops::traits::TensorElement;
use crate::tensor::Tensor;

/// Checks if a tensor matches an expected shape and data (row-major logical
/// order) within `tolerance`.
/// Panics if shapes differ or data differs significantly.
pub fn check_tensor_near<T: TensorElement>(
    actual: &Tensor<T>,
    expected_shape: &[usize],
    expected_data: &[T],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data = match actual.to_vec() {
        Ok(data) => data,
        Err(e) => panic!("Failed to read tensor data in check_tensor_near: {}", e),
    };
    assert_eq!(actual_data.len(), expected_data.len(), "Data length mismatch");

    for (i, (a, e)) in actual_data.iter().zip(expected_data.iter()).enumerate() {
        let diff = (a.as_f64() - e.as_f64()).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Installs `env_logger` for the current test binary. Safe to call many times.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
