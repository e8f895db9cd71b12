use tensorops_core::ops::declarable::{OpInvocation, OpRegistry};
use tensorops_core::{ShapeArena, Tensor, TensorElement};

#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Helper to create a row-major test tensor.
#[allow(dead_code)]
pub fn create_test_tensor<T: TensorElement>(data: Vec<T>, shape: Vec<usize>) -> Tensor<T> {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}

/// Output tensors for `name` allocated from its inferred shapes.
#[allow(dead_code)]
pub fn infer_outputs<T: TensorElement>(
    registry: &OpRegistry<T>,
    name: &str,
    inv: &OpInvocation<'_, T>,
) -> Vec<Tensor<T>> {
    let mut arena = ShapeArena::new();
    let shapes = registry
        .calculate_output_shape(name, inv, &mut arena)
        .expect("shape inference failed");
    arena
        .allocate_outputs(&shapes)
        .expect("output allocation failed")
}
