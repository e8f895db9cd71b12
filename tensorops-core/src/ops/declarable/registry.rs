use std::collections::BTreeMap;

use log::{debug, warn};

use super::{run_op, DeclarableOp, OpDescriptor, OpInvocation};
use crate::error::{Status, TensorOpsError};
use crate::ops::permutation::RollOp;
use crate::ops::reduction::SegmentMinOp;
use crate::ops::selection::TopKOp;
use crate::ops::traits::TensorElement;
use crate::shape::{ShapeArena, ShapeList};

/// Name-keyed table of operations.
///
/// Registration is explicit: the caller builds a registry and adds operations
/// to it. There is no global table.
#[derive(Debug)]
pub struct OpRegistry<T: TensorElement> {
    ops: BTreeMap<String, Box<dyn DeclarableOp<T>>>,
}

impl<T: TensorElement> Default for OpRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TensorElement> OpRegistry<T> {
    pub fn new() -> Self {
        OpRegistry { ops: BTreeMap::new() }
    }

    /// Registry holding `segment_min`, `top_k` and `roll`.
    pub fn with_builtin_ops() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SegmentMinOp));
        registry.register(Box::new(TopKOp));
        registry.register(Box::new(RollOp));
        registry
    }

    /// Adds `op` under its descriptor name. An operation already registered
    /// under that name is replaced and returned.
    pub fn register(&mut self, op: Box<dyn DeclarableOp<T>>) -> Option<Box<dyn DeclarableOp<T>>> {
        let name = op.descriptor().name;
        let previous = self.ops.insert(name.to_string(), op);
        if previous.is_some() {
            warn!("operation '{}' registered twice; replacing the previous entry", name);
        } else {
            debug!("registered operation '{}'", name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&dyn DeclarableOp<T>> {
        self.ops.get(name).map(|op| op.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.ops.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn descriptor(&self, name: &str) -> Option<OpDescriptor> {
        self.get(name).map(|op| op.descriptor())
    }

    fn lookup(&self, name: &str) -> Result<&dyn DeclarableOp<T>, TensorOpsError> {
        self.get(name)
            .ok_or_else(|| TensorOpsError::not_implemented(&format!("unknown operation '{}'", name)))
    }

    /// Output shapes of the operation `name` for `inv`.
    pub fn calculate_output_shape(
        &self,
        name: &str,
        inv: &OpInvocation<'_, T>,
        arena: &mut ShapeArena,
    ) -> Result<ShapeList, TensorOpsError> {
        Ok(self.lookup(name)?.calculate_output_shape(inv, arena))
    }

    /// Validates and runs the operation `name`, propagating the first error.
    pub fn try_execute(&self, name: &str, inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        run_op(self.lookup(name)?, inv)
    }

    /// Validates and runs the operation `name`, reporting the outcome as a status.
    pub fn execute(&self, name: &str, inv: &OpInvocation<'_, T>) -> Status {
        let result = self.try_execute(name, inv);
        if let Err(e) = &result {
            debug!("{} failed: {}", name, e);
        }
        Status::from_result(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Tensor;

    #[test]
    fn test_builtin_names() {
        let registry = OpRegistry::<f32>::with_builtin_ops();
        assert_eq!(registry.names(), vec!["roll", "segment_min", "top_k"]);
        assert!(registry.contains("top_k"));
        assert!(!registry.contains("conv2d"));
        assert_eq!(registry.descriptor("top_k").map(|d| d.min_outputs), Some(2));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = OpRegistry::<f64>::with_builtin_ops();
        let previous = registry.register(Box::new(RollOp));
        assert!(previous.is_some());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_unknown_operation() -> Result<(), TensorOpsError> {
        let registry = OpRegistry::<f32>::new();
        let x = Tensor::new(vec![1.0f32], vec![1])?;
        let inv = OpInvocation::new(vec![&x]);
        assert_eq!(registry.execute("nope", &inv), Status::NotImplemented);
        let mut arena = ShapeArena::new();
        assert!(registry.calculate_output_shape("nope", &inv, &mut arena).is_err());
        Ok(())
    }

    #[test]
    fn test_dispatch_roll() -> Result<(), TensorOpsError> {
        let registry = OpRegistry::<f32>::with_builtin_ops();
        let x = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0], vec![5])?;
        let inv = OpInvocation::new(vec![&x]).with_int_args(vec![2]);

        let mut arena = ShapeArena::new();
        let shapes = registry.calculate_output_shape("roll", &inv, &mut arena)?;
        let outputs = arena.allocate_outputs::<f32>(&shapes)?;
        let inv = inv.with_outputs(outputs.iter().collect());

        assert_eq!(registry.execute("roll", &inv), Status::Ok);
        assert_eq!(outputs[0].to_vec()?, vec![4.0, 5.0, 1.0, 2.0, 3.0]);
        Ok(())
    }
}
