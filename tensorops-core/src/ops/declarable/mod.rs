//! The operation contract.
//!
//! An operation declares its arity ([`OpDescriptor`]), infers its output
//! shapes from input shapes and scalar arguments, validates a concrete
//! [`OpInvocation`] and finally executes its kernel. Dispatch by name goes
//! through an explicit [`OpRegistry`].

pub mod descriptor;
pub mod invocation;
pub mod registry;

pub use descriptor::{ArgCount, OpDescriptor};
pub use invocation::OpInvocation;
pub use registry::OpRegistry;

use std::fmt::Debug;

use log::debug;

use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::shape::{ShapeArena, ShapeList};

/// An operation that can be described, shape-inferred, validated and run.
///
/// Validators take `&self` and `&OpInvocation` and therefore cannot mutate
/// anything. [`run_op`] runs them in order and only calls
/// [`execute`](DeclarableOp::execute) when all of them passed; calling
/// `execute` directly on an unvalidated invocation has unspecified numeric
/// results.
pub trait DeclarableOp<T: TensorElement>: Debug + Send + Sync {
    fn descriptor(&self) -> OpDescriptor;

    /// Output shapes for `inv`, one per declared output, allocated in `arena`.
    ///
    /// Reads only input shapes and scalar arguments (never outputs) and never
    /// fails. Geometrically impossible results are emitted as zero extents and
    /// rejected later by [`validate_output`](DeclarableOp::validate_output).
    fn calculate_output_shape(&self, inv: &OpInvocation<'_, T>, arena: &mut ShapeArena) -> ShapeList;

    /// Checks the declared input count and that no input is empty.
    fn validate_input(&self, inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        let desc = self.descriptor();
        if inv.inputs.len() < desc.min_inputs {
            return Err(TensorOpsError::bad_input(
                desc.name,
                format!("expected at least {} inputs, got {}", desc.min_inputs, inv.inputs.len()),
            ));
        }
        if let Some(pos) = inv.inputs.iter().position(|t| t.is_empty()) {
            return Err(TensorOpsError::bad_input(
                desc.name,
                format!("input {} is empty (shape {:?})", pos, inv.inputs[pos].shape()),
            ));
        }
        Ok(())
    }

    /// Checks the scalar argument counts and in-place eligibility.
    fn validate_parameters(&self, inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        let desc = self.descriptor();
        if !desc.num_int_args.accepts(inv.int_args.len()) {
            return Err(TensorOpsError::bad_arguments(
                desc.name,
                format!("expected {:?} integer arguments, got {}", desc.num_int_args, inv.int_args.len()),
            ));
        }
        if !desc.num_float_args.accepts(inv.float_args.len()) {
            return Err(TensorOpsError::bad_arguments(
                desc.name,
                format!("expected {:?} float arguments, got {}", desc.num_float_args, inv.float_args.len()),
            ));
        }
        if inv.in_place && !desc.in_place {
            return Err(TensorOpsError::bad_arguments(desc.name, "operation cannot run in place"));
        }
        Ok(())
    }

    /// Checks the declared output count, then every output against the
    /// inferred shape: zero inferred extents are `BadShape`, a differing
    /// output shape is `BadOutput`.
    fn validate_output(&self, inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        let desc = self.descriptor();
        if inv.outputs.len() < desc.min_outputs {
            return Err(TensorOpsError::bad_output(
                desc.name,
                format!("expected at least {} outputs, got {}", desc.min_outputs, inv.outputs.len()),
            ));
        }
        let mut arena = ShapeArena::with_capacity(desc.min_outputs);
        let list = self.calculate_output_shape(inv, &mut arena);
        let expected = arena.resolve(&list)?;
        for (i, (shape, output)) in expected.iter().zip(inv.outputs.iter()).enumerate() {
            if shape.is_empty() {
                return Err(TensorOpsError::bad_shape(
                    desc.name,
                    "positive extents",
                    format!("inferred shape {:?} for output {}", shape.shape(), i),
                ));
            }
            if output.shape() != shape.shape() {
                return Err(TensorOpsError::bad_output(
                    desc.name,
                    format!("output {} has shape {:?}, expected {:?}", i, output.shape(), shape.shape()),
                ));
            }
        }
        Ok(())
    }

    /// Backward-pass buffer checks. No operation defines them yet.
    fn validate_gradients(&self, _inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        Err(TensorOpsError::not_implemented(self.descriptor().name))
    }

    /// Runs the kernel, writing into the invocation's outputs.
    fn execute(&self, inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError>;

    fn execute_backward(&self, _inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        Err(TensorOpsError::not_implemented(self.descriptor().name))
    }
}

/// Runs `validate_input`, `validate_parameters` and `validate_output`,
/// stopping at the first failure.
pub fn validate_all<T: TensorElement>(
    op: &dyn DeclarableOp<T>,
    inv: &OpInvocation<'_, T>,
) -> Result<(), TensorOpsError> {
    op.validate_input(inv)?;
    op.validate_parameters(inv)?;
    op.validate_output(inv)
}

/// Validates `inv` and, if every validator passed, executes `op`.
pub fn run_op<T: TensorElement>(
    op: &dyn DeclarableOp<T>,
    inv: &OpInvocation<'_, T>,
) -> Result<(), TensorOpsError> {
    let name = op.descriptor().name;
    debug!(
        "{}: {} inputs, {} outputs, int args {:?}, float args {:?}, in_place={}",
        name,
        inv.inputs.len(),
        inv.outputs.len(),
        inv.int_args,
        inv.float_args,
        inv.in_place
    );
    validate_all(op, inv)?;
    op.execute(inv)
}

/// Validates backward-pass buffers and runs `execute_backward`.
pub fn run_backward<T: TensorElement>(
    op: &dyn DeclarableOp<T>,
    inv: &OpInvocation<'_, T>,
) -> Result<(), TensorOpsError> {
    validate_all(op, inv)?;
    op.validate_gradients(inv)?;
    op.execute_backward(inv)
}
