use std::fmt;
use thiserror::Error;

/// Status code reported by every validator and executor.
///
/// Exactly one status describes the outcome of a call. `Ok` only means that no
/// error was detected; it says nothing about the numerical quality of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    /// Missing or empty input.
    BadInput,
    /// Wrong dimensionality.
    BadRank,
    /// Dimension mismatch or non-integral derived extent.
    BadShape,
    /// Missing/malformed weights or bias, or an invalid permute/reshape argument.
    BadParams,
    /// Missing, empty or mis-shaped output.
    BadOutput,
    /// Malformed backward-pass buffers.
    BadGradients,
    /// Invalid scalar argument.
    BadArguments,
    /// The operation (or its backward pass) has no implementation.
    NotImplemented,
    /// Internal failure unrelated to the caller's arguments (poisoned buffer lock).
    Internal,
}

impl Status {
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    /// Collapses the outcome of any fallible call into its status code.
    pub fn from_result<R>(result: &Result<R, TensorOpsError>) -> Status {
        match result {
            Ok(_) => Status::Ok,
            Err(e) => e.status(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Ok => "OK",
            Status::BadInput => "BAD_INPUT",
            Status::BadRank => "BAD_RANK",
            Status::BadShape => "BAD_SHAPE",
            Status::BadParams => "BAD_PARAMS",
            Status::BadOutput => "BAD_OUTPUT",
            Status::BadGradients => "BAD_GRADIENTS",
            Status::BadArguments => "BAD_ARGUMENTS",
            Status::NotImplemented => "NOT_IMPLEMENTED",
            Status::Internal => "INTERNAL",
        };
        f.write_str(name)
    }
}

/// Custom error type for the TensorOps crate.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum TensorOpsError {
    #[error("Bad input for '{operation}': {reason}")]
    BadInput { operation: String, reason: String },

    #[error("Bad rank for '{operation}': expected {expected}, got {actual}")]
    BadRank {
        operation: String,
        expected: String,
        actual: usize,
    },

    #[error("Bad shape for '{operation}': expected {expected}, got {actual}")]
    BadShape {
        operation: String,
        expected: String,
        actual: String,
    },

    #[error("Bad parameters for '{operation}': {reason}")]
    BadParams { operation: String, reason: String },

    #[error("Bad output for '{operation}': {reason}")]
    BadOutput { operation: String, reason: String },

    #[error("Bad gradients for '{operation}': {reason}")]
    BadGradients { operation: String, reason: String },

    #[error("Bad arguments for '{operation}': {reason}")]
    BadArguments { operation: String, reason: String },

    #[error("Index out of bounds: index {index:?} for shape {shape:?}")]
    IndexOutOfBounds { index: Vec<usize>, shape: Vec<usize> },

    #[error("Invalid permutation: dims {dims:?} are not a valid permutation for rank {rank}")]
    InvalidPermutation { dims: Vec<usize>, rank: usize },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("'{operation}' is not implemented")]
    NotImplemented { operation: String },

    #[error("Failed to acquire {lock_type} lock: {reason}")]
    LockError { lock_type: String, reason: String },
}

impl TensorOpsError {
    /// The status code this error is reported as.
    pub fn status(&self) -> Status {
        match self {
            TensorOpsError::BadInput { .. } => Status::BadInput,
            TensorOpsError::BadRank { .. } => Status::BadRank,
            TensorOpsError::BadShape { .. } | TensorOpsError::TensorCreationError { .. } => {
                Status::BadShape
            }
            TensorOpsError::BadParams { .. } | TensorOpsError::InvalidPermutation { .. } => {
                Status::BadParams
            }
            TensorOpsError::BadOutput { .. } => Status::BadOutput,
            TensorOpsError::BadGradients { .. } => Status::BadGradients,
            TensorOpsError::BadArguments { .. } | TensorOpsError::IndexOutOfBounds { .. } => {
                Status::BadArguments
            }
            TensorOpsError::NotImplemented { .. } => Status::NotImplemented,
            TensorOpsError::LockError { .. } => Status::Internal,
        }
    }

    // Short constructors, mostly used by validators.

    pub fn bad_input(operation: &str, reason: impl Into<String>) -> Self {
        TensorOpsError::BadInput {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub fn bad_rank(operation: &str, expected: impl Into<String>, actual: usize) -> Self {
        TensorOpsError::BadRank {
            operation: operation.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    pub fn bad_shape(operation: &str, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        TensorOpsError::BadShape {
            operation: operation.to_string(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn bad_params(operation: &str, reason: impl Into<String>) -> Self {
        TensorOpsError::BadParams {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub fn bad_output(operation: &str, reason: impl Into<String>) -> Self {
        TensorOpsError::BadOutput {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub fn bad_arguments(operation: &str, reason: impl Into<String>) -> Self {
        TensorOpsError::BadArguments {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_implemented(operation: &str) -> Self {
        TensorOpsError::NotImplemented {
            operation: operation.to_string(),
        }
    }
}
