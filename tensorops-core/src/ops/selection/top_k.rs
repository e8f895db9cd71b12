use log::{trace, warn};

use crate::error::TensorOpsError;
use crate::ops::declarable::{ArgCount, DeclarableOp, OpDescriptor, OpInvocation};
use crate::ops::traits::TensorElement;
use crate::shape::{ShapeArena, ShapeDescriptor, ShapeList};
use crate::tensor::Tensor;

const OP_NAME: &str = "top_k";

/// Position and value of the first maximum of `values`.
fn arg_max<T: TensorElement>(values: &[T]) -> Option<(usize, T)> {
    let mut best: Option<(usize, T)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if !(v > b) => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

/// Candidate set of `k` (value, index) pairs chosen by first-fit replacement.
///
/// The slots start as the first `k` elements. Every later element replaces
/// the first slot it exceeds, which is not always the smallest slot: for
/// `[1, 2, 3, 4]` and `k = 2` the result is `{4, 2}`.
fn first_fit_candidates<T: TensorElement>(values: &[T], k: usize) -> Vec<(T, usize)> {
    let mut slots: Vec<(T, usize)> = values[..k].iter().copied().zip(0..k).collect();
    for (e, &v) in values.iter().enumerate().skip(k) {
        if let Some(slot) = slots.iter_mut().find(|(current, _)| v > *current) {
            *slot = (v, e);
        }
    }
    slots
}

/// Selects `k` large elements of `x` (flat order) into `values` and their
/// flat positions into `indices`.
///
/// `k = 1` is an exact arg-max with ties resolved by first occurrence. For
/// `k > 1` the first-fit candidate set is returned, sorted by descending value
/// when `need_sort` is set (stable, so equal values keep slot order).
/// `k = 0` or `k > x.numel()` is `BadArguments`.
pub fn top_k<T: TensorElement>(
    x: &Tensor<T>,
    k: usize,
    need_sort: bool,
    values: &Tensor<T>,
    indices: &Tensor<T>,
) -> Result<(), TensorOpsError> {
    let data = x.to_vec()?;
    if k == 0 || k > data.len() {
        return Err(TensorOpsError::bad_arguments(
            OP_NAME,
            format!("k must be in [1, {}], got {}", data.len(), k),
        ));
    }

    let mut selected = if k == 1 {
        match arg_max(&data) {
            Some((i, v)) => vec![(v, i)],
            None => Vec::new(),
        }
    } else {
        first_fit_candidates(&data, k)
    };
    if need_sort {
        selected.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    }
    trace!("top_k: k={} need_sort={} -> {:?}", k, need_sort, selected);

    let vals: Vec<T> = selected.iter().map(|&(v, _)| v).collect();
    let inds: Vec<T> = selected.iter().map(|&(_, i)| T::from_usize(i)).collect();
    values.copy_from_slice(&vals)?;
    indices.copy_from_slice(&inds)
}

/// Declarable form of [`top_k`]: one input, outputs `[values, indices]`,
/// integer arguments `[k, need_sort]` (defaults `1` and `true`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TopKOp;

impl TopKOp {
    fn k_arg<T: TensorElement>(inv: &OpInvocation<'_, T>) -> i64 {
        inv.int_arg(0).unwrap_or(1)
    }

    fn need_sort_arg<T: TensorElement>(inv: &OpInvocation<'_, T>) -> bool {
        inv.int_arg(1).map_or(true, |v| v != 0)
    }
}

impl<T: TensorElement> DeclarableOp<T> for TopKOp {
    fn descriptor(&self) -> OpDescriptor {
        OpDescriptor::new(OP_NAME, 1, 2)
            .configurable()
            .with_int_args(ArgCount::Variable)
    }

    /// Two vectors of length `k`. Without an integer argument `k` falls back to
    /// `1`, matching the dispatch default.
    fn calculate_output_shape(&self, inv: &OpInvocation<'_, T>, arena: &mut ShapeArena) -> ShapeList {
        if inv.int_args.is_empty() {
            warn!("top_k: shape inference without k; assuming k = 1");
        }
        let k = usize::try_from(Self::k_arg(inv)).unwrap_or(0);
        let mut list = ShapeList::new();
        for _ in 0..2 {
            list.push(arena.alloc(ShapeDescriptor::vector(k)));
        }
        list
    }

    fn validate_parameters(&self, inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        if inv.int_args.len() > 2 {
            return Err(TensorOpsError::bad_arguments(
                OP_NAME,
                format!("expected at most 2 integer arguments, got {}", inv.int_args.len()),
            ));
        }
        if !inv.float_args.is_empty() || inv.in_place {
            return Err(TensorOpsError::bad_arguments(
                OP_NAME,
                "no float arguments and no in-place execution",
            ));
        }
        let k = Self::k_arg(inv);
        let len = inv.input(0).map_or(0, |x| x.numel());
        if k <= 0 || k as usize > len {
            return Err(TensorOpsError::bad_arguments(
                OP_NAME,
                format!("k must be in [1, {}], got {}", len, k),
            ));
        }
        Ok(())
    }

    fn execute(&self, inv: &OpInvocation<'_, T>) -> Result<(), TensorOpsError> {
        let k = usize::try_from(Self::k_arg(inv)).map_err(|_| {
            TensorOpsError::bad_arguments(OP_NAME, format!("k must be positive, got {}", Self::k_arg(inv)))
        })?;
        top_k(
            inv.inputs[0],
            k,
            Self::need_sort_arg(inv),
            inv.outputs[0],
            inv.outputs[1],
        )
    }
}

#[cfg(test)]
#[path = "top_k_test.rs"]
mod tests;
