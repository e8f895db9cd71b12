use super::*;
use crate::error::Status;
use crate::ops::declarable::{run_op, validate_all};

fn outputs(k: usize) -> (Tensor<f32>, Tensor<f32>) {
    (
        Tensor::new(vec![0.0; k], vec![k]).unwrap(),
        Tensor::new(vec![0.0; k], vec![k]).unwrap(),
    )
}

#[test]
fn test_top_1_is_arg_max() -> Result<(), TensorOpsError> {
    let x = Tensor::new(vec![3.0f32, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0], vec![8])?;
    let (values, indices) = outputs(1);
    top_k(&x, 1, true, &values, &indices)?;
    assert_eq!(values.to_vec()?, vec![9.0]);
    assert_eq!(indices.to_vec()?, vec![5.0]);
    Ok(())
}

#[test]
fn test_top_1_first_occurrence() -> Result<(), TensorOpsError> {
    let x = Tensor::new(vec![2.0f32, 7.0, 7.0, 1.0], vec![2, 2])?;
    let (values, indices) = outputs(1);
    top_k(&x, 1, false, &values, &indices)?;
    assert_eq!(values.to_vec()?, vec![7.0]);
    assert_eq!(indices.to_vec()?, vec![1.0]);
    Ok(())
}

#[test]
fn test_first_fit_quirk_is_preserved() -> Result<(), TensorOpsError> {
    // The true top-2 would be [4, 3]; first-fit replacement keeps 2.
    let x = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0], vec![4])?;
    let (values, indices) = outputs(2);
    top_k(&x, 2, true, &values, &indices)?;
    assert_eq!(values.to_vec()?, vec![4.0, 2.0]);
    assert_eq!(indices.to_vec()?, vec![3.0, 1.0]);
    Ok(())
}

#[test]
fn test_sorted_and_unsorted_candidates() -> Result<(), TensorOpsError> {
    let x = Tensor::new(vec![5.0f32, 1.0, 3.0, 8.0, 7.0], vec![5])?;
    let (values, indices) = outputs(3);
    top_k(&x, 3, false, &values, &indices)?;
    // slots [5,1,3] -> 8 replaces 5 -> 7 replaces 1
    assert_eq!(values.to_vec()?, vec![8.0, 7.0, 3.0]);
    assert_eq!(indices.to_vec()?, vec![3.0, 4.0, 2.0]);

    let x = Tensor::new(vec![1.0f32, 3.0, 2.0], vec![3])?;
    top_k(&x, 3, true, &values, &indices)?;
    assert_eq!(values.to_vec()?, vec![3.0, 2.0, 1.0]);
    assert_eq!(indices.to_vec()?, vec![1.0, 2.0, 0.0]);
    Ok(())
}

#[test]
fn test_invalid_k() -> Result<(), TensorOpsError> {
    let x = Tensor::new(vec![1.0f32, 2.0], vec![2])?;
    let (values, indices) = outputs(1);
    assert_eq!(top_k(&x, 0, true, &values, &indices).unwrap_err().status(), Status::BadArguments);
    assert_eq!(top_k(&x, 3, true, &values, &indices).unwrap_err().status(), Status::BadArguments);

    let inv = OpInvocation::new(vec![&x])
        .with_outputs(vec![&values, &indices])
        .with_int_args(vec![-1, 1]);
    assert_eq!(Status::from_result(&validate_all(&TopKOp, &inv)), Status::BadArguments);
    Ok(())
}

#[test]
fn test_declarable_defaults() -> Result<(), TensorOpsError> {
    let x = Tensor::new(vec![0.5f64, 2.5, -1.0], vec![3])?;
    let inv = OpInvocation::new(vec![&x]);

    let mut arena = ShapeArena::new();
    let list = DeclarableOp::<f64>::calculate_output_shape(&TopKOp, &inv, &mut arena);
    assert_eq!(list.len(), 2);
    let outs = arena.allocate_outputs::<f64>(&list)?;
    assert_eq!(outs[0].shape(), &[1]);

    let inv = inv.with_outputs(outs.iter().collect());
    run_op(&TopKOp, &inv)?;
    assert_eq!(outs[0].to_vec()?, vec![2.5]);
    assert_eq!(outs[1].to_vec()?, vec![1.0]);
    Ok(())
}

#[test]
fn test_output_shape_must_match_k() -> Result<(), TensorOpsError> {
    let x = Tensor::new(vec![1.0f32, 2.0, 3.0], vec![3])?;
    let (values, indices) = outputs(2);
    let inv = OpInvocation::new(vec![&x])
        .with_outputs(vec![&values, &indices])
        .with_int_args(vec![3, 1]);
    assert_eq!(Status::from_result(&validate_all(&TopKOp, &inv)), Status::BadOutput);
    Ok(())
}
