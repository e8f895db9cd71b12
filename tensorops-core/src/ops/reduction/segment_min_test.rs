use super::*;
use crate::error::Status;
use crate::ops::declarable::{run_op, validate_all};
use crate::utils::testing::check_tensor_near;

fn ids(values: &[f32]) -> Tensor<f32> {
    Tensor::new(values.to_vec(), vec![values.len()]).unwrap()
}

fn inferred_output(inv: &OpInvocation<'_, f32>) -> Tensor<f32> {
    let mut arena = ShapeArena::new();
    let list = DeclarableOp::<f32>::calculate_output_shape(&SegmentMinOp, inv, &mut arena);
    arena.allocate_outputs::<f32>(&list).unwrap().remove(0)
}

#[test]
fn test_segment_min_column() -> Result<(), TensorOpsError> {
    let input = Tensor::new(vec![5.0f32, 3.0, 8.0, 1.0, 9.0], vec![5, 1])?;
    let seg = ids(&[0.0, 0.0, 1.0, 1.0, 2.0]);
    let inv = OpInvocation::new(vec![&input, &seg]);
    let output = inferred_output(&inv);
    assert_eq!(output.shape(), &[3, 1]);

    run_op(&SegmentMinOp, &inv.with_outputs(vec![&output]))?;
    check_tensor_near(&output, &[3, 1], &[3.0, 1.0, 9.0], 1e-6);
    Ok(())
}

#[test]
fn test_segment_min_rows_are_elementwise() -> Result<(), TensorOpsError> {
    let input = Tensor::new(
        vec![1.0f64, 9.0, 4.0, 2.0, 7.0, 3.0, 0.0, 5.0, -1.0],
        vec![3, 3],
    )?;
    let seg = Tensor::new(vec![0.0f64, 0.0, 1.0], vec![3])?;
    let output = Tensor::new(vec![-7.0f64; 6], vec![2, 3])?;
    segment_min(&input, &seg, &output)?;
    assert_eq!(output.to_vec()?, vec![1.0, 7.0, 3.0, 0.0, 5.0, -1.0]);
    Ok(())
}

#[test]
fn test_segment_min_vector_input() -> Result<(), TensorOpsError> {
    let input = Tensor::new(vec![4.0f32, 2.0, 6.0], vec![3])?;
    let seg = ids(&[0.0, 1.0, 1.0]);
    let output = Tensor::new(vec![0.0f32; 2], vec![2])?;
    segment_min(&input, &seg, &output)?;
    assert_eq!(output.to_vec()?, vec![4.0, 2.0]);
    Ok(())
}

#[test]
fn test_segment_min_gap_is_zero_filled() -> Result<(), TensorOpsError> {
    let input = Tensor::new(vec![3.0f32, 1.0, 6.0, 4.0], vec![4, 1])?;
    let seg = ids(&[0.0, 0.0, 2.0, 2.0]);
    let output = Tensor::new(vec![99.0f32; 3], vec![3, 1])?;
    segment_min(&input, &seg, &output)?;
    assert_eq!(output.to_vec()?, vec![1.0, 0.0, 4.0]);
    Ok(())
}

#[test]
fn test_unsorted_ids_fail_before_writing() -> Result<(), TensorOpsError> {
    let input = Tensor::new(vec![1.0f32, 2.0, 3.0], vec![3])?;
    let seg = ids(&[0.0, 2.0, 1.0]);
    let output = Tensor::new(vec![42.0f32; 3], vec![3])?;
    let err = segment_min(&input, &seg, &output).unwrap_err();
    assert_eq!(err.status(), Status::BadArguments);
    assert!(err.to_string().contains("2.0 > 1.0"));
    assert_eq!(output.to_vec()?, vec![42.0; 3]);
    Ok(())
}

#[test]
fn test_validate_input_statuses() -> Result<(), TensorOpsError> {
    let input = Tensor::new(vec![1.0f32; 6], vec![3, 2])?;
    let output = Tensor::new(vec![0.0f32; 2], vec![1, 2])?;

    let matrix_ids = Tensor::new(vec![0.0f32; 6], vec![3, 2])?;
    let inv = OpInvocation::new(vec![&input, &matrix_ids]).with_outputs(vec![&output]);
    assert_eq!(Status::from_result(&validate_all(&SegmentMinOp, &inv)), Status::BadRank);

    let short_ids = ids(&[0.0, 0.0]);
    let inv = OpInvocation::new(vec![&input, &short_ids]).with_outputs(vec![&output]);
    assert_eq!(Status::from_result(&validate_all(&SegmentMinOp, &inv)), Status::BadShape);

    let negative_ids = ids(&[-1.0, 0.0, 0.0]);
    let inv = OpInvocation::new(vec![&input, &negative_ids]).with_outputs(vec![&output]);
    assert_eq!(Status::from_result(&validate_all(&SegmentMinOp, &inv)), Status::BadArguments);

    let inv = OpInvocation::new(vec![&input]).with_outputs(vec![&output]);
    assert_eq!(Status::from_result(&validate_all(&SegmentMinOp, &inv)), Status::BadInput);
    Ok(())
}

#[test]
fn test_validate_output_shape() -> Result<(), TensorOpsError> {
    let input = Tensor::new(vec![1.0f32; 6], vec![3, 2])?;
    let seg = ids(&[0.0, 1.0, 1.0]);
    let wrong = Tensor::new(vec![0.0f32; 6], vec![3, 2])?;
    let inv = OpInvocation::new(vec![&input, &seg]).with_outputs(vec![&wrong]);
    assert_eq!(Status::from_result(&validate_all(&SegmentMinOp, &inv)), Status::BadOutput);

    let inv = OpInvocation::new(vec![&input, &seg]);
    assert_eq!(Status::from_result(&validate_all(&SegmentMinOp, &inv)), Status::BadOutput);
    Ok(())
}
