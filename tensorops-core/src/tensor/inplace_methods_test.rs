use crate::error::TensorOpsError;
use crate::tensor::Tensor;

#[test]
fn test_fill_through_view() -> Result<(), TensorOpsError> {
    let t = Tensor::new(vec![0.0f32; 6], vec![2, 3])?;
    let rows = t.all_tensors_along_dimension(&[1])?;
    rows[1].fill(7.0)?;
    assert_eq!(t.to_vec()?, vec![0.0, 0.0, 0.0, 7.0, 7.0, 7.0]);
    Ok(())
}

#[test]
fn test_map_inplace() -> Result<(), TensorOpsError> {
    let t = Tensor::new(vec![-1.0f64, 2.0, -3.0], vec![3])?;
    t.map_inplace(|x| x.abs())?;
    assert_eq!(t.to_vec()?, vec![1.0, 2.0, 3.0]);
    Ok(())
}

#[test]
fn test_assign_into_permuted_view() -> Result<(), TensorOpsError> {
    let src = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], vec![3, 2])?;
    let dst = Tensor::new(vec![0.0f32; 6], vec![2, 3])?;
    dst.permute(&[1, 0])?.assign(&src)?;
    assert_eq!(dst.to_vec()?, vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    // Source untouched
    assert_eq!(src.to_vec()?, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    Ok(())
}

#[test]
fn test_assign_shape_mismatch() -> Result<(), TensorOpsError> {
    let a = Tensor::new(vec![0.0f32; 6], vec![2, 3])?;
    let b = Tensor::new(vec![0.0f32; 6], vec![3, 2])?;
    let err = a.assign(&b).unwrap_err();
    assert_eq!(err.status(), crate::error::Status::BadShape);
    Ok(())
}

#[test]
fn test_assign_overlapping_views() -> Result<(), TensorOpsError> {
    // Shift [1, 2, 3, 4] left by one inside the same buffer
    let t = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0], vec![4])?;
    let rows = t.reshape(&[2, 2])?.all_tensors_along_dimension(&[1])?;
    rows[0].assign(&rows[1])?;
    assert_eq!(t.to_vec()?, vec![3.0, 4.0, 3.0, 4.0]);
    Ok(())
}

#[test]
fn test_swap() -> Result<(), TensorOpsError> {
    let t = Tensor::new(vec![1.0f32, 2.0, 3.0], vec![3])?;
    t.swap(0, 2)?;
    assert_eq!(t.to_vec()?, vec![3.0, 2.0, 1.0]);
    t.swap(1, 1)?;
    assert_eq!(t.to_vec()?, vec![3.0, 2.0, 1.0]);
    assert!(matches!(
        t.swap(0, 3),
        Err(TensorOpsError::IndexOutOfBounds { .. })
    ));
    Ok(())
}

#[test]
fn test_swap_with_same_buffer() -> Result<(), TensorOpsError> {
    let t = Tensor::new((0..6).map(|x| x as f32).collect(), vec![3, 2])?;
    let rows = t.all_tensors_along_dimension(&[1])?;
    rows[0].swap_with(&rows[2])?;
    assert_eq!(t.to_vec()?, vec![4.0, 5.0, 2.0, 3.0, 0.0, 1.0]);
    Ok(())
}

#[test]
fn test_swap_with_other_buffer() -> Result<(), TensorOpsError> {
    let a = Tensor::new(vec![1.0f64, 2.0], vec![2])?;
    let b = Tensor::new(vec![3.0f64, 4.0], vec![2])?;
    a.swap_with(&b)?;
    assert_eq!(a.to_vec()?, vec![3.0, 4.0]);
    assert_eq!(b.to_vec()?, vec![1.0, 2.0]);
    // Reverse call order takes the locks in the same order
    b.swap_with(&a)?;
    assert_eq!(a.to_vec()?, vec![1.0, 2.0]);
    Ok(())
}

#[test]
fn test_add_row_vector() -> Result<(), TensorOpsError> {
    let m = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3])?;
    let bias = Tensor::new(vec![10.0f32, 20.0, 30.0], vec![1, 3])?;
    m.add_row_vector(&bias)?;
    assert_eq!(m.to_vec()?, vec![11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);

    let wrong = Tensor::new(vec![1.0f32, 2.0], vec![2])?;
    assert!(matches!(
        m.add_row_vector(&wrong),
        Err(TensorOpsError::BadShape { .. })
    ));
    Ok(())
}
