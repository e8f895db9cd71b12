use crate::error::{Status, TensorOpsError};
use crate::tensor::Tensor;
use crate::types::MemoryOrder;

fn weights(out_c: usize, in_c: usize, kh: usize, kw: usize) -> Result<Tensor<f32>, TensorOpsError> {
    let n = out_c * in_c * kh * kw;
    Tensor::new((0..n).map(|x| x as f32).collect(), vec![out_c, in_c, kh, kw])
}

#[test]
fn test_permute_in_place_sets_order() -> Result<(), TensorOpsError> {
    let mut w = weights(2, 3, 2, 2)?;
    w.permute_in_place(&[3, 2, 1, 0])?;
    assert_eq!(w.shape(), &[2, 2, 3, 2]);
    assert_eq!(w.order(), MemoryOrder::ColumnMajor);
    assert!(w.is_contiguous());
    Ok(())
}

#[test]
fn test_weight_round_trip_restores_descriptor() -> Result<(), TensorOpsError> {
    let mut w = weights(4, 3, 2, 5)?;
    let original = w.descriptor().clone();
    let values = w.to_vec()?;

    w.permute_in_place(&[3, 2, 1, 0])?;
    w.reshape_in_place(&[5 * 2 * 3, 4])?;
    assert_eq!(w.shape(), &[30, 4]);
    assert_eq!(w.strides(), &[1, 30]);

    w.reshape_in_place(&[5, 2, 3, 4])?;
    w.permute_in_place(&[3, 2, 1, 0])?;
    assert_eq!(w.descriptor(), &original);
    assert_eq!(w.to_vec()?, values);
    Ok(())
}

#[test]
fn test_weight_matrix_layout() -> Result<(), TensorOpsError> {
    // Row r of the matrix is kw + kW * (kh + kH * ic)
    let (out_c, in_c, kh, kw) = (2, 2, 2, 3);
    let mut w = weights(out_c, in_c, kh, kw)?;
    let reference = w.clone();
    w.permute_in_place(&[3, 2, 1, 0])?;
    w.reshape_in_place(&[kw * kh * in_c, out_c])?;
    for o in 0..out_c {
        for ic in 0..in_c {
            for y in 0..kh {
                for x in 0..kw {
                    let row = x + kw * (y + kh * ic);
                    assert_eq!(w.get(&[row, o])?, reference.get(&[o, ic, y, x])?);
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_reshape_in_place_failure_leaves_tensor_untouched() -> Result<(), TensorOpsError> {
    let mut t = Tensor::new((0..24).map(|x| x as f64).collect(), vec![2, 3, 4])?;
    t.permute_in_place(&[1, 0, 2])?;
    let before = t.descriptor().clone();
    let err = t.reshape_in_place(&[24]).unwrap_err();
    assert_eq!(err.status(), Status::BadParams);
    assert_eq!(t.descriptor(), &before);
    Ok(())
}

#[test]
fn test_reshape_in_place_with_order() -> Result<(), TensorOpsError> {
    let mut w = weights(2, 3, 2, 2)?;
    w.permute_in_place(&[3, 2, 1, 0])?;
    w.reshape_in_place_with_order(&[12, 2], MemoryOrder::ColumnMajor)?;
    assert_eq!(w.strides(), &[1, 12]);

    // Same logical values stored column-major: the permuted view is row-major
    // dense, so a column-major reading has no view.
    let data = weights(2, 3, 2, 2)?.permute(&[3, 2, 1, 0])?.to_vec()?;
    let mut f = Tensor::new_with_order(data, vec![2, 3, 2, 2], MemoryOrder::ColumnMajor)?;
    assert_eq!(f.to_vec()?, weights(2, 3, 2, 2)?.to_vec()?);
    f.permute_in_place(&[3, 2, 1, 0])?;
    let before = f.descriptor().clone();
    let err = f.reshape_in_place_with_order(&[12, 2], MemoryOrder::ColumnMajor).unwrap_err();
    assert_eq!(err.status(), Status::BadParams);
    assert_eq!(f.descriptor(), &before);
    Ok(())
}

#[test]
fn test_reshape_with_explicit_order() -> Result<(), TensorOpsError> {
    let t = Tensor::new((0..6).map(|x| x as f32).collect(), vec![6])?;
    let c = t.reshape_with_order(&[2, 3], MemoryOrder::RowMajor)?;
    let f = t.reshape_with_order(&[2, 3], MemoryOrder::ColumnMajor)?;
    assert_eq!(c.to_vec()?, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(f.to_vec()?, vec![0.0, 2.0, 4.0, 1.0, 3.0, 5.0]);
    assert_eq!(f.order(), MemoryOrder::ColumnMajor);
    Ok(())
}

#[test]
fn test_sub_views_write_through() -> Result<(), TensorOpsError> {
    let t = Tensor::new(vec![0.0f32; 8], vec![2, 2, 2])?;
    for (i, view) in t.all_tensors_along_dimension(&[0])?.iter().enumerate() {
        view.fill(i as f32)?;
    }
    assert_eq!(t.to_vec()?, vec![0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0]);
    Ok(())
}
