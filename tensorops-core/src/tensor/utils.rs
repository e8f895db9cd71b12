use crate::types::MemoryOrder;

/// Calculates the row-major strides for a given shape.
/// Strides represent the number of elements to skip in the flattened data array
/// to move one step along each dimension.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Dense strides for `shape` in the given memory order.
///
/// shape = [2, 3], RowMajor    -> [3, 1]
/// shape = [2, 3], ColumnMajor -> [1, 2]
pub fn calculate_strides_for_order(shape: &[usize], order: MemoryOrder) -> Vec<usize> {
    match order {
        MemoryOrder::RowMajor => calculate_strides(shape),
        MemoryOrder::ColumnMajor => {
            let mut strides = vec![1; shape.len()];
            for i in 1..shape.len() {
                strides[i] = strides[i - 1] * shape[i - 1];
            }
            strides
        }
    }
}

/// Maps a possibly negative axis into `[0, rank)`.
pub fn normalize_axis(axis: i64, rank: usize) -> Option<usize> {
    let rank_i = rank as i64;
    let normalized = if axis < 0 { axis + rank_i } else { axis };
    if normalized < 0 || normalized >= rank_i {
        None
    } else {
        Some(normalized as usize)
    }
}

/// Converts a flat row-major index into logical coordinates of `shape`.
pub fn index_to_coord(index: usize, shape: &[usize]) -> Vec<usize> {
    let mut coord = vec![0; shape.len()];
    let mut remaining = index;
    for i in (0..shape.len()).rev() {
        let dim = shape[i];
        if dim > 0 {
            coord[i] = remaining % dim;
            remaining /= dim;
        }
    }
    coord
}

/// Buffer position of `coords` for a view starting at `offset`.
#[inline]
pub fn coord_to_offset(coords: &[usize], strides: &[usize], offset: usize) -> usize {
    offset
        + coords
            .iter()
            .zip(strides.iter())
            .map(|(&c, &s)| c * s)
            .sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_strides() {
        assert_eq!(calculate_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(calculate_strides(&[5]), vec![1]);
        assert_eq!(calculate_strides(&[]), Vec::<usize>::new());
    }

    #[test]
    fn test_calculate_strides_column_major() {
        assert_eq!(
            calculate_strides_for_order(&[2, 3, 4], MemoryOrder::ColumnMajor),
            vec![1, 2, 6]
        );
    }

    #[test]
    fn test_normalize_axis() {
        assert_eq!(normalize_axis(-1, 3), Some(2));
        assert_eq!(normalize_axis(2, 3), Some(2));
        assert_eq!(normalize_axis(3, 3), None);
        assert_eq!(normalize_axis(-4, 3), None);
        assert_eq!(normalize_axis(0, 0), None);
    }

    #[test]
    fn test_index_to_coord_and_back() {
        let shape = [2, 3, 4];
        let strides = calculate_strides(&shape);
        for i in 0..24 {
            let coord = index_to_coord(i, &shape);
            assert_eq!(coord_to_offset(&coord, &strides, 0), i);
        }
        assert_eq!(index_to_coord(23, &shape), vec![1, 2, 3]);
    }
}
