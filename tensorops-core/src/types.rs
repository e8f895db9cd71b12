/// Defines the possible data types for Tensor elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
}

impl DType {
    pub fn size_of(&self) -> usize {
        match self {
            DType::F32 => std::mem::size_of::<f32>(),
            DType::F64 => std::mem::size_of::<f64>(),
        }
    }
}

/// Memory order of a dense layout.
///
/// Row-major (`'c'`) places the last axis contiguously, column-major (`'f'`)
/// the first one. The order of a view decides how `reshape` merges and
/// splits axes; flat element indices always enumerate logical coordinates
/// in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryOrder {
    #[default]
    RowMajor,
    ColumnMajor,
}

impl MemoryOrder {
    pub fn as_char(&self) -> char {
        match self {
            MemoryOrder::RowMajor => 'c',
            MemoryOrder::ColumnMajor => 'f',
        }
    }
}
