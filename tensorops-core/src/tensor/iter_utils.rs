/// Iterator over the buffer offsets of a strided view.
///
/// Offsets are produced in row-major order of the logical coordinates, which
/// is the flat-index order of every tensor regardless of its memory order.
/// Coordinates are advanced like an odometer, so no division is needed per
/// element.
#[derive(Debug, Clone)]
pub struct StridedOffsets<'a> {
    shape: &'a [usize],
    strides: &'a [usize],
    coord: Vec<usize>,
    current: usize,
    remaining: usize,
}

impl<'a> StridedOffsets<'a> {
    pub fn new(shape: &'a [usize], strides: &'a [usize], offset: usize) -> Self {
        let remaining = shape.iter().product();
        StridedOffsets {
            shape,
            strides,
            coord: vec![0; shape.len()],
            current: offset,
            remaining,
        }
    }
}

impl<'a> Iterator for StridedOffsets<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.current;
        self.remaining -= 1;
        if self.remaining > 0 {
            // Carry from the last axis towards the first.
            for axis in (0..self.shape.len()).rev() {
                self.coord[axis] += 1;
                self.current += self.strides[axis];
                if self.coord[axis] < self.shape[axis] {
                    break;
                }
                self.current -= self.strides[axis] * self.shape[axis];
                self.coord[axis] = 0;
            }
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for StridedOffsets<'a> {}
