use log::trace;

use crate::error::TensorOpsError;
use crate::ops::traits::TensorElement;
use crate::tensor::Tensor;

const OP_NAME: &str = "im2col";

/// Spatial extent produced by sliding a `kernel` window with `stride` over
/// `input` cells padded by `pad` on both sides.
///
/// `None` when the kernel does not fit or the windows do not tile the padded
/// input exactly, i.e. `(input - kernel + 2 * pad) / stride + 1` is not an
/// integer.
pub fn output_extent(input: usize, kernel: usize, stride: usize, pad: usize) -> Option<usize> {
    if stride == 0 || kernel == 0 {
        return None;
    }
    let span = (input + 2 * pad).checked_sub(kernel)?;
    if span % stride != 0 {
        return None;
    }
    Some(span / stride + 1)
}

/// Output extent and leading padding for "same" padding: the output has
/// `ceil(input / stride)` cells and the total padding
/// `max((out - 1) * stride + kernel - input, 0)` is split with the smaller
/// half first.
pub fn same_padding(input: usize, kernel: usize, stride: usize) -> (usize, usize) {
    let out = if stride == 0 { 0 } else { (input + stride - 1) / stride };
    let needed = (out.saturating_sub(1) * stride + kernel).saturating_sub(input);
    (out, needed / 2)
}

/// Window layout of one image-to-column expansion. `pad_h` and `pad_w` are the
/// leading (top and left) paddings; trailing padding is implied by `out_h`
/// and `out_w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Im2ColGeometry {
    pub kernel_h: usize,
    pub kernel_w: usize,
    pub stride_h: usize,
    pub stride_w: usize,
    pub pad_h: usize,
    pub pad_w: usize,
    pub out_h: usize,
    pub out_w: usize,
}

impl Im2ColGeometry {
    /// Number of column entries per output cell for `channels` input channels.
    pub fn patch_len(&self, channels: usize) -> usize {
        self.kernel_w * self.kernel_h * channels
    }
}

/// Expands an `[N, C, H, W]` input into a `[N * out_h * out_w, kW * kH * C]`
/// row-major matrix.
///
/// Row `(n * out_h + oy) * out_w + ox` holds the receptive field of output
/// cell `(oy, ox)` of image `n`. Column `kw + kW * (kh + kH * c)` holds input
/// `(n, c, oy * sH + kh - pad_h, ox * sW + kw - pad_w)`, or zero when that
/// position falls in the padding. This column order matches the weights
/// permuted to `[kW, kH, C_in, C_out]` and flattened.
pub fn im2col<T: TensorElement>(
    input: &Tensor<T>,
    geometry: &Im2ColGeometry,
) -> Result<Tensor<T>, TensorOpsError> {
    if input.rank() != 4 {
        return Err(TensorOpsError::bad_rank(OP_NAME, "4 ([N, C, H, W])", input.rank()));
    }
    let (n, c, h, w) = (input.shape()[0], input.shape()[1], input.shape()[2], input.shape()[3]);
    let g = geometry;
    let rows = n * g.out_h * g.out_w;
    let cols = g.patch_len(c);
    trace!(
        "im2col: input {:?} -> [{}, {}] with {:?}",
        input.shape(),
        rows,
        cols,
        g
    );

    // Dense row-major copy of the input: element (n, c, y, x) at ((n*C + c)*H + y)*W + x.
    let src = input.to_vec()?;
    let mut columns = vec![T::zero(); rows * cols];
    for img in 0..n {
        for oy in 0..g.out_h {
            for ox in 0..g.out_w {
                let row = (img * g.out_h + oy) * g.out_w + ox;
                let dst = &mut columns[row * cols..(row + 1) * cols];
                for ch in 0..c {
                    for kh in 0..g.kernel_h {
                        let y = (oy * g.stride_h + kh).checked_sub(g.pad_h).filter(|&y| y < h);
                        let Some(y) = y else { continue };
                        for kw in 0..g.kernel_w {
                            let x = (ox * g.stride_w + kw).checked_sub(g.pad_w).filter(|&x| x < w);
                            if let Some(x) = x {
                                let col = kw + g.kernel_w * (kh + g.kernel_h * ch);
                                dst[col] = src[((img * c + ch) * h + y) * w + x];
                            }
                        }
                    }
                }
            }
        }
    }
    Tensor::new(columns, vec![rows, cols])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;

    fn geometry(k: usize, s: usize, p: usize, out: usize) -> Im2ColGeometry {
        Im2ColGeometry {
            kernel_h: k,
            kernel_w: k,
            stride_h: s,
            stride_w: s,
            pad_h: p,
            pad_w: p,
            out_h: out,
            out_w: out,
        }
    }

    #[test]
    fn test_output_extent() {
        assert_eq!(output_extent(5, 3, 1, 0), Some(3));
        assert_eq!(output_extent(5, 3, 2, 1), Some(3));
        assert_eq!(output_extent(4, 3, 2, 0), None);
        assert_eq!(output_extent(2, 3, 1, 0), None);
        assert_eq!(output_extent(2, 3, 1, 1), Some(2));
    }

    #[test]
    fn test_same_padding() {
        assert_eq!(same_padding(5, 3, 1), (5, 1));
        assert_eq!(same_padding(5, 3, 2), (3, 1));
        assert_eq!(same_padding(4, 2, 2), (2, 0));
        assert_eq!(same_padding(4, 1, 1), (4, 0));
    }

    #[test]
    fn test_im2col_single_channel() -> Result<(), TensorOpsError> {
        // 3x3 image, 2x2 kernel, stride 1 -> 4 windows of 4 values
        let input = Tensor::new((1..=9).map(|v| v as f32).collect(), vec![1, 1, 3, 3])?;
        let cols = im2col(&input, &geometry(2, 1, 0, 2))?;
        assert_eq!(cols.shape(), &[4, 4]);
        assert_eq!(
            cols.to_vec()?,
            vec![
                1.0, 2.0, 4.0, 5.0, //
                2.0, 3.0, 5.0, 6.0, //
                4.0, 5.0, 7.0, 8.0, //
                5.0, 6.0, 8.0, 9.0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_im2col_padding_and_channels() -> Result<(), TensorOpsError> {
        // 2 channels of a 1x1 image, 3x3 kernel with padding 1: only the centre is real
        let input = Tensor::new(vec![5.0f64, 7.0], vec![1, 2, 1, 1])?;
        let cols = im2col(&input, &geometry(3, 1, 1, 1))?;
        assert_eq!(cols.shape(), &[1, 18]);
        let data = cols.to_vec()?;
        // centre: kw = 1, kh = 1 -> column 1 + 3 * (1 + 3 * c)
        assert_eq!(data[4], 5.0);
        assert_eq!(data[13], 7.0);
        assert_eq!(data.iter().filter(|&&v| v != 0.0).count(), 2);
        Ok(())
    }

    #[test]
    fn test_im2col_rank_error() -> Result<(), TensorOpsError> {
        let input = Tensor::new(vec![0.0f32; 9], vec![3, 3])?;
        let err = im2col(&input, &geometry(2, 1, 0, 2)).unwrap_err();
        assert_eq!(err.status(), Status::BadRank);
        Ok(())
    }
}
