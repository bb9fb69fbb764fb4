use std::sync::Arc;

use ndarray::{Array2, ArrayView2};
use rustfft::{num_complex::Complex64, Fft, FftPlanner};

use super::{InputDefect, Result};

/// Full linear 2D convolution of fixed size images with a fixed kernel
///
/// Both operands are zero-padded to `(h + kh - 1, w + kw - 1)` so the circular
/// convolution computed in the frequency domain has no wraparound. The output is the
/// `(h, w)` window starting at `(kh/2, kw/2)`, which anchors the kernel center on each
/// output pixel.
pub struct FftConvolver {
    shape: (usize, usize),
    padded: (usize, usize),
    offset: (usize, usize),
    row_fft: Arc<dyn Fft<f64>>,
    col_fft: Arc<dyn Fft<f64>>,
    row_ifft: Arc<dyn Fft<f64>>,
    col_ifft: Arc<dyn Fft<f64>>,
    kernel_spectrum: Vec<Complex64>,
}

impl FftConvolver {
    /// Plans the transforms for `(height, width)` images and caches the kernel spectrum
    ///
    /// Fails with [InputDefect::Empty] if any image or kernel dimension is zero.
    pub fn new(shape: (usize, usize), kernel: ArrayView2<'_, f64>) -> Result<Self> {
        let (h, w) = shape;
        let (kh, kw) = kernel.dim();
        if [h, w, kh, kw].contains(&0) {
            return Err(InputDefect::Empty.into());
        }
        let padded = (h + kh - 1, w + kw - 1);
        let (fh, fw) = padded;

        let mut planner = FftPlanner::new();
        let mut convolver = Self {
            shape,
            padded,
            offset: (kh / 2, kw / 2),
            row_fft: planner.plan_fft_forward(fw),
            col_fft: planner.plan_fft_forward(fh),
            row_ifft: planner.plan_fft_inverse(fw),
            col_ifft: planner.plan_fft_inverse(fh),
            kernel_spectrum: Vec::new(),
        };
        convolver.kernel_spectrum = convolver.spectrum(kernel);
        log::debug!("FFT convolution of {h}x{w} with {kh}x{kw} padded to {fh}x{fw}");
        Ok(convolver)
    }
    /// Padded transform size `(rows, columns)`
    pub fn padded_shape(&self) -> (usize, usize) {
        self.padded
    }
    /// Convolves one image channel with the kernel
    ///
    /// Fails with [InputDefect::ChannelShape] unless the channel has the shape the
    /// convolver was planned for.
    pub fn convolve<A>(&self, channel: ArrayView2<'_, A>) -> Result<Array2<f64>>
    where
        A: Copy + Into<f64>,
    {
        if channel.dim() != self.shape {
            return Err(InputDefect::ChannelShape {
                expected: self.shape,
                found: channel.dim(),
            }
            .into());
        }
        let (h, w) = self.shape;
        let (fh, fw) = self.padded;
        let (oy, ox) = self.offset;

        let mut spectrum = self.spectrum(channel);
        spectrum
            .iter_mut()
            .zip(&self.kernel_spectrum)
            .for_each(|(s, k)| *s *= k);
        let data = self.inverse(spectrum);

        let norm = 1. / (fh * fw) as f64;
        Ok(Array2::from_shape_fn((h, w), |(i, j)| {
            data[(i + oy) * fw + j + ox].re * norm
        }))
    }
    /// Forward 2D transform of `values` zero-padded to the convolution size
    ///
    /// The spectrum is left transposed (column major) since it is only ever multiplied
    /// pointwise and handed back to [FftConvolver::inverse].
    fn spectrum<A>(&self, values: ArrayView2<'_, A>) -> Vec<Complex64>
    where
        A: Copy + Into<f64>,
    {
        let (fh, fw) = self.padded;
        let mut data = vec![Complex64::new(0., 0.); fh * fw];
        for ((i, j), &v) in values.indexed_iter() {
            data[i * fw + j] = Complex64::new(v.into(), 0.);
        }
        data.chunks_exact_mut(fw)
            .for_each(|row| self.row_fft.process(row));
        let mut data = transpose(&data, fh, fw);
        data.chunks_exact_mut(fh)
            .for_each(|col| self.col_fft.process(col));
        data
    }
    /// Unnormalized inverse of [FftConvolver::spectrum], back in row major order
    fn inverse(&self, mut spectrum: Vec<Complex64>) -> Vec<Complex64> {
        let (fh, fw) = self.padded;
        spectrum
            .chunks_exact_mut(fh)
            .for_each(|col| self.col_ifft.process(col));
        let mut data = transpose(&spectrum, fw, fh);
        data.chunks_exact_mut(fw)
            .for_each(|row| self.row_ifft.process(row));
        data
    }
}

/// Transposes a row major `rows x cols` buffer
fn transpose(data: &[Complex64], rows: usize, cols: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0., 0.); data.len()];
    for r in 0..rows {
        for c in 0..cols {
            out[c * rows + r] = data[r * cols + c];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2};

    use super::*;
    use crate::BlurError;

    /// Direct full convolution cropped the same way
    fn direct(image: &Array2<f64>, kernel: &Array2<f64>) -> Array2<f64> {
        let (h, w) = image.dim();
        let (kh, kw) = kernel.dim();
        let (oy, ox) = (kh / 2, kw / 2);
        Array2::from_shape_fn((h, w), |(i, j)| {
            let (y, x) = (i + oy, j + ox);
            let mut acc = 0.;
            for u in 0..kh {
                for v in 0..kw {
                    if y >= u && x >= v && y - u < h && x - v < w {
                        acc += kernel[[u, v]] * image[[y - u, x - v]];
                    }
                }
            }
            acc
        })
    }

    #[test]
    fn padded_size() {
        let kernel = Array2::<f64>::zeros((5, 3));
        let convolver = FftConvolver::new((10, 20), kernel.view()).unwrap();
        assert_eq!(convolver.padded_shape(), (14, 22));
    }

    #[test]
    fn matches_direct_convolution() {
        let image = Array2::from_shape_fn((7, 9), |(i, j)| ((i * 9 + j) % 11) as f64);
        let kernel = array![[0., 1., 2.], [3., 4., 5.], [6., 7., 8.]];
        let convolver = FftConvolver::new(image.dim(), kernel.view()).unwrap();
        let fft = convolver.convolve(image.view()).unwrap();
        let reference = direct(&image, &kernel);
        fft.iter()
            .zip(reference.iter())
            .for_each(|(a, b)| assert!((a - b).abs() < 1e-9, "{a} != {b}"));
    }

    #[test]
    fn rectangular_kernel() {
        let image = Array2::from_shape_fn((6, 5), |(i, j)| (i as f64 - j as f64).powi(2));
        let kernel = array![[1., 0., 0., 0., 2.], [0., 3., 0., 1., 0.]];
        let convolver = FftConvolver::new(image.dim(), kernel.view()).unwrap();
        let fft = convolver.convolve(image.view()).unwrap();
        let reference = direct(&image, &kernel);
        fft.iter()
            .zip(reference.iter())
            .for_each(|(a, b)| assert!((a - b).abs() < 1e-9, "{a} != {b}"));
    }

    #[test]
    fn off_center_impulse_shifts() {
        // impulse one pixel right of center moves content one pixel right
        let mut kernel = Array2::<f64>::zeros((3, 3));
        kernel[[1, 2]] = 1.;
        let image = Array2::from_shape_fn((4, 4), |(i, j)| (i * 4 + j) as f64);
        let out = FftConvolver::new(image.dim(), kernel.view())
            .unwrap()
            .convolve(image.view())
            .unwrap();
        for i in 0..4 {
            assert!(out[[i, 0]].abs() < 1e-9);
            for j in 1..4 {
                assert!((out[[i, j]] - image[[i, j - 1]]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn channel_must_match_planned_shape() {
        let kernel = Array2::<f64>::ones((3, 3)) / 9.;
        let convolver = FftConvolver::new((4, 4), kernel.view()).unwrap();
        let channel = Array2::from_shape_fn((5, 5), |(i, j)| (i * 5 + j) as f64);
        let err = convolver.convolve(channel.view()).unwrap_err();
        assert!(matches!(
            err,
            BlurError::InvalidInput(InputDefect::ChannelShape {
                expected: (4, 4),
                found: (5, 5)
            })
        ));
        let narrow = Array2::<u8>::zeros((4, 3));
        assert!(convolver.convolve(narrow.view()).is_err());
    }

    #[test]
    fn empty_dimensions_are_rejected() {
        let kernel = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            FftConvolver::new((0, 4), kernel.view()),
            Err(BlurError::InvalidInput(InputDefect::Empty))
        ));
        let kernel = Array2::<f64>::ones((3, 3));
        assert!(FftConvolver::new((4, 0), kernel.view()).is_err());
    }

    #[test]
    fn transpose_roundtrip() {
        let data: Vec<_> = (0..6).map(|i| Complex64::new(i as f64, 0.)).collect();
        let t = transpose(&data, 2, 3);
        assert_eq!(t[1].re, 3.);
        assert_eq!(transpose(&t, 3, 2), data);
    }
}
