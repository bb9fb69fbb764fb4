//! Image blurring with an arbitrary 2D kernel
//!
//! [blur_image] convolves each channel of an 8-bit image with a kernel in the
//! frequency domain ([FftConvolver]) and anchors the kernel center on the output pixels,
//! so a centered unit impulse leaves the image unchanged.

use std::time::Instant;

use ndarray::{Array2, Array3, ArrayD, ArrayView2, ArrayView3, ArrayViewD, Axis, Ix2, Ix3};
use rayon::prelude::*;

mod fft2;
pub use fft2::FftConvolver;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InputDefect {
    #[error("image must be 2D (height, width) or 3D (height, width, channel), found {0}D")]
    ImageRank(usize),
    #[error("kernel must be 2D, found {0}D")]
    KernelRank(usize),
    #[error("image and kernel must not have an empty dimension")]
    Empty,
    #[error("kernel sum must be finite and > 0, found {0}")]
    KernelSum(f64),
    #[error("channel shape {found:?} differs from the planned {expected:?}")]
    ChannelShape {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

#[derive(thiserror::Error, Debug)]
pub enum BlurError {
    #[error("invalid blur input: {0}")]
    InvalidInput(#[from] InputDefect),
}
type Result<T> = std::result::Result<T, BlurError>;

/// Blurs a grayscale `(height, width)` or multi-channel `(height, width, channel)` image
///
/// The kernel is normalized by its own sum before use. Channels are convolved
/// independently and in parallel; the result is clamped to `[0, 255]` and rounded
/// to the nearest integer. The output has the shape of `image`.
pub fn blur_image(image: ArrayViewD<'_, u8>, kernel: ArrayViewD<'_, f64>) -> Result<ArrayD<u8>> {
    let (image_rank, kernel_rank) = (image.ndim(), kernel.ndim());
    if !(2..=3).contains(&image_rank) {
        return Err(InputDefect::ImageRank(image_rank).into());
    }
    let kernel = kernel
        .into_dimensionality::<Ix2>()
        .map_err(|_| InputDefect::KernelRank(kernel_rank))?;
    if image.is_empty() || kernel.is_empty() {
        return Err(InputDefect::Empty.into());
    }
    let total = kernel.sum();
    if !(total.is_finite() && total > 0.) {
        return Err(InputDefect::KernelSum(total).into());
    }
    let kernel = kernel.mapv(|w| w / total);

    let now = Instant::now();
    let shape = (image.shape()[0], image.shape()[1]);
    let convolver = FftConvolver::new(shape, kernel.view())?;
    let blurred = match image_rank {
        2 => {
            let gray = image
                .into_dimensionality::<Ix2>()
                .map_err(|_| InputDefect::ImageRank(image_rank))?;
            blur_channel(&convolver, gray)?.into_dyn()
        }
        _ => {
            let channels = image
                .into_dimensionality::<Ix3>()
                .map_err(|_| InputDefect::ImageRank(image_rank))?;
            blur_channels(&convolver, channels)?.into_dyn()
        }
    };
    log::info!(
        "blurred {:?} image in {}ms",
        blurred.shape(),
        now.elapsed().as_millis()
    );
    Ok(blurred)
}

fn blur_channel(convolver: &FftConvolver, channel: ArrayView2<'_, u8>) -> Result<Array2<u8>> {
    Ok(convolver.convolve(channel)?.mapv(to_u8))
}

fn blur_channels(convolver: &FftConvolver, image: ArrayView3<'_, u8>) -> Result<Array3<u8>> {
    let planes = (0..image.len_of(Axis(2)))
        .into_par_iter()
        .map(|c| blur_channel(convolver, image.index_axis(Axis(2), c)))
        .collect::<Result<Vec<_>>>()?;
    let mut blurred = Array3::zeros(image.dim());
    for (c, plane) in planes.iter().enumerate() {
        blurred.index_axis_mut(Axis(2), c).assign(plane);
    }
    Ok(blurred)
}

fn to_u8(value: f64) -> u8 {
    value.clamp(0., 255.).round() as u8
}
