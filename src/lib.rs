/*!
# Camera shake

Simulation of random camera shake point spread functions (PSF) and their application
to images.

## Key Components

- [`ShakeParams`] - damping, jitter and kick model of the shake
- [`simulate`] - damped random walk of the camera within the kernel grid
- [`rasterize`] - bilinear dwell time map of a trajectory, normalized to unit sum
- [`blur_image`] - FFT convolution of a grayscale or multi-channel image with a kernel

## Usage

```rust
use camera_shake::{blur_image, generate_shake_kernel, ShakeParams};
use ndarray::Array3;

let params = ShakeParams::default().size(21);
let kernel = generate_shake_kernel(&params, Some(42))?;
let image = Array3::<u8>::from_elem((64, 48, 3), 100);
let blurred = blur_image(image.view().into_dyn(), kernel.view().into_dyn())?;
assert_eq!(blurred.shape(), image.shape());
# Ok::<(), camera_shake::Error>(())
```
*/

pub mod blur;
mod error;
pub mod shake;

pub use blur::{blur_image, BlurError, FftConvolver, InputDefect};
pub use error::Error;
pub use shake::{
    generate_shake_kernel, rasterize, simulate, Kernel, KernelError, Param, ShakeKernel,
    ShakeParams, Trajectory,
};
