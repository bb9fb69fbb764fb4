/*!
# PSF Library

This library renders camera shake point spread functions (PSF) to PNG images, with the
shake trajectory overlaid on the kernel.

## Key Components

- [`Config`] - Rendering configuration shared by the frames
- [`PSF`] - Individual kernel frame with its trajectory and generation metadata
- [`PSFs`] - Collection of kernel frames with batch export

## Usage

```rust,no_run
use camera_shake::{ShakeKernel, ShakeParams};
use psf::{Config, PSFs};

let config = Config::new(8).trajectory_color([0, 255, 255]);
let mut psfs = PSFs::new(&config);

let params = ShakeParams::default();
let shake = ShakeKernel::builder(params).seed(7).keep_trajectory().build()?;
psfs.push(shake, params, Some(7));

psfs.save_all_frames("kernels")?;
psfs.write_summary("kernels/kernels.csv")?;
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

/// Default upscaling factor from kernel pixels to image pixels
pub const DEFAULT_SCALE: u32 = 8;

mod config;
mod psfs;
pub use config::Config;
pub use psfs::{find_global_extrema, PSFError, PSFs, PSFsError, PSF};
