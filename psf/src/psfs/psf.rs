use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

use camera_shake::{Kernel, ShakeKernel, ShakeParams, Trajectory};
use image::{ImageBuffer, ImageError, Rgb, RgbImage};

use super::find_global_extrema;
use crate::Config;

#[derive(Debug, thiserror::Error)]
pub enum PSFError {
    #[error("Failed to create image buffer")]
    Image,
    #[error("Failed to save PSF to png file {1:?}")]
    Save(#[source] ImageError, PathBuf),
}
type Result<T> = std::result::Result<T, PSFError>;

#[derive(Debug)]
pub struct PSF {
    pub(crate) kernel: Kernel,
    pub(crate) trajectory: Option<Trajectory>,
    pub(crate) params: Option<ShakeParams>,
    pub(crate) seed: Option<u64>,
    pub(crate) config: Rc<Config>,
}
impl PSF {
    pub fn new(config: &Rc<Config>, shake: ShakeKernel) -> Self {
        let ShakeKernel { kernel, trajectory } = shake;
        Self {
            kernel,
            trajectory,
            params: None,
            seed: None,
            config: config.clone(),
        }
    }
    pub fn params(mut self, value: ShakeParams) -> Self {
        self.params = Some(value);
        self
    }
    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }
    /// Normalize kernel weights to 0.0-1.0 range and apply CUBEHELIX colormap
    fn kernel_to_rgb(&self, min_val: f64, max_val: f64) -> Vec<u8> {
        let range = max_val - min_val;
        self.kernel
            .iter()
            .map(|&x| {
                if range > 0.0 {
                    ((x - min_val) / range).clamp(0., 1.)
                } else {
                    0.5
                }
            })
            .flat_map(|value| {
                let color = colorous::CUBEHELIX.eval_continuous(value);
                [color.r, color.g, color.b]
            })
            .collect()
    }
    /// Renders the kernel, upscaled with nearest neighbor, with the trajectory on top
    pub fn render(&self, minmax: Option<(f64, f64)>) -> Result<RgbImage> {
        let (min_val, max_val) = minmax.unwrap_or_else(|| find_global_extrema(&[&self.kernel]));
        let (h, w) = self.kernel.dim();
        let rgb = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(
            w as u32,
            h as u32,
            self.kernel_to_rgb(min_val, max_val),
        )
        .ok_or(PSFError::Image)?;

        let scale = self.config.scale;
        let mut image = RgbImage::from_fn(w as u32 * scale, h as u32 * scale, |x, y| {
            *rgb.get_pixel(x / scale, y / scale)
        });
        if let Some(trajectory) = &self.trajectory {
            self.config.draw_trajectory(&mut image, trajectory);
        }
        Ok(image)
    }
    /// Save the kernel as a PNG image normalized to its own range
    pub fn save(&self, filename: impl AsRef<Path>) -> Result<()> {
        self.save_frame_as_png(filename, None)
    }
    /// Save the kernel as a PNG image with CUBEHELIX colormap and trajectory overlay
    pub fn save_frame_as_png(
        &self,
        filename: impl AsRef<Path>,
        minmax: Option<(f64, f64)>,
    ) -> Result<()> {
        self.render(minmax)?
            .save(&filename)
            .map_err(|e| PSFError::Save(e, filename.as_ref().to_path_buf()))?;
        Ok(())
    }
}
