use std::rc::Rc;

use camera_shake::Trajectory;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::DEFAULT_SCALE;

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) scale: u32,
    pub(crate) trajectory_color: Option<Rgb<u8>>,
    pub(crate) global_range: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            trajectory_color: Some(Rgb([0, 255, 255])),
            global_range: false,
        }
    }
}
impl Config {
    /// New configuration upscaling each kernel pixel to `scale x scale` image pixels
    pub fn new(scale: u32) -> Rc<Self> {
        Rc::new(Self {
            scale: scale.max(1),
            ..Default::default()
        })
    }
    pub fn trajectory_color(self: Rc<Self>, rgb: [u8; 3]) -> Rc<Self> {
        Rc::new(Self {
            trajectory_color: Some(Rgb(rgb)),
            ..(*self).clone()
        })
    }
    /// Renders kernels without their trajectory
    pub fn without_trajectory(self: Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            trajectory_color: None,
            ..(*self).clone()
        })
    }
    /// Colormaps every frame of a collection with the same min/max range
    pub fn global_range(self: Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            global_range: true,
            ..(*self).clone()
        })
    }
    /// Draws the trajectory as a polyline over an upscaled kernel image
    ///
    /// Trajectory coordinates are kernel pixel centers.
    pub fn draw_trajectory(&self, image: &mut RgbImage, trajectory: &Trajectory) {
        let Some(color) = self.trajectory_color else {
            return;
        };
        let scale = self.scale as f32;
        let to_image = |x: f64, y: f64| ((x as f32 + 0.5) * scale, (y as f32 + 0.5) * scale);
        trajectory.windows(2).for_each(|segment| {
            draw_line_segment_mut(
                image,
                to_image(segment[0].x, segment[0].y),
                to_image(segment[1].x, segment[1].y),
                color,
            );
        });
    }
}
