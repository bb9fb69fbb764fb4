use std::path::PathBuf;

use anyhow::Context;
use camera_shake::{blur_image, Kernel, ShakeKernel, ShakeParams};
use image::{GrayImage, RgbImage};
use ndarray::{Array2, Array3};
use rand::{rngs::StdRng, SeedableRng};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "shake-blur", about = "Blurs an image with a random camera shake kernel")]
struct Opt {
    /// Image to blur (PNG, JPEG, BMP, TIFF, ...)
    #[structopt(short, long)]
    input: PathBuf,
    /// Blurred image
    #[structopt(short, long, default_value = "blurred_camera_shake.png")]
    output: PathBuf,
    /// Random seed for the parameters and the trajectory
    #[structopt(long)]
    seed: Option<u64>,
    /// Draw random shake parameters instead of the explicit ones
    #[structopt(short, long)]
    random: bool,
    /// Kernel size (odd)
    #[structopt(long)]
    size: Option<usize>,
    /// Trajectory steps
    #[structopt(long)]
    steps: Option<usize>,
    /// Velocity damping
    #[structopt(long)]
    damping: Option<f64>,
    /// Jitter
    #[structopt(long)]
    jitter: Option<f64>,
    /// Kick probability
    #[structopt(long)]
    kick_prob: Option<f64>,
    /// Kick strength
    #[structopt(long)]
    kick_strength: Option<f64>,
    /// Blur the luminance of the image only
    #[structopt(short, long)]
    grayscale: bool,
    /// Save a preview of the kernel to this PNG file
    #[structopt(short, long)]
    kernel: Option<PathBuf>,
}
impl Opt {
    fn params(&self) -> ShakeParams {
        let params = if self.random {
            match self.seed {
                Some(seed) => ShakeParams::random(&mut StdRng::seed_from_u64(seed)),
                None => ShakeParams::from_entropy(),
            }
        } else {
            ShakeParams::default()
        };
        ShakeParams {
            size: self.size.unwrap_or(params.size),
            steps: self.steps.unwrap_or(params.steps),
            damping: self.damping.unwrap_or(params.damping),
            jitter: self.jitter.unwrap_or(params.jitter),
            kick_prob: self.kick_prob.unwrap_or(params.kick_prob),
            kick_strength: self.kick_strength.unwrap_or(params.kick_strength),
        }
    }
}

/// 8-bit kernel preview scaled to the kernel peak
fn kernel_preview(kernel: &Kernel) -> Option<GrayImage> {
    let peak = kernel.iter().copied().fold(0f64, f64::max);
    let (h, w) = kernel.dim();
    let pixels = kernel
        .iter()
        .map(|&v| if peak > 0. { (255. * v / peak).round() as u8 } else { 0 })
        .collect();
    GrayImage::from_raw(w as u32, h as u32, pixels)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let params = opt.params();
    println!(
        "Kernel params: size={}, steps={}, damping={:.2}, jitter={:.2}, kick_prob={:.2}, kick_strength={:.2}",
        params.size,
        params.steps,
        params.damping,
        params.jitter,
        params.kick_prob,
        params.kick_strength
    );
    let builder = ShakeKernel::builder(params);
    let shake = match opt.seed {
        Some(seed) => builder.seed(seed),
        None => builder,
    }
    .build()?;

    if let Some(path) = &opt.kernel {
        kernel_preview(&shake.kernel)
            .context("failed to create the kernel preview")?
            .save(path)
            .with_context(|| format!("failed to save the kernel preview to {path:?}"))?;
        println!("Kernel saved to {path:?}");
    }

    let decoded =
        image::open(&opt.input).with_context(|| format!("failed to open {:?}", opt.input))?;
    if opt.grayscale {
        let gray = decoded.into_luma8();
        let (w, h) = gray.dimensions();
        let pixels = Array2::from_shape_vec((h as usize, w as usize), gray.into_raw())?;
        let blurred = blur_image(pixels.view().into_dyn(), shake.kernel.view().into_dyn())?;
        GrayImage::from_raw(w, h, blurred.iter().copied().collect())
            .context("failed to create the blurred image")?
            .save(&opt.output)?;
    } else {
        let rgb = decoded.into_rgb8();
        let (w, h) = rgb.dimensions();
        let pixels = Array3::from_shape_vec((h as usize, w as usize, 3), rgb.into_raw())?;
        let blurred = blur_image(pixels.view().into_dyn(), shake.kernel.view().into_dyn())?;
        RgbImage::from_raw(w, h, blurred.iter().copied().collect())
            .context("failed to create the blurred image")?
            .save(&opt.output)?;
    }
    println!("Blurred image saved to {:?}", opt.output);

    Ok(())
}
