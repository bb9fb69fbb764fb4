/*!
# PSF Collections

This module provides the [`PSFs`] type for managing collections of kernel frames
with shared configuration and batch processing capabilities.

## Features

- Optional global normalization across all frames
- Progress bars for batch operations
- Automatic frame numbering and CSV summary of the generation parameters
*/

use std::{
    fs::create_dir_all,
    io,
    path::{Path, PathBuf},
    rc::Rc,
};

use camera_shake::{Kernel, ShakeKernel, ShakeParams};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::Config;

mod psf;
pub use psf::{PSFError, PSF};

/// Errors that can occur during PSF collection operations
#[derive(Debug, thiserror::Error)]
pub enum PSFsError {
    /// Failed to create output directory for frames
    #[error("failed to create frames directory {1:?}")]
    CreateFrameDir(#[source] io::Error, PathBuf),
    /// Failed to process or save individual PSF frame
    #[error("failed to save a frame")]
    PsfError(#[from] PSFError),
    /// Invalid progress bar template
    #[error("failed to set the progress bar style")]
    Progress(#[from] indicatif::style::TemplateError),
    /// Failed to write the CSV summary
    #[error("failed to write the summary {1:?}")]
    Summary(#[source] csv::Error, PathBuf),
}

/// One line of the CSV summary
#[derive(Serialize)]
struct Record {
    frame: usize,
    seed: Option<u64>,
    size: Option<usize>,
    steps: Option<usize>,
    damping: Option<f64>,
    jitter: Option<f64>,
    kick_prob: Option<f64>,
    kick_strength: Option<f64>,
    peak: f64,
}

/// Collection of PSF frames with shared configuration and batch processing
///
/// # Example
///
/// ```rust,no_run
/// use camera_shake::{ShakeKernel, ShakeParams};
/// use psf::{Config, PSFs};
///
/// let config = Config::new(8).global_range();
/// let mut psfs = PSFs::new(&config);
///
/// for seed in 0..4 {
///     let params = ShakeParams::default();
///     let shake = ShakeKernel::builder(params).seed(seed).keep_trajectory().build()?;
///     psfs.push(shake, params, Some(seed));
/// }
///
/// psfs.save_all_frames("frames")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct PSFs {
    psfs: Vec<PSF>,
    config: Rc<Config>,
}

/// Find global minimum and maximum values across all kernels for consistent normalization
pub fn find_global_extrema(kernels: &[&Kernel]) -> (f64, f64) {
    let global_max = kernels
        .iter()
        .flat_map(|kernel| kernel.iter())
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let global_min = kernels
        .iter()
        .flat_map(|kernel| kernel.iter())
        .copied()
        .fold(f64::INFINITY, f64::min);
    (global_min, global_max)
}
impl PSFs {
    /// Create a new PSF collection with shared configuration
    pub fn new(config: &Rc<Config>) -> Self {
        Self {
            config: config.clone(),
            ..Default::default()
        }
    }
    /// Add a kernel with the parameters and seed it was generated with
    pub fn push(&mut self, shake: ShakeKernel, params: ShakeParams, seed: Option<u64>) {
        let psf = PSF::new(&self.config, shake).params(params);
        self.psfs.push(match seed {
            Some(seed) => psf.seed(seed),
            None => psf,
        });
    }
    /// Get the number of PSF frames in the collection
    pub fn len(&self) -> usize {
        self.psfs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.psfs.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &PSF> {
        self.psfs.iter()
    }
    /// Export all frames as `kernel_XXXXXX.png` images into `frames_dir`
    ///
    /// Frames share one colormap range if the configuration asks for it, otherwise
    /// each frame is normalized to its own range.
    pub fn save_all_frames(&self, frames_dir: impl AsRef<Path>) -> Result<(), PSFsError> {
        let kernels: Vec<_> = self.psfs.iter().map(|psf| psf.kernel()).collect();
        let global_minmax = self
            .config
            .global_range
            .then(|| find_global_extrema(&kernels));

        let save_pb = ProgressBar::new(self.len() as u64);
        save_pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                .progress_chars("#>-"),
        );
        save_pb.set_message("Saving kernels");

        let frames_dir = frames_dir.as_ref();
        create_dir_all(frames_dir)
            .map_err(|e| PSFsError::CreateFrameDir(e, frames_dir.to_path_buf()))?;

        for (i, psf) in self.psfs.iter().enumerate() {
            let filename = frames_dir.join(format!("kernel_{:06}.png", i));
            psf.save_frame_as_png(filename, global_minmax)?;
            save_pb.inc(1);
        }

        save_pb.finish_with_message("All kernels saved");
        Ok(())
    }
    /// Write one CSV line per frame with its seed, parameters and peak weight
    pub fn write_summary(&self, path: impl AsRef<Path>) -> Result<(), PSFsError> {
        let path = path.as_ref();
        let summary_err = |e| PSFsError::Summary(e, path.to_path_buf());
        let mut writer = csv::Writer::from_path(path).map_err(summary_err)?;
        for (frame, psf) in self.psfs.iter().enumerate() {
            let params = psf.params;
            writer
                .serialize(Record {
                    frame,
                    seed: psf.seed,
                    size: params.map(|p| p.size),
                    steps: params.map(|p| p.steps),
                    damping: params.map(|p| p.damping),
                    jitter: params.map(|p| p.jitter),
                    kick_prob: params.map(|p| p.kick_prob),
                    kick_strength: params.map(|p| p.kick_strength),
                    peak: psf.kernel.iter().copied().fold(0f64, f64::max),
                })
                .map_err(summary_err)?;
        }
        writer
            .flush()
            .map_err(|e| PSFsError::Summary(e.into(), path.to_path_buf()))?;
        Ok(())
    }
}
