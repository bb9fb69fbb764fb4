use std::time::Instant;

use nalgebra::Point2;
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{simulate, KernelError, ShakeParams, Trajectory};

type Result<T> = std::result::Result<T, KernelError>;

/// Point spread function: a `size x size` grid of non-negative weights summing to 1
///
/// Indexed as `[row, column]`, i.e. `[y, x]` in trajectory coordinates.
pub type Kernel = Array2<f64>;

/// Camera shake kernel with the trajectory it was rasterized from, if requested
#[derive(Debug, Clone, PartialEq)]
pub struct ShakeKernel {
    pub kernel: Kernel,
    pub trajectory: Option<Trajectory>,
}

/// [ShakeKernel] builder
#[derive(Debug, Clone)]
pub struct ShakeKernelBuilder {
    params: ShakeParams,
    seed: Option<u64>,
    keep_trajectory: bool,
}
impl ShakeKernelBuilder {
    /// Seeds the random source, making the kernel reproducible
    pub fn seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }
    /// Keeps the simulated trajectory alongside the kernel
    pub fn keep_trajectory(self) -> Self {
        Self {
            keep_trajectory: true,
            ..self
        }
    }
    /// Validates the parameters, then simulates and rasterizes the shake
    ///
    /// Without a seed, a generator local to this call is seeded from OS entropy.
    pub fn build(self) -> Result<ShakeKernel> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ShakeKernel::with_rng(self.params, &mut rng, self.keep_trajectory)
    }
}

impl ShakeKernel {
    pub fn builder(params: ShakeParams) -> ShakeKernelBuilder {
        ShakeKernelBuilder {
            params,
            seed: None,
            keep_trajectory: false,
        }
    }
    /// Generates a kernel drawing every random sample from `rng`
    pub fn with_rng<R: Rng + ?Sized>(
        params: ShakeParams,
        rng: &mut R,
        keep_trajectory: bool,
    ) -> Result<Self> {
        params.validate()?;
        let now = Instant::now();
        let trajectory = simulate(&params, rng);
        let kernel = rasterize(params.size, &trajectory);
        log::debug!(
            "{}x{} shake kernel from {} steps in {}us",
            params.size,
            params.size,
            params.steps,
            now.elapsed().as_micros()
        );
        Ok(Self {
            kernel,
            trajectory: keep_trajectory.then_some(trajectory),
        })
    }
    /// Kernel side in pixels
    pub fn size(&self) -> usize {
        self.kernel.nrows()
    }
    /// Largest kernel weight
    pub fn peak(&self) -> f64 {
        self.kernel.iter().copied().fold(0f64, f64::max)
    }
    pub fn into_kernel(self) -> Kernel {
        self.kernel
    }
}

/// Generates a random camera shake kernel normalized to unit sum
///
/// The same parameters and seed always give the same kernel.
pub fn generate_shake_kernel(params: &ShakeParams, seed: Option<u64>) -> Result<Kernel> {
    let builder = ShakeKernel::builder(*params);
    let builder = match seed {
        Some(seed) => builder.seed(seed),
        None => builder,
    };
    builder.build().map(ShakeKernel::into_kernel)
}

/// Splats each trajectory point over its four neighboring pixels and normalizes the
/// result to unit sum
///
/// Points not strictly surrounded by four pixels of the grid are dropped. If nothing
/// lands on the grid, the kernel is a unit impulse at the center pixel.
pub fn rasterize(size: usize, trajectory: &[Point2<f64>]) -> Kernel {
    let mut kernel = Kernel::zeros((size, size));
    let upper = size.saturating_sub(1) as f64;
    let mut dropped = 0usize;
    for p in trajectory {
        let (x, y) = (p.x, p.y);
        if !((0f64..upper).contains(&x) && (0f64..upper).contains(&y)) {
            dropped += 1;
            continue;
        }
        let (x0, y0) = (x.floor(), y.floor());
        let (dx, dy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as usize, y0 as usize);
        kernel[[y0, x0]] += (1. - dx) * (1. - dy);
        kernel[[y0 + 1, x0]] += (1. - dx) * dy;
        kernel[[y0, x0 + 1]] += dx * (1. - dy);
        kernel[[y0 + 1, x0 + 1]] += dx * dy;
    }
    if dropped > 0 {
        log::debug!("{dropped}/{} trajectory points off the grid", trajectory.len());
    }

    let total = kernel.sum();
    if total > 0. {
        kernel /= total;
    } else {
        log::warn!("no energy deposited, falling back to a center impulse kernel");
        kernel.fill(0.);
        if size > 0 {
            kernel[[size / 2, size / 2]] = 1.;
        }
    }
    kernel
}
