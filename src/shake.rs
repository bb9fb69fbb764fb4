//! Camera shake point spread functions
//!
//! A [ShakeParams] drives a damped random walk with jitter and random kicks
//! ([simulate]) whose dwell time is splatted into a unit-sum [Kernel] ([rasterize]).

mod kernel;
mod params;
mod trajectory;
pub use kernel::{generate_shake_kernel, rasterize, Kernel, ShakeKernel, ShakeKernelBuilder};
pub use params::{Param, ShakeParams};
pub use trajectory::{simulate, Trajectory};

#[derive(thiserror::Error, Debug)]
pub enum KernelError {
    #[error("invalid parameter `{param}` = {value}, expected {expected}")]
    InvalidParameter {
        param: Param,
        value: String,
        expected: &'static str,
    },
}
impl KernelError {
    pub(crate) fn invalid(param: Param, value: impl ToString, expected: &'static str) -> Self {
        Self::InvalidParameter {
            param,
            value: value.to_string(),
            expected,
        }
    }
    /// Offending parameter
    pub fn param(&self) -> Param {
        match self {
            Self::InvalidParameter { param, .. } => *param,
        }
    }
}
