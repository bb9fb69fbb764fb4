use crate::{blur::BlurError, shake::KernelError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `shake` module")]
    Kernel(#[from] KernelError),
    #[error("Error in the `blur` module")]
    Blur(#[from] BlurError),
}
