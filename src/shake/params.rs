use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::KernelError;

type Result<T> = std::result::Result<T, KernelError>;

/// Shake model parameter names
#[derive(strum_macros::Display, Clone, Copy, PartialEq, Eq, Debug)]
#[strum(serialize_all = "snake_case")]
pub enum Param {
    Size,
    Steps,
    Damping,
    Jitter,
    KickProb,
    KickStrength,
}

/// Camera shake model parameters
///
/// The default is the reference configuration: a 45x45 kernel integrated over
/// 240 steps with moderate inertia and occasional kicks.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct ShakeParams {
    /// Kernel side in pixels (odd, >= 5)
    pub size: usize,
    /// Trajectory length (>= 16)
    pub steps: usize,
    /// Velocity decay per step, in (0,1)
    pub damping: f64,
    /// Standard deviation of the per-step random acceleration (> 0)
    pub jitter: f64,
    /// Probability of an impulsive kick per step, in [0,1]
    pub kick_prob: f64,
    /// Kick impulse magnitude (>= 0)
    pub kick_strength: f64,
}
impl Default for ShakeParams {
    fn default() -> Self {
        Self {
            size: 45,
            steps: 240,
            damping: 0.92,
            jitter: 0.13,
            kick_prob: 0.06,
            kick_strength: 1.1,
        }
    }
}
impl ShakeParams {
    /// Draws a random but bounded set of parameters from `rng`
    ///
    /// The size is one of the odd integers in [21,71), the steps an integer in [120,420)
    /// and the remaining fields are uniform in:
    ///  - damping: [0.84,0.97)
    ///  - jitter: [0.07,0.2)
    ///  - kick_prob: [0.025,0.11)
    ///  - kick_strength: [0.5,1.8)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            size: 21 + 2 * rng.gen_range(0..25),
            steps: rng.gen_range(120..420),
            damping: rng.gen_range(0.84..0.97),
            jitter: rng.gen_range(0.07..0.2),
            kick_prob: rng.gen_range(0.025..0.11),
            kick_strength: rng.gen_range(0.5..1.8),
        }
    }
    /// Draws random parameters from a generator local to this call
    pub fn from_entropy() -> Self {
        Self::random(&mut StdRng::from_entropy())
    }
    pub fn size(self, size: usize) -> Self {
        Self { size, ..self }
    }
    pub fn steps(self, steps: usize) -> Self {
        Self { steps, ..self }
    }
    pub fn damping(self, damping: f64) -> Self {
        Self { damping, ..self }
    }
    pub fn jitter(self, jitter: f64) -> Self {
        Self { jitter, ..self }
    }
    pub fn kick_prob(self, kick_prob: f64) -> Self {
        Self { kick_prob, ..self }
    }
    pub fn kick_strength(self, kick_strength: f64) -> Self {
        Self {
            kick_strength,
            ..self
        }
    }
    /// Checks every field, reporting the first one out of range
    pub fn validate(&self) -> Result<()> {
        let &Self {
            size,
            steps,
            damping,
            jitter,
            kick_prob,
            kick_strength,
        } = self;
        if size % 2 == 0 || size < 5 {
            return Err(KernelError::invalid(Param::Size, size, "an odd integer >= 5"));
        }
        if steps < 16 {
            return Err(KernelError::invalid(Param::Steps, steps, ">= 16"));
        }
        // NaN fails every comparison below
        if !(damping > 0.0 && damping < 1.0) {
            return Err(KernelError::invalid(Param::Damping, damping, "in (0, 1)"));
        }
        if !(jitter > 0.0) {
            return Err(KernelError::invalid(Param::Jitter, jitter, "> 0"));
        }
        if !(0.0..=1.0).contains(&kick_prob) {
            return Err(KernelError::invalid(Param::KickProb, kick_prob, "in [0, 1]"));
        }
        if !(kick_strength >= 0.0 && kick_strength.is_finite()) {
            return Err(KernelError::invalid(
                Param::KickStrength,
                kick_strength,
                "finite and >= 0",
            ));
        }
        Ok(())
    }
}
