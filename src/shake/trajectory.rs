use std::{f64::consts::PI, ops::Deref};

use nalgebra::{Point2, Vector2};
use rand::Rng;
use rand_distr::StandardNormal;

use super::ShakeParams;

/// Distance to the kernel edge at which the trajectory bounces back
const MARGIN: f64 = 1.0;
/// Velocity scaling applied on a bounce (inelastic)
const RESTITUTION: f64 = -0.6;

/// Camera sub-pixel path in kernel pixel coordinates
///
/// `x` runs along the kernel columns and `y` along its rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory(Vec<Point2<f64>>);
impl Deref for Trajectory {
    type Target = [Point2<f64>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl From<Trajectory> for Vec<Point2<f64>> {
    fn from(trajectory: Trajectory) -> Self {
        trajectory.0
    }
}

/// Samples a bounded 2D camera shake path with inertia and random impulses
///
/// The path starts at rest at the kernel center. Every step the velocity is damped,
/// perturbed by gaussian jitter and, with probability `kick_prob`, kicked in a uniformly
/// random direction; the position then moves by the velocity and bounces off the
/// `[1, size-2]` box on each axis.
///
/// A step overshooting a wall by more than the box width bounces off both walls as
/// many times as needed rather than being mirrored once, so positions never leave the box.
///
/// The parameters are assumed to have been validated.
pub fn simulate<R: Rng + ?Sized>(params: &ShakeParams, rng: &mut R) -> Trajectory {
    let &ShakeParams {
        size,
        steps,
        damping,
        jitter,
        kick_prob,
        kick_strength,
    } = params;
    let center = (size as f64 - 1.) / 2.;
    let mut pos = Point2::new(center, center);
    let mut vel = Vector2::<f64>::zeros();

    let (low, high) = (MARGIN, size as f64 - 1. - MARGIN);

    let mut points = Vec::with_capacity(steps);
    for _ in 0..steps {
        vel *= damping;
        vel.x += jitter * rng.sample::<f64, _>(StandardNormal);
        vel.y += jitter * rng.sample::<f64, _>(StandardNormal);

        if rng.gen::<f64>() < kick_prob {
            let (sin, cos) = rng.gen_range(0f64..2. * PI).sin_cos();
            vel += Vector2::new(cos, sin) * kick_strength;
        }

        pos += vel;

        for axis in 0..2 {
            let (folded, bounces) = reflect(pos[axis], low, high);
            pos[axis] = folded;
            if bounces > 0 {
                vel[axis] *= RESTITUTION.powi(bounces);
            }
        }

        points.push(pos);
    }
    Trajectory(points)
}

/// Mirrors `x` back into `[low, high]`, returning the folded coordinate and the
/// number of walls it bounced off
///
/// An overshoot smaller than the box width is a single mirror image about the crossed
/// wall; larger ones keep bouncing between both walls.
fn reflect(x: f64, low: f64, high: f64) -> (f64, i32) {
    if (low..=high).contains(&x) || !x.is_finite() {
        return (x, 0);
    }
    let width = high - low;
    let u = x - low;
    let bounces = if u < 0. {
        (-u / width).ceil()
    } else {
        (u / width).ceil() - 1.
    };
    let t = u.rem_euclid(2. * width);
    let folded = if t > width { 2. * width - t } else { t };
    (low + folded, bounces as i32)
}
