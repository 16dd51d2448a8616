//! Per-particle shape samplers.
//!
//! Each sampler draws one point from its own uniform variates. Nothing is
//! shared between particles, so a set built from these keeps insertion order
//! and every call is an independent sample.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, RngCore};

pub const SPHERE_RADIUS: f32 = 20.0;

pub const HEART_DEPTH: f32 = 2.5;

pub const SATURN_BODY_RADIUS: f32 = 8.0;
pub const SATURN_BODY_SHARE: f32 = 0.6;
pub const SATURN_RING_INNER: f32 = 15.0;
pub const SATURN_RING_OUTER: f32 = 20.0;
pub const SATURN_RING_THICKNESS: f32 = 1.0;

/// Spherical to Cartesian with `theta` around Z and `phi` from the +Z pole.
#[inline]
fn spherical(r: f32, theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Filled ball of radius 20 with `r = 20 * sqrt(u)`, denser toward the rim.
pub fn sample_sphere(rng: &mut dyn RngCore) -> Vec3 {
    let r = SPHERE_RADIUS * rng.gen::<f32>().sqrt();
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    spherical(r, theta, phi)
}

/// Classic heart curve at a random parameter, with depth jitter.
pub fn sample_heart(rng: &mut dyn RngCore) -> Vec3 {
    let t = rng.gen::<f32>() * TAU;
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    let z = rng.gen_range(-HEART_DEPTH..HEART_DEPTH);
    Vec3::new(x, y, z)
}

/// Sphere shell of radius 8 (60%) or a flat ring in the XZ plane (40%).
pub fn sample_saturn(rng: &mut dyn RngCore) -> Vec3 {
    if rng.gen::<f32>() < SATURN_BODY_SHARE {
        let theta = rng.gen::<f32>() * TAU;
        let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
        spherical(SATURN_BODY_RADIUS, theta, phi)
    } else {
        let r = rng.gen_range(SATURN_RING_INNER..SATURN_RING_OUTER);
        let theta = rng.gen::<f32>() * TAU;
        let y = rng.gen_range(-SATURN_RING_THICKNESS..SATURN_RING_THICKNESS);
        Vec3::new(r * theta.cos(), y, r * theta.sin())
    }
}
