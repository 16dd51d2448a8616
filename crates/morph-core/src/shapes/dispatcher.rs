//! Shape dispatcher.
//!
//! Maps a [`ShapeKind`] to its per-particle sampler and fills a particle set.
//! New shapes only need a sampler and a table entry here.

use glam::Vec3;
use rand::RngCore;

use crate::shapes::primitives::{sample_heart, sample_saturn, sample_sphere};
use crate::shapes::ShapeKind;

/// Draws one point of a shape from the given random source.
pub type PointSampler = fn(&mut dyn RngCore) -> Vec3;

const SAMPLERS: [(ShapeKind, PointSampler); 3] = [
    (ShapeKind::Sphere, sample_sphere),
    (ShapeKind::Heart, sample_heart),
    (ShapeKind::Saturn, sample_saturn),
];

/// Look up the sampler registered for `kind`.
pub fn sampler_for(kind: ShapeKind) -> PointSampler {
    SAMPLERS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, sampler)| *sampler)
        // Every variant is registered above.
        .unwrap_or(sample_sphere)
}

/// Generate `count` points of `kind` using a fresh thread-local RNG.
pub fn generate(kind: ShapeKind, count: usize) -> Vec<Vec3> {
    generate_with(kind, count, &mut rand::thread_rng())
}

/// Generate `count` points of `kind` from a caller-supplied RNG.
///
/// Points are produced in insertion order; particle `i` of one shape morphs
/// into particle `i` of another.
pub fn generate_with(kind: ShapeKind, count: usize, rng: &mut dyn RngCore) -> Vec<Vec3> {
    let sampler = sampler_for(kind);
    (0..count).map(|_| sampler(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_sampler() {
        for kind in ShapeKind::ALL {
            assert!(
                SAMPLERS.iter().any(|(k, _)| *k == kind),
                "no sampler registered for {kind}"
            );
        }
    }

    #[test]
    fn zero_count_is_empty() {
        for kind in ShapeKind::ALL {
            assert!(generate(kind, 0).is_empty());
        }
    }
}
