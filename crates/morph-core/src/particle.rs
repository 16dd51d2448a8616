use glam::Vec3;
use rand::RngCore;

use crate::error::MorphError;
use crate::shapes::{generate_with, ShapeKind};

/// SoA storage for the two shapes a particle cloud morphs between.
///
/// `source[i]` morphs into `target[i]`; both sets always hold `count` points.
/// Sets are replaced whole, never edited in place.
pub struct ParticleBuffer {
    count: usize,
    source: Vec<Vec3>,
    target: Vec<Vec3>,
    source_kind: Option<ShapeKind>,
    target_kind: Option<ShapeKind>,
}

impl ParticleBuffer {
    /// Sample both shapes with `count` particles each.
    pub fn build(source_kind: ShapeKind, target_kind: ShapeKind, count: usize) -> Self {
        Self::build_with(source_kind, target_kind, count, &mut rand::thread_rng())
    }

    pub fn build_with(
        source_kind: ShapeKind,
        target_kind: ShapeKind,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Self {
        let source = generate_with(source_kind, count, rng);
        let target = generate_with(target_kind, count, rng);
        debug_assert_eq!(source.len(), target.len());
        Self {
            count,
            source,
            target,
            source_kind: Some(source_kind),
            target_kind: Some(target_kind),
        }
    }

    /// Wrap two precomputed sets. They must be the same length.
    pub fn from_sets(source: Vec<Vec3>, target: Vec<Vec3>) -> Result<Self, MorphError> {
        if source.len() != target.len() {
            return Err(MorphError::LengthMismatch {
                source_len: source.len(),
                target_len: target.len(),
            });
        }
        Ok(Self {
            count: source.len(),
            source,
            target,
            source_kind: None,
            target_kind: None,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn source(&self) -> &[Vec3] {
        &self.source
    }

    pub fn target(&self) -> &[Vec3] {
        &self.target
    }

    pub fn source_kind(&self) -> Option<ShapeKind> {
        self.source_kind
    }

    pub fn target_kind(&self) -> Option<ShapeKind> {
        self.target_kind
    }

    /// Resample both sets, keeping the particle count.
    pub fn rebuild(&mut self, source_kind: ShapeKind, target_kind: ShapeKind) {
        *self = Self::build(source_kind, target_kind, self.count);
    }

    /// Resample only the target set, keeping the source set and count.
    pub fn retarget(&mut self, target_kind: ShapeKind) {
        self.target = generate_with(target_kind, self.count, &mut rand::thread_rng());
        self.target_kind = Some(target_kind);
    }

    /// Iterate `(source, target)` pairs in particle order.
    pub fn pairs(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.source.iter().copied().zip(self.target.iter().copied())
    }
}
