/// Procedural point-cloud shapes.
///
/// `primitives` holds one sampler per shape, `dispatcher` maps a [`ShapeKind`]
/// to its sampler and fills whole particle sets.
pub mod primitives;
pub mod dispatcher;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MorphError;

pub use dispatcher::{generate, generate_with, sampler_for, PointSampler};

/// Shapes the particle cloud can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Sphere,
    Heart,
    Saturn,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Sphere, ShapeKind::Heart, ShapeKind::Saturn];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Heart => "heart",
            ShapeKind::Saturn => "saturn",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = MorphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MorphError::UnknownShape(wanted.to_string()))
    }
}
