use serde::{Deserialize, Serialize};

use crate::error::MorphError;
use crate::shapes::ShapeKind;

/// Session tunables. Every field has a default, so a host may pass a partial
/// JSON object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    pub particle_count: usize,
    pub source_shape: ShapeKind,
    pub target_shape: ShapeKind,
    /// Pinch distance (normalized landmark units) below which the target is 1.0.
    pub pinch_threshold: f32,
    /// Per-update factor of the exponential smoothing of the transition value.
    pub smoothing: f32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub max_hands: u32,
    pub sway_amplitude: f32,
    pub sway_frequency: f32,
    /// Added to the animation clock once per rendered frame.
    pub time_step: f32,
    /// Numerator `k` of the `k / -depth` point size law.
    pub point_scale: f32,
    /// Linear RGB of a single particle before additive accumulation.
    pub particle_color: [f32; 3],
    pub particle_opacity: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_distance: f32,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            particle_count: 10_000,
            source_shape: ShapeKind::Sphere,
            target_shape: ShapeKind::Saturn,
            pinch_threshold: 0.12,
            smoothing: 0.15,
            min_detection_confidence: 0.6,
            min_tracking_confidence: 0.6,
            max_hands: 1,
            sway_amplitude: 0.2,
            sway_frequency: 0.5,
            time_step: 0.05,
            point_scale: 300.0,
            particle_color: [0.3, 0.7, 1.0],
            particle_opacity: 0.8,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_distance: 50.0,
        }
    }
}

impl MorphConfig {
    /// Parse a JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self, MorphError> {
        let config: MorphConfig =
            serde_json::from_str(json).map_err(|e| MorphError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MorphError> {
        let invalid = |msg: &str| Err(MorphError::InvalidConfig(msg.to_string()));

        if !(self.pinch_threshold > 0.0 && self.pinch_threshold.is_finite()) {
            return invalid("pinch_threshold must be positive");
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return invalid("smoothing must be in (0, 1]");
        }
        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MorphError::InvalidConfig(format!("{name} must be in [0, 1]")));
            }
        }
        if self.max_hands == 0 {
            return invalid("max_hands must be at least 1");
        }
        if !self.time_step.is_finite() || !self.sway_amplitude.is_finite() || !self.sway_frequency.is_finite() {
            return invalid("animation parameters must be finite");
        }
        if !(self.point_scale > 0.0) {
            return invalid("point_scale must be positive");
        }
        if !(0.0..=1.0).contains(&self.particle_opacity) {
            return invalid("particle_opacity must be in [0, 1]");
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return invalid("fov_degrees must be in (0, 180)");
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return invalid("clip planes must satisfy 0 < near < far");
        }
        if !(self.camera_distance > 0.0) {
            return invalid("camera_distance must be positive");
        }
        Ok(())
    }
}
