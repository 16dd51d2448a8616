//! Pinch-to-morph gesture mapping.
//!
//! A camera frame yields zero or one hand as normalized landmarks. The distance
//! between the thumb and index tips picks a binary morph target, which the
//! transition value chases by exponential smoothing. The wrist position maps
//! straight onto yaw and pitch.

use std::f32::consts::TAU;

use glam::Vec2;
use tracing::debug;

use crate::config::MorphConfig;
use crate::error::MorphError;
use crate::math::mix;
use crate::state::{ControlState, Rotation};

// ---------- hand landmark indices ----------

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;

/// Landmarks a detector reports per hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// A detector keypoint. `x` and `y` are normalized to [0, 1] across the video
/// frame; `z` is relative depth and is ignored here.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Unpack a flat `[x, y, (z,) x, y, (z,) ...]` array.
    ///
    /// `stride` is 2 or 3. A trailing partial landmark is an error.
    pub fn from_flat(data: &[f32], stride: usize) -> Result<Vec<Landmark>, MorphError> {
        if stride != 2 && stride != 3 {
            return Err(MorphError::TransientFrame(format!("unsupported landmark stride {stride}")));
        }
        if data.len() % stride != 0 {
            return Err(MorphError::TransientFrame(format!(
                "{} values do not split into landmarks of {stride}",
                data.len()
            )));
        }
        Ok(data
            .chunks_exact(stride)
            .map(|c| Landmark {
                x: c[0],
                y: c[1],
                z: if stride == 3 { c[2] } else { 0.0 },
            })
            .collect())
    }
}

/// Reject results the controller cannot read.
pub fn check_landmarks(landmarks: &[Landmark]) -> Result<(), MorphError> {
    if landmarks.len() < HAND_LANDMARK_COUNT {
        return Err(MorphError::TransientFrame(format!(
            "expected {HAND_LANDMARK_COUNT} landmarks, got {}",
            landmarks.len()
        )));
    }
    for idx in [WRIST, THUMB_TIP, INDEX_TIP] {
        let lm = landmarks[idx];
        if !lm.x.is_finite() || !lm.y.is_finite() {
            return Err(MorphError::TransientFrame(format!("landmark {idx} is not finite")));
        }
    }
    Ok(())
}

/// Distance between the thumb tip and index tip in normalized image space.
pub fn pinch_distance(landmarks: &[Landmark]) -> f32 {
    landmarks[INDEX_TIP].xy().distance(landmarks[THUMB_TIP].xy())
}

/// 1.0 while pinching (strictly below `threshold`), 0.0 otherwise.
pub fn pinch_target(distance: f32, threshold: f32) -> f32 {
    if distance < threshold {
        1.0
    } else {
        0.0
    }
}

/// One smoothing step of the transition toward `target`, clamped to [0, 1].
pub fn smooth_transition(current: f32, target: f32, factor: f32) -> f32 {
    mix(current, target, factor).clamp(0.0, 1.0)
}

/// Map the wrist position to a full-turn yaw and pitch around the frame center.
pub fn palm_rotation(wrist: Landmark) -> Rotation {
    Rotation {
        yaw: (wrist.x - 0.5) * TAU,
        pitch: (wrist.y - 0.5) * TAU,
    }
}

/// What a single camera frame did to the control state.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameKind {
    /// A hand was tracked and the state advanced.
    Tracked { pinch_distance: f32, pinch_target: f32 },
    /// No hand in frame; state held.
    NoHand,
    /// Unreadable detector output; state held.
    Skipped(MorphError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureUpdate {
    pub state: ControlState,
    pub kind: FrameKind,
}

impl GestureUpdate {
    /// Whether the debug overlay should show landmarks for this frame.
    pub fn has_hand(&self) -> bool {
        matches!(self.kind, FrameKind::Tracked { .. })
    }
}

/// Stateless mapping from one detector result to the next control state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureController {
    pub pinch_threshold: f32,
    pub smoothing: f32,
}

impl Default for GestureController {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.12,
            smoothing: 0.15,
        }
    }
}

impl GestureController {
    pub fn from_config(config: &MorphConfig) -> Self {
        Self {
            pinch_threshold: config.pinch_threshold,
            smoothing: config.smoothing,
        }
    }

    /// Advance `prev` by one camera frame.
    ///
    /// Never fails: missing or malformed hands return `prev` unchanged.
    pub fn on_frame(&self, prev: ControlState, hand: Option<&[Landmark]>) -> GestureUpdate {
        let Some(landmarks) = hand else {
            return GestureUpdate {
                state: prev,
                kind: FrameKind::NoHand,
            };
        };

        if let Err(err) = check_landmarks(landmarks) {
            debug!(%err, "gesture frame skipped");
            return GestureUpdate {
                state: prev,
                kind: FrameKind::Skipped(err),
            };
        }

        let distance = pinch_distance(landmarks);
        let target = pinch_target(distance, self.pinch_threshold);
        let state = ControlState {
            transition: smooth_transition(prev.transition, target, self.smoothing),
            rotation: palm_rotation(landmarks[WRIST]),
        };

        GestureUpdate {
            state,
            kind: FrameKind::Tracked {
                pinch_distance: distance,
                pinch_target: target,
            },
        }
    }
}
