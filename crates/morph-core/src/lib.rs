//! Gesture-controlled particle morphing.
//!
//! A fixed-size point cloud is sampled from two procedural shapes and morphed
//! between them by a transition factor. Pinching thumb and index finger drives
//! the factor; the wrist position rotates the cloud.

pub mod camera;
pub mod config;
pub mod error;
pub mod gesture;
pub mod math;
pub mod morph;
pub mod overlay;
pub mod particle;
pub mod session;
pub mod shapes;
pub mod state;

// Re-export shader source strings
pub mod shaders {
    pub const MORPH: &str = include_str!("shaders/morph.wgsl");
}

pub use config::MorphConfig;
pub use error::MorphError;
pub use gesture::{GestureController, Landmark};
pub use morph::{MorphRenderer, MorphUniforms, MorphVertex, POINT_RENDER_STATE};
pub use particle::ParticleBuffer;
pub use session::{FrameResult, MorphSession, SessionStatus};
pub use shapes::ShapeKind;
pub use state::{ControlState, Rotation, SharedControl};
