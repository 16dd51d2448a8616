//! Source-to-target morph with sway, plus the GPU data it is drawn from.
//!
//! The GPU path uploads every particle's `(source, target)` pair once and
//! does the interpolation in `shaders/morph.wgsl`. The CPU path in this module
//! runs the same math and backs hosts without a GPU pipeline and the tests.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use glam::{Vec2, Vec3};

use crate::camera::{model_matrix, Camera};
use crate::config::MorphConfig;
use crate::math::smoothstep;
use crate::particle::ParticleBuffer;
use crate::state::ControlState;

/// Quad corners emitted per particle instance (two triangles).
pub const VERTICES_PER_PARTICLE: u32 = 6;

/// GPU-compatible particle pair: 32 bytes, matches WGSL `Particle`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MorphVertex {
    pub source: [f32; 3], // 12 bytes
    pub _pad0: f32,       //  4 bytes
    pub target: [f32; 3], // 12 bytes
    pub _pad1: f32,       //  4 bytes
}

/// Per-frame uniform block: 176 bytes, matches WGSL `Uniforms`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MorphUniforms {
    pub model_view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// rgb + per-particle opacity
    pub color: [f32; 4],
    pub transition: f32,
    pub time: f32,
    pub sway_amplitude: f32,
    pub sway_frequency: f32,
    pub point_scale: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub _pad: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// `dst = src * src_alpha + dst`
    Additive,
    Alpha,
}

/// Fixed pipeline state the host surface has to configure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderState {
    pub blend: BlendMode,
    pub depth_test: bool,
    pub depth_write: bool,
}

/// Particles are density, not surfaces: they add up and never occlude.
pub const POINT_RENDER_STATE: RenderState = RenderState {
    blend: BlendMode::Additive,
    depth_test: false,
    depth_write: false,
};

/// Horizontal sway: `x += sin(time + y * frequency) * amplitude`.
#[inline]
pub fn sway(p: Vec3, time: f32, amplitude: f32, frequency: f32) -> Vec3 {
    Vec3::new(p.x + (time + p.y * frequency).sin() * amplitude, p.y, p.z)
}

/// Sprite diameter in pixels for a point at view-space `depth`.
///
/// Points at or behind the camera plane get zero size.
#[inline]
pub fn point_size(scale: f32, depth: f32) -> f32 {
    if depth >= 0.0 {
        0.0
    } else {
        scale / -depth
    }
}

/// Opacity across a sprite. `offset` is measured from the sprite center in
/// units of the disc radius; the disc edge and beyond are transparent.
#[inline]
pub fn sprite_alpha(offset: Vec2) -> f32 {
    let d = offset.length();
    if d >= 1.0 {
        0.0
    } else {
        1.0 - smoothstep(0.0, 1.0, d)
    }
}

impl MorphVertex {
    pub fn new(source: Vec3, target: Vec3) -> Self {
        Self {
            source: source.to_array(),
            _pad0: 0.0,
            target: target.to_array(),
            _pad1: 0.0,
        }
    }
}

/// Per-frame morph driver.
///
/// Owns the animation clock. The clock advances a fixed step per rendered
/// frame, so sway speed follows the display refresh rate.
///
/// Elapsed time accumulates in `f64`; the sway term only sees its phase,
/// wrapped to one period, so the step stays fixed in long sessions.
pub struct MorphRenderer {
    elapsed: f64,
    time_step: f32,
    sway_amplitude: f32,
    sway_frequency: f32,
    point_scale: f32,
    color: [f32; 4],
    positions: Vec<Vec3>,
}

impl MorphRenderer {
    pub fn new(config: &MorphConfig) -> Self {
        let [r, g, b] = config.particle_color;
        Self {
            elapsed: 0.0,
            time_step: config.time_step,
            sway_amplitude: config.sway_amplitude,
            sway_frequency: config.sway_frequency,
            point_scale: config.point_scale,
            color: [r, g, b, config.particle_opacity],
            positions: Vec::new(),
        }
    }

    /// Clock value fed to the sway term, in `[0, TAU)`.
    pub fn time(&self) -> f32 {
        self.elapsed.rem_euclid(std::f64::consts::TAU) as f32
    }

    /// Total clock time since the renderer was created.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    pub fn point_scale(&self) -> f32 {
        self.point_scale
    }

    /// Step the animation clock by one frame and return the new time.
    pub fn advance(&mut self) -> f32 {
        self.elapsed += f64::from(self.time_step);
        self.time()
    }

    /// World-space (pre-rotation) position of one particle.
    pub fn display_position(&self, source: Vec3, target: Vec3, transition: f32) -> Vec3 {
        sway(
            source.lerp(target, transition),
            self.time(),
            self.sway_amplitude,
            self.sway_frequency,
        )
    }

    /// Morph every particle at the current clock value.
    pub fn compute_positions(&mut self, buffer: &ParticleBuffer, transition: f32) -> &[Vec3] {
        let count = buffer.count();
        let (time, amplitude, frequency) = (self.time(), self.sway_amplitude, self.sway_frequency);
        let source = buffer.source();
        let target = buffer.target();
        let morph = |i: usize| sway(source[i].lerp(target[i], transition), time, amplitude, frequency);

        #[cfg(feature = "parallel")]
        {
            self.positions = (0..count).into_par_iter().map(morph).collect();
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.positions.clear();
            self.positions.extend((0..count).map(morph));
        }

        &self.positions
    }

    /// Positions from the last [`compute_positions`](Self::compute_positions) call.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Instance data for the GPU path. Only changes when a set is replaced.
    pub fn vertices(buffer: &ParticleBuffer) -> Vec<MorphVertex> {
        buffer
            .pairs()
            .map(|(source, target)| MorphVertex::new(source, target))
            .collect()
    }

    /// Uniform block for the current clock and control state.
    pub fn uniforms(&self, camera: &Camera, control: ControlState) -> MorphUniforms {
        let model_view = camera.view_matrix() * model_matrix(control.rotation);
        let (width, height) = camera.viewport();
        MorphUniforms {
            model_view: model_view.to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
            color: self.color,
            transition: control.transition.clamp(0.0, 1.0),
            time: self.time(),
            sway_amplitude: self.sway_amplitude,
            sway_frequency: self.sway_frequency,
            point_scale: self.point_scale,
            viewport_width: width as f32,
            viewport_height: height as f32,
            _pad: 0.0,
        }
    }

    /// View-space depth and sprite size of a display position.
    pub fn project(&self, camera: &Camera, control: ControlState, p: Vec3) -> (f32, f32) {
        let view = (camera.view_matrix() * model_matrix(control.rotation)).transform_point3(p);
        (view.z, point_size(self.point_scale, view.z))
    }
}
