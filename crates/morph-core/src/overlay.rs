//! Debug overlay of detected landmarks.
//!
//! Purely observational. Dots are placed in the pixel space of the source
//! video so the overlay canvas can be sized to match it.

use glam::Vec2;

use crate::gesture::Landmark;

/// A 2D surface the landmark dots are drawn on.
pub trait OverlaySurface {
    fn clear(&mut self);
    fn draw_dots(&mut self, dots: &[Vec2]);
}

#[derive(Clone, Debug, PartialEq)]
pub enum OverlayCommand {
    Clear,
    Dots(Vec<Vec2>),
}

impl OverlayCommand {
    /// Clear, then draw the dots if there are any.
    pub fn apply(&self, surface: &mut dyn OverlaySurface) {
        surface.clear();
        if let OverlayCommand::Dots(dots) = self {
            surface.draw_dots(dots);
        }
    }
}

/// Scale normalized landmarks to a `width` x `height` video frame.
pub fn landmark_dots(landmarks: &[Landmark], width: u32, height: u32) -> Vec<Vec2> {
    let size = Vec2::new(width as f32, height as f32);
    landmarks.iter().map(|lm| lm.xy() * size).collect()
}

/// Overlay that keeps the last drawn dots for a host to read back.
#[derive(Clone, Debug, Default)]
pub struct DotBuffer {
    dots: Vec<Vec2>,
}

impl DotBuffer {
    pub fn dots(&self) -> &[Vec2] {
        &self.dots
    }

    /// `[x0, y0, x1, y1, ...]`
    pub fn flattened(&self) -> Vec<f32> {
        self.dots.iter().flat_map(|d| [d.x, d.y]).collect()
    }
}

impl OverlaySurface for DotBuffer {
    fn clear(&mut self) {
        self.dots.clear();
    }

    fn draw_dots(&mut self, dots: &[Vec2]) {
        self.dots.extend_from_slice(dots);
    }
}
