mod canvas;

pub use canvas::CellCanvas;

use crate::wave::geometry::{Point, WavePath};
use crate::wave::style::Color;

/// A circular clip region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether the circle covers no area at all.
    pub fn is_empty(&self) -> bool {
        self.radius <= 0.0
    }

    pub fn contains(&self, point: Point) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        !self.is_empty() && dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// The drawing primitives a host has to provide to display a wave.
pub trait RenderSurface {
    /// Restrict every following fill to `circle`, replacing any previous clip.
    fn clip_to_circle(&mut self, circle: Circle);

    /// Fill the closed polygon described by `path`.
    fn fill_path(&mut self, path: &WavePath, color: Color);

    /// Drop the current clip.
    fn reset_clip(&mut self);
}
