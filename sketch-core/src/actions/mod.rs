//! Concrete actions shared by the bundled sketches.

mod circle;
mod lines;
mod noise_ring;
mod polygon;

pub use circle::Circle;
pub use lines::LineList;
pub use noise_ring::NoiseRing;
pub use polygon::Polygon;

/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Paint {
    /// Filled in the action colour.
    #[default]
    Fill,
    /// Outlined with the given line width.
    Stroke(f64),
}
