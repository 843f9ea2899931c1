//! Pixel-level collaborators consumed by the graphics layer
//!
//! Raw pixel storage, colors and rectangles, plus the two external
//! collaborator contracts: the display surface and the font metric table.

mod pixel_buffer;
mod color;
mod display;
mod font_metric;

pub use pixel_buffer::{PixelBuffer, PixelFormat};
pub use color::{Color, Rect};
pub use display::DisplaySurface;
pub use font_metric::FontMetric;
