/// 2D primitives: points, lines, line loops and quads in pixel space

use glam::Vec2;
use crate::error::{Error, Result};
use crate::graphics::Color;

/// How the vertices of every sub are assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMode {
    Points,
    Lines,
    LineLoop,
    /// Four vertices per quad
    Quads,
}

/// Color source of one sub
#[derive(Debug, Clone, PartialEq)]
pub enum SubColor {
    /// One color set once for the whole sub
    Global(Color),
    /// RGBA bytes, four per vertex
    PerVertex(Vec<u8>),
}

/// One run of 2D vertices sharing a color source
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSub {
    positions: Vec<f32>,
    color: SubColor,
}

impl PrimitiveSub {
    /// `positions` holds two floats per vertex; per-vertex colors must
    /// supply exactly four bytes per vertex.
    pub fn new(positions: Vec<f32>, color: SubColor) -> Result<Self> {
        if positions.len() % 2 != 0 {
            return Err(Error::InvalidResource(format!(
                "primitive positions need 2 floats per vertex, got {}", positions.len()
            )));
        }
        if let SubColor::PerVertex(colors) = &color {
            let expected = positions.len() / 2 * 4;
            if colors.len() != expected {
                return Err(Error::InvalidResource(format!(
                    "per-vertex colors: expected {} bytes for {} vertices, got {}",
                    expected, positions.len() / 2, colors.len()
                )));
            }
        }
        Ok(Self { positions, color })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 2
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn color(&self) -> &SubColor {
        &self.color
    }

    pub fn position(&self, i: usize) -> Vec2 {
        Vec2::new(self.positions[i * 2], self.positions[i * 2 + 1])
    }

    /// Color of vertex `i`, whichever source the sub uses
    pub fn vertex_color(&self, i: usize) -> Color {
        match &self.color {
            SubColor::Global(c) => *c,
            SubColor::PerVertex(bytes) => {
                let c = &bytes[i * 4..i * 4 + 4];
                Color::rgba(c[0], c[1], c[2], c[3])
            }
        }
    }
}

/// Draw mode plus the list of subs
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveData {
    mode: DrawMode,
    subs: Vec<PrimitiveSub>,
}

impl PrimitiveData {
    pub fn new(mode: DrawMode) -> Self {
        Self { mode, subs: Vec::new() }
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
    }

    pub fn add_sub(&mut self, sub: PrimitiveSub) {
        self.subs.push(sub);
    }

    pub fn subs(&self) -> &[PrimitiveSub] {
        &self.subs
    }

    pub fn clear(&mut self) {
        self.subs.clear();
    }
}

/// Primitive resource drawn in pixel coordinates.
///
/// Drawing switches to a pixel-space orthographic projection with lighting
/// and depth test off, and restores the previous state before returning.
pub trait Primitive: Send {
    fn data(&self) -> &PrimitiveData;

    fn data_mut(&mut self) -> &mut PrimitiveData;

    /// Draw every sub offset by `(x, y)` pixels.
    fn draw(&self, x: f32, y: f32) -> Result<()>;
}

#[cfg(test)]
#[path = "primitive_tests.rs"]
mod tests;
