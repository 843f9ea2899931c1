/// 2D bitmap trait and helpers shared by the backends

use crate::error::{Error, Result};
use crate::graphics::{PixelBuffer, PixelFormat};

/// What a bitmap carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bitmap2DType {
    /// Color image blitted to the framebuffer
    Image,
    /// Depth values written straight into the depth buffer
    Depth,
}

/// Screen-space bitmap created once from a `PixelBuffer` and immutable afterwards.
///
/// Backend handles (tiles, raw buffers) are released when the bitmap is dropped.
pub trait Bitmap2D: Send {
    fn kind(&self) -> Bitmap2DType;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Draw with the top-left corner at pixel `(x, y)`.
    fn draw(&self, x: i32, y: i32) -> Result<()>;
}

/// Check that `buffer` holds at least `width * height` pixels.
pub fn validate_bitmap_source(buffer: &PixelBuffer, width: u32, height: u32) -> Result<()> {
    let needed = width as usize * height as usize;
    if width == 0 || height == 0 {
        return Err(Error::InvalidResource(format!(
            "bitmap must not be empty ({}x{})", width, height
        )));
    }
    if buffer.len() < needed {
        return Err(Error::InvalidResource(format!(
            "bitmap {}x{} needs {} pixels, buffer has {}",
            width, height, needed, buffer.len()
        )));
    }
    Ok(())
}

/// 16-bit depth values of a depth bitmap, row-major, top row first.
///
/// The source is converted to RGB565 first, so each packed word is read as
/// the depth value (the asset pipeline stores depth maps as 16-bit images).
pub fn depth_values(buffer: &PixelBuffer, width: u32, height: u32) -> Result<Vec<u16>> {
    validate_bitmap_source(buffer, width, height)?;
    let depth = buffer.converted(PixelFormat::RGB565)?;
    let count = width as usize * height as usize;
    Ok(depth.raw()[..count * 2]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

#[cfg(test)]
#[path = "bitmap2d_tests.rs"]
mod tests;
