/// Render target trait and the shared dim routine

use crate::error::Result;
use crate::graphics::PixelBuffer;

/// The active render surface returned by `Renderer::setup_screen`.
///
/// Owns clear/store/restore/dim for scene transitions. The stored-content
/// buffer is a full-resolution snapshot, absent until `store_content` runs.
pub trait Target: Send {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Bits per pixel of the negotiated framebuffer format
    fn bpp(&self) -> u32;

    /// Reset the color and depth buffers to zero.
    fn clear(&mut self) -> Result<()>;

    /// Turn the stored snapshot into flat gray scaled by `amount`.
    ///
    /// Works on the stored content, not on the live framebuffer; call
    /// `restore_content` to show the result. Without a stored snapshot this
    /// logs a warning and does nothing.
    fn dim(&mut self, amount: f32) -> Result<()>;

    /// Windowed dim hook. No backend implements it.
    fn dim_region(&mut self, x: i32, y: i32, width: u32, height: u32, level: f32) -> Result<()> {
        crate::agl_trace!(
            "agl::Target",
            "dim_region({}, {}, {}x{}, {}) is not implemented",
            x, y, width, height, level
        );
        Ok(())
    }

    /// Copy the whole live framebuffer into the stored-content buffer.
    fn store_content(&mut self) -> Result<()>;

    /// Copy the stored-content buffer back into the live framebuffer.
    fn restore_content(&mut self) -> Result<()>;

    fn has_stored_content(&self) -> bool;

    /// Live framebuffer read back as RGBA8888.
    fn screenshot(&self) -> Result<PixelBuffer>;
}

/// Gray level of one pixel after dimming.
///
/// The channel sum is scaled by `amount` and averaged, so `amount == 1`
/// keeps the luminance sum (up to rounding) and `amount == 0` is black.
pub fn dimmed_gray(r: u8, g: u8, b: u8, amount: f32) -> u8 {
    let sum = r as f32 + g as f32 + b as f32;
    let gray = (sum * amount / 3.0).floor();
    // `as` saturates negatives and NaN to 0
    gray.min(255.0) as u8
}

/// Dim every pixel of `buffer` in place, keeping its alpha.
pub fn dim_pixels(buffer: &mut PixelBuffer, amount: f32) {
    for i in 0..buffer.len() {
        let (a, r, g, b) = buffer.get_argb_at(i);
        let gray = dimmed_gray(r, g, b, amount);
        buffer.set_argb_at(i, a, gray, gray, gray);
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
