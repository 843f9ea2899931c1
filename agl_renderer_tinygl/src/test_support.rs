//! Headless helpers shared by the unit tests

use std::sync::{Arc, Mutex};
use agl::agl::Result;
use agl::agl::graphics::{DisplaySurface, FontMetric, PixelBuffer, PixelFormat, Rect};
use crate::tinygl_context::{SharedContext, TglContext, TINYGL_MAX_LIGHTS};

/// Surface handing out zeroed framebuffers in a fixed format
pub(crate) struct MemorySurface {
    pub format: PixelFormat,
}

impl DisplaySurface for MemorySurface {
    fn setup_screen(&mut self, width: u32, height: u32, _fullscreen: bool, _accelerated: bool) -> Result<PixelBuffer> {
        Ok(PixelBuffer::new(self.format, (width * height) as usize))
    }

    fn present(&mut self, _frame: Option<&PixelBuffer>) -> Result<()> {
        Ok(())
    }
}

/// A context with a `width x height` RGBA8888 screen
pub(crate) fn context(width: u32, height: u32) -> SharedContext {
    let mut ctx = TglContext::new(Box::new(MemorySurface { format: PixelFormat::RGBA8888 }), TINYGL_MAX_LIGHTS);
    let framebuffer = PixelBuffer::new(PixelFormat::RGBA8888, (width * height) as usize);
    ctx.resize(framebuffer, width, height).unwrap();
    Arc::new(Mutex::new(ctx))
}

pub(crate) fn count_pixels(ctx: &TglContext, rgb: (u8, u8, u8)) -> usize {
    (0..ctx.framebuffer.len()).filter(|&i| ctx.framebuffer.get_rgb_at(i) == rgb).count()
}

/// Monospace 8x10 metric over a 16-column ASCII atlas
pub(crate) struct MonoMetric;

impl FontMetric for MonoMetric {
    fn char_texture_rect(&self, ch: char) -> Rect {
        let code = ch as i32 & 0x7F;
        Rect::new((code % 16) * 8, (code / 16) * 10, 8, 10)
    }

    fn char_quad_rect(&self, _ch: char) -> Rect {
        Rect::new(0, 0, 8, 10)
    }

    fn char_width(&self, _ch: char) -> i32 {
        8
    }

    fn height(&self) -> i32 {
        10
    }
}

/// 128x80 RGBA atlas where only the glyph of `ch` is opaque white
pub(crate) fn atlas_with_glyph(ch: char) -> PixelBuffer {
    let rect = MonoMetric.char_texture_rect(ch);
    let mut pixels = vec![[0u8; 4]; 128 * 80];
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            pixels[(y * 128 + x) as usize] = [255, 255, 255, 255];
        }
    }
    PixelBuffer::from_rgba(&pixels)
}
