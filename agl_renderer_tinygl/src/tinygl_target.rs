/// Target - TinyGL implementation of the Target trait

use agl::agl::Result;
use agl::agl::graphics::{PixelBuffer, PixelFormat};
use agl::agl::render::{dim_pixels, Target};
use crate::tinygl_context::{lock, SharedContext};

pub struct TglTarget {
    context: SharedContext,
    width: u32,
    height: u32,
    bpp: u32,
    stored: Option<PixelBuffer>,
}

impl TglTarget {
    pub(crate) fn new(context: SharedContext, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            context,
            width,
            height,
            bpp: format.bytes_per_pixel as u32 * 8,
            stored: None,
        }
    }

    fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Target for TglTarget {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bpp(&self) -> u32 {
        self.bpp
    }

    fn clear(&mut self) -> Result<()> {
        let count = self.pixel_count();
        let mut ctx = lock(&self.context)?;
        ctx.framebuffer.clear(count);
        ctx.depth.fill(0);
        Ok(())
    }

    fn dim(&mut self, amount: f32) -> Result<()> {
        match self.stored.as_mut() {
            Some(stored) => dim_pixels(stored, amount),
            None => agl::agl_warn!("agl::tinygl::Target", "dim({}) without stored content", amount),
        }
        Ok(())
    }

    fn store_content(&mut self) -> Result<()> {
        let ctx = lock(&self.context)?;
        match self.stored.as_mut() {
            Some(stored) if stored.len() == ctx.framebuffer.len() && stored.format() == ctx.framebuffer.format() => {
                stored.copy_buffer(0, self.width as usize * self.height as usize, &ctx.framebuffer)?;
            }
            _ => self.stored = Some(ctx.framebuffer.clone()),
        }
        Ok(())
    }

    fn restore_content(&mut self) -> Result<()> {
        let Some(stored) = self.stored.as_ref() else {
            agl::agl_warn!("agl::tinygl::Target", "restore_content without stored content");
            return Ok(());
        };
        let count = self.pixel_count();
        let mut ctx = lock(&self.context)?;
        ctx.framebuffer.copy_buffer(0, count, stored)
    }

    fn has_stored_content(&self) -> bool {
        self.stored.is_some()
    }

    fn screenshot(&self) -> Result<PixelBuffer> {
        let ctx = lock(&self.context)?;
        ctx.framebuffer.converted(PixelFormat::RGBA8888)
    }
}

#[cfg(test)]
#[path = "tinygl_target_tests.rs"]
mod tests;
