/// Target - OpenGL implementation of the Target trait
///
/// The stored content is a `glReadPixels` copy of the color buffer, kept
/// bottom row first as GL returns it, and written back with `glDrawPixels`.

use agl::agl::Result;
use agl::agl::graphics::{PixelBuffer, PixelFormat, Rect};
use agl::agl::math::flip_rows_in_place;
use agl::agl::render::{dim_pixels, Target};
use crate::opengl_api::{Capability, ClearBuffers, PixelData};
use crate::opengl_context::{lock, SharedGlContext};

/// Flags that would alter a verbatim pixel copy
const COPY_CAPABILITIES: [Capability; 6] = [
    Capability::DepthTest,
    Capability::Blend,
    Capability::Texture2D,
    Capability::ScissorTest,
    Capability::StencilTest,
    Capability::Lighting,
];

pub struct GlTarget {
    context: SharedGlContext,
    width: u32,
    height: u32,
    bpp: u32,
    stored: Option<PixelBuffer>,
}

impl GlTarget {
    pub(crate) fn new(context: SharedGlContext, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            context,
            width,
            height,
            bpp: format.bytes_per_pixel as u32 * 8,
            stored: None,
        }
    }

    fn screen(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Whole color buffer as RGBA8888, bottom row first
    fn read_back(&self) -> Result<PixelBuffer> {
        let pixels = lock(&self.context)?.gl.read_pixels(self.screen());
        PixelBuffer::from_bytes(PixelFormat::RGBA8888, pixels)
    }
}

impl Target for GlTarget {
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
        lock(&self.context)?.gl.clear(ClearBuffers::COLOR | ClearBuffers::DEPTH);
        Ok(())
    }

    fn dim(&mut self, amount: f32) -> Result<()> {
        match self.stored.as_mut() {
            Some(stored) => dim_pixels(stored, amount),
            None => agl::agl_warn!("agl::opengl::Target", "dim({}) without stored content", amount),
        }
        Ok(())
    }

    fn store_content(&mut self) -> Result<()> {
        self.stored = Some(self.read_back()?);
        Ok(())
    }

    fn restore_content(&mut self) -> Result<()> {
        let Some(stored) = self.stored.as_ref() else {
            agl::agl_warn!("agl::opengl::Target", "restore_content without stored content");
            return Ok(());
        };
        let (width, height) = (self.width, self.height);
        let mut ctx = lock(&self.context)?;
        ctx.with_pixel_ortho(|ctx| {
            let mut ctx = ctx.capability_scope(&COPY_CAPABILITIES);
            for cap in COPY_CAPABILITIES {
                ctx.gl.disable(cap);
            }
            ctx.window_raster_pos(0, height as i32);
            ctx.gl.draw_pixels(width, height, PixelData::Rgba(stored.raw()));
            Ok(())
        })
    }

    fn has_stored_content(&self) -> bool {
        self.stored.is_some()
    }

    fn screenshot(&self) -> Result<PixelBuffer> {
        let mut shot = self.read_back()?;
        let texels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(shot.raw_mut());
        flip_rows_in_place(texels, self.width as usize, self.height as usize);
        Ok(shot)
    }
}

#[cfg(test)]
#[path = "opengl_target_tests.rs"]
mod tests;
