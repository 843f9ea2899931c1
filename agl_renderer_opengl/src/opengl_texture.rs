/// Texture - OpenGL implementation of the Texture trait

use std::any::Any;
use agl::agl::{Error, Result};
use agl::agl::graphics::{PixelBuffer, PixelFormat};
use agl::agl::render::{validate_bitmap_source, Texture, TextureInfo};
use crate::opengl_api::TextureId;
use crate::opengl_context::{lock, GlContext, SharedGlContext};

/// Upload `width x height` RGBA texels into a fresh texture object.
pub(crate) fn upload_texture(ctx: &mut GlContext, width: u32, height: u32, rgba: &[u8]) -> Result<TextureId> {
    let id = ctx.gl.gen_texture().ok_or(Error::OutOfMemory)?;
    ctx.gl.bind_texture(id);
    ctx.gl.tex_image_2d(width, height, rgba);
    Ok(id)
}

pub struct GlTexture {
    context: SharedGlContext,
    id: TextureId,
    info: TextureInfo,
}

impl GlTexture {
    pub(crate) fn new(context: SharedGlContext, buffer: &PixelBuffer, width: u32, height: u32) -> Result<Self> {
        validate_bitmap_source(buffer, width, height)?;
        let rgba = buffer.converted(PixelFormat::RGBA8888)?;
        let count = width as usize * height as usize;

        let id = {
            let mut ctx = lock(&context)?;
            let max = ctx.gl.max_texture_size();
            if width > max || height > max {
                agl::agl_warn!(
                    "agl::opengl::Texture",
                    "{}x{} texture exceeds GL_MAX_TEXTURE_SIZE {}",
                    width, height, max
                );
            }
            upload_texture(&mut ctx, width, height, &rgba.raw()[..count * 4])?
        };

        Ok(Self {
            context,
            id,
            info: TextureInfo {
                width,
                height,
                format: buffer.format(),
                has_alpha: rgba.has_transparency(),
            },
        })
    }

    pub fn id(&self) -> TextureId {
        self.id
    }
}

impl Texture for GlTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for GlTexture {
    fn drop(&mut self) {
        match lock(&self.context) {
            Ok(mut ctx) => ctx.gl.delete_texture(self.id),
            Err(e) => agl::agl_error!("agl::opengl::Texture", "Failed to delete texture {}: {}", self.id, e),
        }
    }
}

#[cfg(test)]
#[path = "opengl_texture_tests.rs"]
mod tests;
