/// Texture - TinyGL implementation of the Texture trait

use std::any::Any;
use glam::{Vec2, Vec4};
use agl::agl::Result;
use agl::agl::graphics::{PixelBuffer, PixelFormat};
use agl::agl::render::{validate_bitmap_source, Texture, TextureInfo};

/// Decoded RGBA texels, sampled nearest with repeat wrapping
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub texels: Vec<[u8; 4]>,
}

impl TextureImage {
    pub fn from_buffer(buffer: &PixelBuffer, width: u32, height: u32) -> Result<Self> {
        validate_bitmap_source(buffer, width, height)?;
        let rgba = buffer.converted(PixelFormat::RGBA8888)?;
        let count = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            texels: bytemuck::cast_slice::<u8, [u8; 4]>(&rgba.raw()[..count * 4]).to_vec(),
        })
    }

    /// Normalized RGBA at `uv`
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let wrap = |t: f32, size: u32| {
            let t = t - t.floor();
            ((t * size as f32) as u32).min(size - 1)
        };
        let x = wrap(uv.x, self.width);
        let y = wrap(uv.y, self.height);
        let [r, g, b, a] = self.texels[(y * self.width + x) as usize];
        Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
    }
}

/// TinyGL texture
pub struct TglTexture {
    pub(crate) image: TextureImage,
    info: TextureInfo,
}

impl TglTexture {
    pub(crate) fn new(buffer: &PixelBuffer, width: u32, height: u32) -> Result<Self> {
        let image = TextureImage::from_buffer(buffer, width, height)?;
        let info = TextureInfo {
            width,
            height,
            format: buffer.format(),
            has_alpha: image.texels.iter().any(|t| t[3] < 255),
        };
        agl::agl_debug!("agl::tinygl::Texture", "Created {}x{} texture", width, height);
        Ok(Self { image, info })
    }
}

impl Texture for TglTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "tinygl_texture_tests.rs"]
mod tests;
