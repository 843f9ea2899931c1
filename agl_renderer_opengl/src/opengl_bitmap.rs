/// Bitmap2D - OpenGL implementation of the Bitmap2D trait
///
/// Images are split into square texture tiles and drawn as one quad per
/// tile. Depth maps are kept as a flipped 16-bit buffer and written straight
/// into the depth buffer with `glDrawPixels`.

use glam::{Vec2, Vec4};
use agl::agl::Result;
use agl::agl::graphics::{PixelBuffer, PixelFormat, Rect};
use agl::agl::math::{flip_rows_in_place, Tile, TileGrid};
use agl::agl::render::{depth_values, validate_bitmap_source, Bitmap2D, Bitmap2DType};
use crate::opengl_api::{BeginMode, BlendFactor, Capability, CompareFunc, PixelData, TextureId};
use crate::opengl_context::{lock, GlContext, SharedGlContext};
use crate::opengl_texture::upload_texture;

enum BitmapStorage {
    /// One texture per tile, row-major
    Tiles { textures: Vec<(Tile, TextureId)>, tile_size: u32, blend: bool },
    /// Depth values, bottom row first
    Depth(Vec<u16>),
}

pub struct GlBitmap {
    context: SharedGlContext,
    kind: Bitmap2DType,
    width: u32,
    height: u32,
    storage: BitmapStorage,
}

/// Copy the `tile` region of an RGBA image into a zero-padded square buffer.
fn tile_texels(rgba: &PixelBuffer, image_width: u32, tile: &Tile, tile_size: u32) -> Vec<u8> {
    let edge = tile_size as usize;
    let mut texels = vec![0u8; edge * edge * 4];
    let row_bytes = tile.rect.width as usize * 4;
    for row in 0..tile.rect.height as usize {
        let src = ((tile.rect.y as usize + row) * image_width as usize + tile.rect.x as usize) * 4;
        let dst = row * edge * 4;
        texels[dst..dst + row_bytes].copy_from_slice(&rgba.raw()[src..src + row_bytes]);
    }
    texels
}

fn upload_tiles(ctx: &mut GlContext, rgba: &PixelBuffer, width: u32, height: u32) -> Result<Vec<(Tile, TextureId)>> {
    let tile_size = ctx.tile_size;
    let mut textures = Vec::new();
    for tile in TileGrid::new(width, height, tile_size).tiles() {
        let texels = tile_texels(rgba, width, &tile, tile_size);
        match upload_texture(ctx, tile_size, tile_size, &texels) {
            Ok(id) => textures.push((tile, id)),
            Err(e) => {
                for (_, id) in textures {
                    ctx.gl.delete_texture(id);
                }
                agl::agl_error!(
                    "agl::opengl::Bitmap2D",
                    "Tile {} of {}x{} bitmap failed to upload: {}",
                    tile.index, width, height, e
                );
                return Err(e);
            }
        }
    }
    Ok(textures)
}

impl GlBitmap {
    pub(crate) fn new(
        context: SharedGlContext,
        kind: Bitmap2DType,
        buffer: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        validate_bitmap_source(buffer, width, height)?;

        let storage = match kind {
            Bitmap2DType::Image => {
                let rgba = buffer.converted(PixelFormat::RGBA8888)?;
                let mut ctx = lock(&context)?;
                let textures = upload_tiles(&mut ctx, &rgba, width, height)?;
                agl::agl_debug!(
                    "agl::opengl::Bitmap2D",
                    "{}x{} image split into {} tiles of {}",
                    width, height, textures.len(), ctx.tile_size
                );
                BitmapStorage::Tiles {
                    textures,
                    tile_size: ctx.tile_size,
                    blend: rgba.has_transparency(),
                }
            }
            Bitmap2DType::Depth => {
                let mut depth = depth_values(buffer, width, height)?;
                flip_rows_in_place(&mut depth, width as usize, height as usize);
                BitmapStorage::Depth(depth)
            }
        };

        Ok(Self { context, kind, width, height, storage })
    }

    pub(crate) fn tile_count(&self) -> usize {
        match &self.storage {
            BitmapStorage::Tiles { textures, .. } => textures.len(),
            BitmapStorage::Depth(_) => 0,
        }
    }
}

fn draw_tiles(ctx: &mut GlContext, textures: &[(Tile, TextureId)], tile_size: u32, x: i32, y: i32) {
    let edge = tile_size as f32;
    ctx.gl.color(Vec4::ONE);
    for (tile, id) in textures {
        let left = x as f32 + tile.rect.x as f32;
        let top = y as f32 + tile.rect.y as f32;
        ctx.gl.bind_texture(*id);
        ctx.gl.begin(BeginMode::Quads);
        for (uv, corner) in [
            (Vec2::new(0.0, 0.0), Vec2::new(left, top)),
            (Vec2::new(1.0, 0.0), Vec2::new(left + edge, top)),
            (Vec2::new(1.0, 1.0), Vec2::new(left + edge, top + edge)),
            (Vec2::new(0.0, 1.0), Vec2::new(left, top + edge)),
        ] {
            ctx.gl.tex_coord(uv);
            ctx.gl.vertex2(corner);
        }
        ctx.gl.end();
    }
}

impl Bitmap2D for GlBitmap {
    fn kind(&self) -> Bitmap2DType {
        self.kind
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw(&self, x: i32, y: i32) -> Result<()> {
        let mut ctx = lock(&self.context)?;
        let area = Rect::new(x, y, self.width as i32, self.height as i32);

        ctx.with_pixel_ortho(|ctx| {
            let scissor = ctx.scissor_for(area);
            let mut ctx = ctx.capability_scope(&[
                Capability::ScissorTest,
                Capability::Blend,
                Capability::Texture2D,
                Capability::Lighting,
                Capability::DepthTest,
            ]);
            ctx.gl.enable(Capability::ScissorTest);
            ctx.gl.scissor(scissor);
            ctx.gl.disable(Capability::Lighting);

            match &self.storage {
                BitmapStorage::Tiles { textures, tile_size, blend } => {
                    if *blend {
                        ctx.gl.enable(Capability::Blend);
                        ctx.gl.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
                    } else {
                        ctx.gl.disable(Capability::Blend);
                    }
                    // Images never touch the depth buffer
                    ctx.gl.disable(Capability::DepthTest);
                    ctx.gl.enable(Capability::Texture2D);
                    draw_tiles(&mut ctx, textures, *tile_size, x, y);
                }
                BitmapStorage::Depth(depth) => {
                    ctx.gl.disable(Capability::Blend);
                    ctx.gl.disable(Capability::Texture2D);
                    ctx.gl.enable(Capability::DepthTest);
                    ctx.gl.depth_func(CompareFunc::Always);
                    ctx.gl.color_mask(false);
                    ctx.window_raster_pos(x, y.saturating_add(self.height as i32));
                    ctx.gl.draw_pixels(self.width, self.height, PixelData::Depth16(depth));
                    ctx.gl.color_mask(true);
                    ctx.gl.depth_func(CompareFunc::Less);
                }
            }
            Ok(())
        })
    }
}

impl Drop for GlBitmap {
    fn drop(&mut self) {
        let BitmapStorage::Tiles { textures, .. } = &self.storage else {
            return;
        };
        match lock(&self.context) {
            Ok(mut ctx) => {
                for (_, id) in textures {
                    ctx.gl.delete_texture(*id);
                }
            }
            Err(e) => agl::agl_error!("agl::opengl::Bitmap2D", "Failed to release tiles: {}", e),
        }
    }
}

#[cfg(test)]
#[path = "opengl_bitmap_tests.rs"]
mod tests;
