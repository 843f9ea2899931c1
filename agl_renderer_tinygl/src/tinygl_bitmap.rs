/// Bitmap2D - TinyGL implementation of the Bitmap2D trait
///
/// Images are copied straight into the framebuffer, depth maps straight into
/// the z-buffer. Both are clipped to the screen; nothing goes through the
/// triangle pipeline.

use agl::agl::Result;
use agl::agl::graphics::{PixelBuffer, PixelFormat, Rect};
use agl::agl::render::{depth_values, validate_bitmap_source, Bitmap2D, Bitmap2DType};
use crate::tinygl_context::{lock, SharedContext};

enum BitmapPixels {
    /// Pixels converted to the framebuffer format at creation, plus the
    /// opacity of each pixel when the source had transparency
    Image { pixels: PixelBuffer, opaque: Option<Vec<bool>> },
    /// Raw 16-bit depth values, top row first
    Depth(Vec<u16>),
}

pub struct TglBitmap {
    context: SharedContext,
    width: u32,
    height: u32,
    pixels: BitmapPixels,
}

impl TglBitmap {
    pub(crate) fn new(
        context: SharedContext,
        kind: Bitmap2DType,
        buffer: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        validate_bitmap_source(buffer, width, height)?;
        let count = width as usize * height as usize;

        let pixels = match kind {
            Bitmap2DType::Image => {
                let format = lock(&context)?.framebuffer.format();
                let opaque = buffer
                    .has_transparency()
                    .then(|| (0..count).map(|i| buffer.get_rgba_at(i)[3] != 0).collect());
                let mut pixels = PixelBuffer::new(format, count);
                pixels.copy_buffer(0, count, buffer)?;
                BitmapPixels::Image { pixels, opaque }
            }
            Bitmap2DType::Depth => BitmapPixels::Depth(depth_values(buffer, width, height)?),
        };

        agl::agl_debug!("agl::tinygl::Bitmap2D", "Created {:?} bitmap {}x{}", kind, width, height);
        Ok(Self { context, width, height, pixels })
    }
}

impl Bitmap2D for TglBitmap {
    fn kind(&self) -> Bitmap2DType {
        match self.pixels {
            BitmapPixels::Image { .. } => Bitmap2DType::Image,
            BitmapPixels::Depth(_) => Bitmap2DType::Depth,
        }
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw(&self, x: i32, y: i32) -> Result<()> {
        let mut guard = lock(&self.context)?;
        let ctx = &mut *guard;

        let screen = Rect::new(0, 0, ctx.width as i32, ctx.height as i32);
        let Some(visible) = Rect::new(x, y, self.width as i32, self.height as i32).intersect(&screen) else {
            return Ok(());
        };

        let screen_width = ctx.width as usize;
        let src_width = self.width as usize;
        let columns = visible.width as usize;

        for row in visible.y..visible.bottom() {
            let src_start = (row - y) as usize * src_width + (visible.x - x) as usize;
            let dst_start = row as usize * screen_width + visible.x as usize;

            match &self.pixels {
                BitmapPixels::Depth(values) => {
                    ctx.depth[dst_start..dst_start + columns]
                        .copy_from_slice(&values[src_start..src_start + columns]);
                }
                BitmapPixels::Image { pixels, opaque: None } if pixels.format() == ctx.framebuffer.format() => {
                    let bpp = pixels.format().bytes_per_pixel as usize;
                    ctx.framebuffer.raw_mut()[dst_start * bpp..(dst_start + columns) * bpp]
                        .copy_from_slice(&pixels.raw()[src_start * bpp..(src_start + columns) * bpp]);
                }
                BitmapPixels::Image { pixels, opaque } => {
                    let format: PixelFormat = ctx.framebuffer.format();
                    for i in 0..columns {
                        if opaque.as_ref().is_some_and(|o| !o[src_start + i]) {
                            continue;
                        }
                        let raw = format.encode(pixels.get_rgba_at(src_start + i));
                        ctx.framebuffer.write_raw(dst_start + i, raw);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tinygl_bitmap_tests.rs"]
mod tests;
