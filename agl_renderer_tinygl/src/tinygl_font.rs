/// Font and Label - TinyGL implementations
///
/// Labels are blitted glyph by glyph straight from the font atlas into the
/// framebuffer, bypassing the rasterizer.

use std::any::Any;
use std::sync::Arc;
use agl::agl::Result;
use agl::agl::graphics::{Color, FontMetric, PixelBuffer, Rect};
use agl::agl::render::{Font, FontData, Label, LabelLayout};
use crate::tinygl_context::{lock, SharedContext, TglContext};

pub struct TglFont {
    data: FontData,
}

impl TglFont {
    pub(crate) fn new(metric: Arc<dyn FontMetric>, atlas: &PixelBuffer, width: u32, height: u32) -> Result<Self> {
        Ok(Self { data: FontData::new(metric, atlas, width, height)? })
    }
}

impl Font for TglFont {
    fn data(&self) -> &FontData {
        &self.data
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub struct TglLabel {
    context: SharedContext,
    font: Arc<dyn Font>,
    layout: LabelLayout,
    color: Color,
}

impl TglLabel {
    pub(crate) fn new(context: SharedContext, font: Arc<dyn Font>) -> Self {
        Self {
            context,
            font,
            layout: LabelLayout::new(),
            color: Color::WHITE,
        }
    }
}

/// Atlas channel modulated by the foreground channel
fn modulate(atlas: u8, fg: u8) -> u8 {
    (atlas as u32 * fg as u32 / 256) as u8
}

fn blit_glyph(ctx: &mut TglContext, font: &FontData, src: Rect, dst: Rect, fg: Color) {
    let w = src.width.min(dst.width);
    let h = src.height.min(dst.height);
    for j in 0..h {
        for i in 0..w {
            let [r, g, b, a] = font.atlas_pixel(src.x + i, src.y + j);
            let alpha = modulate(a, fg.a);
            if alpha == 0 {
                continue;
            }
            if let Some(index) = ctx.pixel_index(dst.x + i, dst.y + j) {
                ctx.framebuffer.set_pixel_at(index, modulate(r, fg.r), modulate(g, fg.g), modulate(b, fg.b));
            }
        }
    }
}

impl Label for TglLabel {
    fn font(&self) -> &Arc<dyn Font> {
        &self.font
    }

    fn layout(&self) -> &LabelLayout {
        &self.layout
    }

    fn layout_mut(&mut self) -> &mut LabelLayout {
        &mut self.layout
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw(&self, x: i32, y: i32) -> Result<()> {
        let font = self.font.data();
        let metric = font.metric();
        let mut ctx = lock(&self.context)?;

        for line in self.layout.layout(metric) {
            let mut pen_x = x + line.rect.x;
            let pen_y = y + line.rect.y;
            for ch in line.text.chars() {
                let quad = metric.char_quad_rect(ch);
                let dst = Rect::new(pen_x + quad.x, pen_y + quad.y, quad.width, quad.height);
                blit_glyph(&mut ctx, font, metric.char_texture_rect(ch), dst, self.color);
                pen_x += metric.char_width(ch);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tinygl_font_tests.rs"]
mod tests;
