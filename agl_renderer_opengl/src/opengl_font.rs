/// Font and Label - OpenGL implementations
///
/// The glyph atlas is uploaded once as a texture; labels draw one textured
/// quad per glyph, modulated by the label color and alpha blended.

use std::any::Any;
use std::sync::Arc;
use glam::{Vec2, Vec4};
use agl::agl::{Error, Result};
use agl::agl::graphics::{Color, FontMetric, PixelBuffer, Rect};
use agl::agl::render::{Font, FontData, Label, LabelLayout};
use crate::opengl_api::{BeginMode, BlendFactor, Capability};
use crate::opengl_context::{lock, GlContext, SharedGlContext};
use crate::opengl_primitive::color_vec;
use crate::opengl_texture::GlTexture;

pub struct GlFont {
    data: FontData,
    atlas: GlTexture,
}

impl GlFont {
    pub(crate) fn new(
        context: SharedGlContext,
        metric: Arc<dyn FontMetric>,
        atlas: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let data = FontData::new(metric, atlas, width, height)?;
        let atlas = GlTexture::new(context, data.atlas(), width, height)?;
        Ok(Self { data, atlas })
    }

    /// Atlas texture coordinates of a pixel rectangle
    fn uv_rect(&self, rect: Rect) -> (Vec2, Vec2) {
        let size = Vec2::new(self.data.width() as f32, self.data.height() as f32);
        let min = Vec2::new(rect.x as f32, rect.y as f32) / size;
        let max = Vec2::new(rect.right() as f32, rect.bottom() as f32) / size;
        (min, max)
    }
}

impl Font for GlFont {
    fn data(&self) -> &FontData {
        &self.data
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub struct GlLabel {
    context: SharedGlContext,
    font: Arc<dyn Font>,
    gl_font: Arc<GlFont>,
    layout: LabelLayout,
    color: Color,
}

impl GlLabel {
    /// Fails with `InvalidResource` when `font` is not a `GlFont`.
    pub(crate) fn new(context: SharedGlContext, font: Arc<dyn Font>) -> Result<Self> {
        let gl_font = font.clone().into_any().downcast::<GlFont>().map_err(|_| {
            Error::InvalidResource("font was not created by the OpenGL renderer".to_string())
        })?;
        Ok(Self {
            context,
            font,
            gl_font,
            layout: LabelLayout::new(),
            color: Color::WHITE,
        })
    }

    fn draw_glyphs(&self, ctx: &mut GlContext, x: i32, y: i32) {
        let font = &self.gl_font;
        let metric = font.data.metric();
        ctx.gl.bind_texture(font.atlas.id());
        ctx.gl.color(color_vec(self.color));
        ctx.gl.begin(BeginMode::Quads);
        for line in self.layout.layout(metric) {
            let mut pen_x = x + line.rect.x;
            let pen_y = y + line.rect.y;
            for ch in line.text.chars() {
                let quad = metric.char_quad_rect(ch);
                let (uv0, uv1) = font.uv_rect(metric.char_texture_rect(ch));
                let left = (pen_x + quad.x) as f32;
                let top = (pen_y + quad.y) as f32;
                let right = left + quad.width as f32;
                let bottom = top + quad.height as f32;
                for (uv, corner) in [
                    (uv0, Vec2::new(left, top)),
                    (Vec2::new(uv1.x, uv0.y), Vec2::new(right, top)),
                    (uv1, Vec2::new(right, bottom)),
                    (Vec2::new(uv0.x, uv1.y), Vec2::new(left, bottom)),
                ] {
                    ctx.gl.tex_coord(uv);
                    ctx.gl.vertex2(corner);
                }
                pen_x += metric.char_width(ch);
            }
        }
        ctx.gl.end();
        ctx.gl.color(Vec4::ONE);
    }
}

impl Label for GlLabel {
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
        let mut ctx = lock(&self.context)?;
        ctx.with_pixel_ortho(|ctx| {
            let mut ctx = ctx.capability_scope(&[
                Capability::Lighting,
                Capability::DepthTest,
                Capability::Texture2D,
                Capability::Blend,
            ]);
            ctx.gl.disable(Capability::Lighting);
            ctx.gl.disable(Capability::DepthTest);
            ctx.gl.enable(Capability::Texture2D);
            ctx.gl.enable(Capability::Blend);
            ctx.gl.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
            self.draw_glyphs(&mut ctx, x, y);
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "opengl_font_tests.rs"]
mod tests;
