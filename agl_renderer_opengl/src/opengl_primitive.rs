/// Primitive - OpenGL implementation of the Primitive trait

use glam::{Mat4, Vec3, Vec4};
use agl::agl::Result;
use agl::agl::graphics::Color;
use agl::agl::render::{DrawMode, Primitive, PrimitiveData, SubColor};
use crate::opengl_api::{BeginMode, Capability};
use crate::opengl_context::{lock, SharedGlContext};

pub struct GlPrimitive {
    context: SharedGlContext,
    data: PrimitiveData,
}

impl GlPrimitive {
    pub(crate) fn new(context: SharedGlContext, mode: DrawMode) -> Self {
        Self { context, data: PrimitiveData::new(mode) }
    }
}

fn begin_mode(mode: DrawMode) -> BeginMode {
    match mode {
        DrawMode::Points => BeginMode::Points,
        DrawMode::Lines => BeginMode::Lines,
        DrawMode::LineLoop => BeginMode::LineLoop,
        DrawMode::Quads => BeginMode::Quads,
    }
}

pub(crate) fn color_vec(c: Color) -> Vec4 {
    Vec4::new(c.r as f32, c.g as f32, c.b as f32, c.a as f32) / 255.0
}

impl Primitive for GlPrimitive {
    fn data(&self) -> &PrimitiveData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut PrimitiveData {
        &mut self.data
    }

    fn draw(&self, x: f32, y: f32) -> Result<()> {
        let mut ctx = lock(&self.context)?;
        let mode = begin_mode(self.data.mode());

        ctx.with_pixel_ortho(|ctx| {
            let mut ctx = ctx.capability_scope(&[Capability::Lighting, Capability::DepthTest, Capability::Texture2D]);
            ctx.gl.disable(Capability::Lighting);
            ctx.gl.disable(Capability::DepthTest);
            ctx.gl.disable(Capability::Texture2D);
            ctx.mult_modelview(Mat4::from_translation(Vec3::new(x, y, 0.0)));

            for sub in self.data.subs() {
                if let SubColor::Global(c) = sub.color() {
                    ctx.gl.color(color_vec(*c));
                }
                ctx.gl.begin(mode);
                for i in 0..sub.vertex_count() {
                    if let SubColor::PerVertex(_) = sub.color() {
                        ctx.gl.color(color_vec(sub.vertex_color(i)));
                    }
                    ctx.gl.vertex2(sub.position(i));
                }
                ctx.gl.end();
            }
            ctx.gl.color(Vec4::ONE);
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "opengl_primitive_tests.rs"]
mod tests;
