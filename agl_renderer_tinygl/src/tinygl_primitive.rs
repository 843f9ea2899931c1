/// Primitive - TinyGL implementation of the Primitive trait

use glam::{Mat4, Vec2, Vec4};
use agl::agl::Result;
use agl::agl::graphics::Color;
use agl::agl::math::PipelineState;
use agl::agl::render::{DrawMode, Primitive, PrimitiveData, PrimitiveSub};
use crate::tinygl_context::{lock, SharedContext};
use crate::tinygl_raster::{draw_line, draw_point, fill_triangle, to_screen, ClipVertex, FragmentSink, ScreenVertex};

pub struct TglPrimitive {
    context: SharedContext,
    data: PrimitiveData,
}

impl TglPrimitive {
    pub(crate) fn new(context: SharedContext, mode: DrawMode) -> Self {
        Self { context, data: PrimitiveData::new(mode) }
    }
}

fn color_vec(c: Color) -> Vec4 {
    Vec4::new(c.r as f32, c.g as f32, c.b as f32, c.a as f32) / 255.0
}

fn screen_vertices(sub: &PrimitiveSub, pipeline: &PipelineState) -> Vec<ScreenVertex> {
    let mvp = pipeline.mvp();
    (0..sub.vertex_count())
        .filter_map(|i| {
            let v = ClipVertex {
                clip: mvp * sub.position(i).extend(0.0).extend(1.0),
                color: color_vec(sub.vertex_color(i)),
                uv: Vec2::ZERO,
            };
            to_screen(&v, pipeline)
        })
        .collect()
}

impl Primitive for TglPrimitive {
    fn data(&self) -> &PrimitiveData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut PrimitiveData {
        &mut self.data
    }

    fn draw(&self, x: f32, y: f32) -> Result<()> {
        let mut guard = lock(&self.context)?;

        // Pixel-space 2D pass: lighting and depth test off, restored below
        let saved_pipeline = guard.pipeline.clone();
        let saved_depth_test = guard.depth_test;
        let ortho = guard.pipeline.pixel_ortho();
        guard.pipeline.set_projection(ortho);
        guard.pipeline.load_modelview(Mat4::from_translation(glam::Vec3::new(x, y, 0.0)));
        guard.pipeline.set_lighting(false);
        guard.depth_test = false;

        let pipeline = guard.pipeline.clone();
        {
            let mut sink = FragmentSink::new(&mut guard);
            for sub in self.data.subs() {
                let v = screen_vertices(sub, &pipeline);
                match self.data.mode() {
                    DrawMode::Points => {
                        for p in &v {
                            draw_point(&mut sink, *p);
                        }
                    }
                    DrawMode::Lines => {
                        for pair in v.chunks_exact(2) {
                            draw_line(&mut sink, pair[0], pair[1]);
                        }
                    }
                    DrawMode::LineLoop => {
                        for i in 0..v.len() {
                            if v.len() > 1 {
                                draw_line(&mut sink, v[i], v[(i + 1) % v.len()]);
                            }
                        }
                    }
                    DrawMode::Quads => {
                        for quad in v.chunks_exact(4) {
                            fill_triangle(&mut sink, [quad[0], quad[1], quad[2]], None);
                            fill_triangle(&mut sink, [quad[0], quad[2], quad[3]], None);
                        }
                    }
                }
            }
        }

        guard.pipeline = saved_pipeline;
        guard.depth_test = saved_depth_test;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tinygl_primitive_tests.rs"]
mod tests;
