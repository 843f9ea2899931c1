//! Headless helpers shared by the unit tests

use std::sync::{Arc, Mutex};
use agl::agl::Result;
use agl::agl::graphics::{DisplaySurface, FontMetric, PixelBuffer, PixelFormat, Rect};
use agl::agl::math::PipelineState;
use crate::opengl_context::{GlContext, SharedGlContext};
use crate::opengl_recording::{GlCall, RecordingGl};

/// Surface standing in for an already-current GL window
pub(crate) struct GlWindow;

impl DisplaySurface for GlWindow {
    fn setup_screen(&mut self, width: u32, height: u32, _fullscreen: bool, _accelerated: bool) -> Result<PixelBuffer> {
        Ok(PixelBuffer::new(PixelFormat::RGBA8888, (width * height) as usize))
    }

    fn present(&mut self, _frame: Option<&PixelBuffer>) -> Result<()> {
        Ok(())
    }
}

/// A `width x height` context over a recorder, with the given tile edge
pub(crate) fn context_with_tiles(width: u32, height: u32, tile_size: u32) -> (SharedGlContext, RecordingGl) {
    let gl = RecordingGl::new(width, height);
    let mut ctx = GlContext::new(Box::new(gl.clone()), tile_size, 8);
    ctx.width = width;
    ctx.height = height;
    ctx.pipeline = PipelineState::new(width, height);
    (Arc::new(Mutex::new(ctx)), gl)
}

pub(crate) fn context(width: u32, height: u32) -> (SharedGlContext, RecordingGl) {
    context_with_tiles(width, height, 256)
}

/// Vertices emitted between each Begin/End pair, in order
pub(crate) fn batches(calls: &[GlCall]) -> Vec<Vec<GlCall>> {
    let mut out = Vec::new();
    let mut current: Option<Vec<GlCall>> = None;
    for call in calls {
        match call {
            GlCall::Begin(_) => current = Some(Vec::new()),
            GlCall::End => out.extend(current.take()),
            GlCall::Vertex2(_) | GlCall::Vertex3(_) => {
                if let Some(batch) = current.as_mut() {
                    batch.push(call.clone());
                }
            }
            _ => {}
        }
    }
    out
}

/// Monospace 8x10 metric over a 16-column ASCII atlas
pub(crate) struct MonoMetric;

impl FontMetric for MonoMetric {
    fn char_texture_rect(&self, ch: char) -> Rect {
        let code = ch as i32 & 0x7F;
        Rect::new((code % 16) * 8, (code / 16) * 10, 8, 10)
    }

    fn char_quad_rect(&self, _ch: char) -> Rect {
        Rect::new(0, 0, 8, 10)
    }

    fn char_width(&self, _ch: char) -> i32 {
        8
    }

    fn height(&self) -> i32 {
        10
    }
}
