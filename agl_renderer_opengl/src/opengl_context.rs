/// GlContext - shared GL state for all OpenGL resources
///
/// Contains everything a resource needs at draw or release time:
/// - The `GlApi` the commands are issued through
/// - A CPU mirror of the matrix stacks and lighting flag (`PipelineState`)
/// - Screen size and the limits negotiated at creation
///
/// Resources hold it behind `Arc<Mutex<..>>` and lock it per call.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard};
use glam::{Mat4, Vec2};
use agl::agl::{Error, Result};
use agl::agl::graphics::Rect;
use agl::agl::math::PipelineState;
use crate::opengl_api::{Capability, GlApi, MatrixMode};

pub(crate) struct GlContext {
    pub gl: Box<dyn GlApi>,
    pub pipeline: PipelineState,
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub max_lights: u32,
}

pub(crate) type SharedGlContext = Arc<Mutex<GlContext>>;

impl GlContext {
    pub fn new(gl: Box<dyn GlApi>, tile_size: u32, max_lights: u32) -> Self {
        Self {
            gl,
            pipeline: PipelineState::new(0, 0),
            width: 0,
            height: 0,
            tile_size,
            max_lights,
        }
    }

    // ===== MIRRORED MATRIX CALLS =====

    pub fn load_projection(&mut self, m: Mat4) {
        self.gl.matrix_mode(MatrixMode::Projection);
        self.gl.load_matrix(m);
        self.gl.matrix_mode(MatrixMode::ModelView);
        self.pipeline.set_projection(m);
    }

    pub fn load_modelview(&mut self, m: Mat4) {
        self.gl.load_matrix(m);
        self.pipeline.load_modelview(m);
    }

    pub fn mult_modelview(&mut self, m: Mat4) {
        self.gl.mult_matrix(m);
        self.pipeline.mult_modelview(m);
    }

    /// Returns `false` on stack overflow, leaving both stacks untouched.
    pub fn push_modelview(&mut self) -> bool {
        if !self.pipeline.push_modelview() {
            return false;
        }
        self.gl.push_matrix();
        true
    }

    /// Returns `false` on underflow, leaving both stacks untouched.
    pub fn pop_modelview(&mut self) -> bool {
        if !self.pipeline.pop_modelview() {
            return false;
        }
        self.gl.pop_matrix();
        true
    }

    // ===== 2D HELPERS =====

    /// Run `f` under a pixel-space orthographic projection and an identity
    /// model-view, restoring both matrices afterwards whatever `f` returns.
    pub fn with_pixel_ortho<T>(&mut self, f: impl FnOnce(&mut GlContext) -> Result<T>) -> Result<T> {
        let saved = self.pipeline.clone();
        let ortho = self.pipeline.pixel_ortho();

        self.gl.matrix_mode(MatrixMode::Projection);
        self.gl.push_matrix();
        self.gl.load_matrix(ortho);
        self.gl.matrix_mode(MatrixMode::ModelView);
        self.gl.push_matrix();
        self.gl.load_matrix(Mat4::IDENTITY);
        self.pipeline.set_projection(ortho);
        self.pipeline.load_modelview(Mat4::IDENTITY);

        let result = f(self);

        self.gl.pop_matrix();
        self.gl.matrix_mode(MatrixMode::Projection);
        self.gl.pop_matrix();
        self.gl.matrix_mode(MatrixMode::ModelView);
        self.pipeline = saved;
        result
    }

    /// Set the raster position to the bottom-left pixel `(x, bottom)` of a
    /// pixel-space image (y down).
    ///
    /// A raster position on the bottom screen edge falls outside the
    /// viewport, so it is set one row up and nudged down with a bitmap move.
    pub fn window_raster_pos(&mut self, x: i32, bottom: i32) {
        if bottom >= self.height as i32 {
            self.gl.raster_pos(Vec2::new(x as f32, (self.height as i32 - 1) as f32));
            self.gl.bitmap_move(0.0, -1.0);
        } else {
            self.gl.raster_pos(Vec2::new(x as f32, bottom as f32));
        }
    }

    /// Scissor box for the pixel-space rectangle `rect` (y down)
    pub fn scissor_for(&self, rect: Rect) -> Rect {
        Rect::new(rect.x, (self.height as i32).saturating_sub(rect.bottom()), rect.width, rect.height)
    }

    /// Save the enable state of `caps`; the returned scope restores it when
    /// dropped.
    pub fn capability_scope(&mut self, caps: &[Capability]) -> CapabilityScope<'_> {
        let saved = caps.iter().map(|&cap| (cap, self.gl.is_enabled(cap))).collect();
        CapabilityScope { ctx: self, saved }
    }

    pub fn set_capability(&mut self, cap: Capability, enabled: bool) {
        if enabled {
            self.gl.enable(cap);
        } else {
            self.gl.disable(cap);
        }
    }
}

/// Restores a set of GL enable flags on drop. Derefs to the context.
pub(crate) struct CapabilityScope<'a> {
    ctx: &'a mut GlContext,
    saved: Vec<(Capability, bool)>,
}

impl Deref for CapabilityScope<'_> {
    type Target = GlContext;

    fn deref(&self) -> &GlContext {
        self.ctx
    }
}

impl DerefMut for CapabilityScope<'_> {
    fn deref_mut(&mut self) -> &mut GlContext {
        self.ctx
    }
}

impl Drop for CapabilityScope<'_> {
    fn drop(&mut self) {
        for &(cap, enabled) in self.saved.iter().rev() {
            if self.ctx.gl.is_enabled(cap) != enabled {
                self.ctx.set_capability(cap, enabled);
            }
        }
    }
}

/// Lock the shared context, mapping poisoning to a backend error
pub(crate) fn lock(context: &SharedGlContext) -> Result<MutexGuard<'_, GlContext>> {
    context
        .lock()
        .map_err(|_| Error::BackendError("OpenGL context lock poisoned".to_string()))
}

#[cfg(test)]
#[path = "opengl_context_tests.rs"]
mod tests;
