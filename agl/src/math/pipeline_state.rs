/// Fixed-function pipeline state owned by a renderer.
///
/// Projection matrix, model-view stack, lighting toggle and viewport. The
/// software backend transforms through it directly; the hardware backend
/// mirrors every GL matrix call into it so the stack depth can be checked and
/// geometry projected on the CPU.

use glam::{Mat4, Vec3, Vec4};
use crate::graphics::Rect;
use super::camera::rotation;

/// Depth limit of the model-view stack (the GL minimum).
pub const MAX_MODELVIEW_DEPTH: usize = 32;

#[derive(Debug, Clone)]
pub struct PipelineState {
    projection: Mat4,
    /// Never empty; the last entry is the current matrix.
    modelview: Vec<Mat4>,
    lighting: bool,
    viewport: Rect,
}

impl PipelineState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            projection: Mat4::IDENTITY,
            modelview: vec![Mat4::IDENTITY],
            lighting: false,
            viewport: Rect::new(0, 0, width as i32, height as i32),
        }
    }

    // ===== PROJECTION =====

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Pixel-space orthographic projection, origin top-left, y down.
    pub fn pixel_ortho(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(
            0.0,
            self.viewport.width as f32,
            self.viewport.height as f32,
            0.0,
            0.0,
            1.0,
        )
    }

    // ===== MODEL-VIEW STACK =====

    pub fn modelview(&self) -> Mat4 {
        *self.modelview.last().unwrap_or(&Mat4::IDENTITY)
    }

    /// Replace the current model-view matrix.
    pub fn load_modelview(&mut self, m: Mat4) {
        if let Some(top) = self.modelview.last_mut() {
            *top = m;
        }
    }

    /// Post-multiply the current model-view matrix (`glMultMatrix`).
    pub fn mult_modelview(&mut self, m: Mat4) {
        if let Some(top) = self.modelview.last_mut() {
            *top *= m;
        }
    }

    /// Duplicate the current matrix. Returns `false` on overflow.
    pub fn push_modelview(&mut self) -> bool {
        if self.modelview.len() >= MAX_MODELVIEW_DEPTH {
            return false;
        }
        let top = self.modelview();
        self.modelview.push(top);
        true
    }

    /// Drop the current matrix. Returns `false` (and keeps the base entry)
    /// when there is no matching push.
    pub fn pop_modelview(&mut self) -> bool {
        if self.modelview.len() <= 1 {
            return false;
        }
        self.modelview.pop();
        true
    }

    /// Number of pushed entries above the base matrix
    pub fn modelview_depth(&self) -> usize {
        self.modelview.len() - 1
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.mult_modelview(Mat4::from_translation(Vec3::new(x, y, z)));
    }

    pub fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) {
        self.mult_modelview(rotation(degrees, Vec3::new(x, y, z)));
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.mult_modelview(Mat4::from_scale(Vec3::new(x, y, z)));
    }

    // ===== TOGGLES / VIEWPORT =====

    pub fn lighting(&self) -> bool {
        self.lighting
    }

    pub fn set_lighting(&mut self, enabled: bool) {
        self.lighting = enabled;
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    // ===== PROJECTION OF POINTS =====

    /// Projection * model-view
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.modelview()
    }

    /// Clip-space position of an object-space point.
    pub fn to_clip(&self, p: Vec3) -> Vec4 {
        self.mvp() * p.extend(1.0)
    }

    /// Window coordinates (x right, y down, z in [0, 1]) of a clip-space
    /// position, or `None` when it lies behind the eye.
    pub fn clip_to_window(&self, clip: Vec4) -> Option<Vec3> {
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let vp = self.viewport;
        Some(Vec3::new(
            vp.x as f32 + (ndc.x + 1.0) * 0.5 * vp.width as f32,
            vp.y as f32 + (1.0 - ndc.y) * 0.5 * vp.height as f32,
            (ndc.z + 1.0) * 0.5,
        ))
    }

    /// Window coordinates of an object-space point (`gluProject`).
    pub fn project(&self, p: Vec3) -> Option<Vec3> {
        self.clip_to_window(self.to_clip(p))
    }
}

#[cfg(test)]
#[path = "pipeline_state_tests.rs"]
mod tests;
