/// OpenGlRenderer - fixed-function OpenGL implementation of the Renderer trait

use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3};
use agl::agl::{Renderer, Result};
use agl::agl::graphics::{DisplaySurface, FontMetric, PixelBuffer, Rect};
use agl::agl::math::{camera_up_vector, frustum_from_fov, look_at, roll_matrix, rotation, PipelineState};
use agl::agl::render::{
    Bitmap2D, Bitmap2DType, Capabilities, DrawMode, Font, Label, Light, LightType, Mesh,
    Primitive, RendererConfig, ShadowPlane, ShadowPlaneGeometry, Target, Texture,
};
use crate::opengl_api::{Capability, CompareFunc, GlApi, MatrixMode};
use crate::opengl_bitmap::GlBitmap;
use crate::opengl_context::{lock, GlContext, SharedGlContext};
use crate::opengl_font::{GlFont, GlLabel};
use crate::opengl_light::GlLight;
use crate::opengl_mesh::GlMesh;
use crate::opengl_primitive::GlPrimitive;
use crate::opengl_shadow_plane::GlShadowPlane;
use crate::opengl_target::GlTarget;
use crate::opengl_texture::GlTexture;

/// Hardware renderer over the fixed-function pipeline.
///
/// Every GL call goes through the `GlApi` held by the shared context; the
/// display surface only creates the window and swaps buffers.
pub struct OpenGlRenderer {
    context: SharedGlContext,
    surface: Box<dyn DisplaySurface>,
    config: RendererConfig,
    max_lights: u32,
}

impl OpenGlRenderer {
    pub fn new(surface: Box<dyn DisplaySurface>, gl: Box<dyn GlApi>, config: RendererConfig) -> Self {
        let reported = gl.max_lights();
        let max_lights = config.max_lights.map_or(reported, |cap| cap.min(reported));
        agl::agl_info!(
            "agl::opengl::Renderer",
            "OpenGL renderer created ({} of {} GL lights, {} px tiles, debug: {})",
            max_lights, reported, config.bitmap_tile_size, config.debug
        );
        let context = GlContext::new(gl, config.bitmap_tile_size, max_lights);
        Self {
            context: Arc::new(Mutex::new(context)),
            surface,
            config,
            max_lights,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }
}

impl Renderer for OpenGlRenderer {
    fn name(&self) -> &'static str {
        "OpenGL"
    }

    fn pretty_name(&self) -> &'static str {
        "OpenGL Fixed-Function Renderer"
    }

    fn is_hardware_accelerated(&self) -> bool {
        true
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::TEXTURE_TILING | Capabilities::STENCIL_SHADOWS
    }

    fn max_lights(&self) -> u32 {
        self.max_lights
    }

    // ===== SCREEN / CAMERA =====

    fn setup_screen(&mut self, width: u32, height: u32, fullscreen: bool, bpp: u32) -> Result<Arc<Mutex<dyn Target>>> {
        let framebuffer = self.surface.setup_screen(width, height, fullscreen, true)?;
        let format = framebuffer.format();

        let mut ctx = lock(&self.context)?;
        ctx.width = width;
        ctx.height = height;
        ctx.pipeline = PipelineState::new(width, height);
        ctx.gl.viewport(Rect::new(0, 0, width as i32, height as i32));
        ctx.gl.matrix_mode(MatrixMode::Projection);
        ctx.gl.load_matrix(Mat4::IDENTITY);
        ctx.gl.matrix_mode(MatrixMode::ModelView);
        ctx.gl.load_matrix(Mat4::IDENTITY);
        ctx.gl.enable(Capability::DepthTest);
        ctx.gl.depth_func(CompareFunc::Less);
        let max_texture = ctx.gl.max_texture_size();
        drop(ctx);

        if self.config.bitmap_tile_size > max_texture {
            agl::agl_warn!(
                "agl::opengl::Renderer",
                "Tile size {} exceeds GL_MAX_TEXTURE_SIZE {}",
                self.config.bitmap_tile_size, max_texture
            );
        }
        agl::agl_info!(
            "agl::opengl::Renderer",
            "Screen {}x{} ({} bpp requested, {} bpp negotiated)",
            width, height, bpp, format.bytes_per_pixel as u32 * 8
        );
        let target: Arc<Mutex<dyn Target>> = Arc::new(Mutex::new(GlTarget::new(
            self.context.clone(),
            width,
            height,
            format,
        )));
        Ok(target)
    }

    fn setup_camera(&mut self, fov: f32, near_clip: f32, far_clip: f32, roll: f32) -> Result<()> {
        let mut ctx = lock(&self.context)?;
        ctx.load_projection(frustum_from_fov(fov, near_clip, far_clip));
        ctx.load_modelview(roll_matrix(roll));
        Ok(())
    }

    fn position_camera(&mut self, eye: Vec3, look_at_pos: Vec3) -> Result<()> {
        let up = camera_up_vector(eye, look_at_pos);
        lock(&self.context)?.mult_modelview(look_at(eye, look_at_pos, up));
        Ok(())
    }

    fn flip_buffer(&mut self) -> Result<()> {
        self.surface.present(None)
    }

    // ===== GLOBAL STATE =====

    fn enable_lighting(&mut self) -> Result<()> {
        let mut ctx = lock(&self.context)?;
        ctx.gl.enable(Capability::Lighting);
        ctx.pipeline.set_lighting(true);
        Ok(())
    }

    fn disable_lighting(&mut self) -> Result<()> {
        let mut ctx = lock(&self.context)?;
        ctx.gl.disable(Capability::Lighting);
        ctx.pipeline.set_lighting(false);
        Ok(())
    }

    fn push_matrix(&mut self) -> Result<()> {
        if !lock(&self.context)?.push_modelview() {
            agl::agl_bail!("agl::opengl::Renderer", "Model-view stack overflow");
        }
        Ok(())
    }

    fn pop_matrix(&mut self) -> Result<()> {
        let popped = lock(&self.context)?.pop_modelview();
        if !popped {
            agl::agl_error!("agl::opengl::Renderer", "pop_matrix without matching push_matrix");
            debug_assert!(popped, "pop_matrix without matching push_matrix");
        }
        Ok(())
    }

    fn translate(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        lock(&self.context)?.mult_modelview(Mat4::from_translation(Vec3::new(x, y, z)));
        Ok(())
    }

    fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) -> Result<()> {
        lock(&self.context)?.mult_modelview(rotation(degrees, Vec3::new(x, y, z)));
        Ok(())
    }

    fn scale(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        lock(&self.context)?.mult_modelview(Mat4::from_scale(Vec3::new(x, y, z)));
        Ok(())
    }

    // ===== FACTORIES =====

    fn create_bitmap_2d(
        &mut self,
        kind: Bitmap2DType,
        buffer: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn Bitmap2D>> {
        Ok(Box::new(GlBitmap::new(self.context.clone(), kind, buffer, width, height)?))
    }

    fn create_texture(&mut self, buffer: &PixelBuffer, width: u32, height: u32) -> Result<Box<dyn Texture>> {
        Ok(Box::new(GlTexture::new(self.context.clone(), buffer, width, height)?))
    }

    fn create_mesh(&mut self) -> Result<Box<dyn Mesh>> {
        Ok(Box::new(GlMesh::new(self.context.clone())))
    }

    fn create_light(&mut self, kind: LightType) -> Result<Box<dyn Light>> {
        Ok(Box::new(GlLight::new(self.context.clone(), kind)))
    }

    fn create_primitive(&mut self, mode: DrawMode) -> Result<Box<dyn Primitive>> {
        Ok(Box::new(GlPrimitive::new(self.context.clone(), mode)))
    }

    fn create_shadow_plane(&mut self, geometry: ShadowPlaneGeometry) -> Result<Box<dyn ShadowPlane>> {
        Ok(Box::new(GlShadowPlane::new(self.context.clone(), geometry)?))
    }

    fn create_font(
        &mut self,
        metric: Arc<dyn FontMetric>,
        atlas: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<Arc<dyn Font>> {
        Ok(Arc::new(GlFont::new(self.context.clone(), metric, atlas, width, height)?))
    }

    fn create_label(&mut self, font: Arc<dyn Font>) -> Result<Box<dyn Label>> {
        Ok(Box::new(GlLabel::new(self.context.clone(), font)?))
    }
}

#[cfg(test)]
#[path = "opengl_renderer_tests.rs"]
mod tests;
