/// TinyGlRenderer - software implementation of the Renderer trait

use std::sync::{Arc, Mutex};
use glam::Vec3;
use agl::agl::{Error, Renderer, Result};
use agl::agl::graphics::{DisplaySurface, FontMetric, PixelBuffer};
use agl::agl::math::{camera_up_vector, frustum_from_fov, look_at, roll_matrix};
use agl::agl::render::{
    Bitmap2D, Bitmap2DType, Capabilities, DrawMode, Font, Label, Light, LightType, Mesh,
    Primitive, RendererConfig, ShadowPlane, ShadowPlaneGeometry, Target, Texture,
};
use crate::tinygl_bitmap::TglBitmap;
use crate::tinygl_context::{lock, SharedContext, TglContext, TINYGL_MAX_LIGHTS};
use crate::tinygl_font::{TglFont, TglLabel};
use crate::tinygl_light::TglLight;
use crate::tinygl_mesh::TglMesh;
use crate::tinygl_primitive::TglPrimitive;
use crate::tinygl_shadow_plane::TglShadowPlane;
use crate::tinygl_target::TglTarget;
use crate::tinygl_texture::TglTexture;

/// Software rasterizer renderer.
///
/// Owns the shared context (framebuffer, z-buffer, pipeline state, light
/// slots); every resource it creates holds a handle to the same context.
pub struct TinyGlRenderer {
    context: SharedContext,
    config: RendererConfig,
    max_lights: u32,
}

impl TinyGlRenderer {
    pub fn new(surface: Box<dyn DisplaySurface>, config: RendererConfig) -> Self {
        let max_lights = config.max_lights.map_or(TINYGL_MAX_LIGHTS, |cap| cap.min(TINYGL_MAX_LIGHTS));
        agl::agl_info!(
            "agl::tinygl::Renderer",
            "TinyGL renderer created ({} light slots, debug: {})",
            max_lights, config.debug
        );
        Self {
            context: Arc::new(Mutex::new(TglContext::new(surface, max_lights))),
            config,
            max_lights,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }
}

impl Renderer for TinyGlRenderer {
    fn name(&self) -> &'static str {
        "TinyGL"
    }

    fn pretty_name(&self) -> &'static str {
        "Software 3D Renderer"
    }

    fn is_hardware_accelerated(&self) -> bool {
        false
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SOFTWARE_SHADOW_MASK
    }

    fn max_lights(&self) -> u32 {
        self.max_lights
    }

    // ===== SCREEN / CAMERA =====

    fn setup_screen(&mut self, width: u32, height: u32, fullscreen: bool, bpp: u32) -> Result<Arc<Mutex<dyn Target>>> {
        let mut ctx = lock(&self.context)?;
        let framebuffer = ctx.surface.setup_screen(width, height, fullscreen, false)?;
        let format = framebuffer.format();
        ctx.resize(framebuffer, width, height)?;
        drop(ctx);

        agl::agl_info!(
            "agl::tinygl::Renderer",
            "Screen {}x{} ({} bpp requested, {} bpp negotiated)",
            width, height, bpp, format.bytes_per_pixel as u32 * 8
        );
        let target: Arc<Mutex<dyn Target>> = Arc::new(Mutex::new(TglTarget::new(
            self.context.clone(),
            width,
            height,
            format,
        )));
        Ok(target)
    }

    fn setup_camera(&mut self, fov: f32, near_clip: f32, far_clip: f32, roll: f32) -> Result<()> {
        let mut ctx = lock(&self.context)?;
        ctx.pipeline.set_projection(frustum_from_fov(fov, near_clip, far_clip));
        ctx.pipeline.load_modelview(roll_matrix(roll));
        Ok(())
    }

    fn position_camera(&mut self, eye: Vec3, look_at_pos: Vec3) -> Result<()> {
        let up = camera_up_vector(eye, look_at_pos);
        lock(&self.context)?.pipeline.mult_modelview(look_at(eye, look_at_pos, up));
        Ok(())
    }

    fn flip_buffer(&mut self) -> Result<()> {
        let mut ctx = lock(&self.context)?;
        let TglContext { surface, framebuffer, .. } = &mut *ctx;
        surface.present(Some(framebuffer))
    }

    // ===== GLOBAL STATE =====

    fn enable_lighting(&mut self) -> Result<()> {
        lock(&self.context)?.pipeline.set_lighting(true);
        Ok(())
    }

    fn disable_lighting(&mut self) -> Result<()> {
        lock(&self.context)?.pipeline.set_lighting(false);
        Ok(())
    }

    fn push_matrix(&mut self) -> Result<()> {
        if !lock(&self.context)?.pipeline.push_modelview() {
            agl::agl_bail!("agl::tinygl::Renderer", "Model-view stack overflow");
        }
        Ok(())
    }

    fn pop_matrix(&mut self) -> Result<()> {
        let popped = lock(&self.context)?.pipeline.pop_modelview();
        if !popped {
            agl::agl_error!("agl::tinygl::Renderer", "pop_matrix without matching push_matrix");
            debug_assert!(popped, "pop_matrix without matching push_matrix");
        }
        Ok(())
    }

    fn translate(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        lock(&self.context)?.pipeline.translate(x, y, z);
        Ok(())
    }

    fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) -> Result<()> {
        lock(&self.context)?.pipeline.rotate(degrees, x, y, z);
        Ok(())
    }

    fn scale(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        lock(&self.context)?.pipeline.scale(x, y, z);
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
        Ok(Box::new(TglBitmap::new(self.context.clone(), kind, buffer, width, height)?))
    }

    fn create_texture(&mut self, buffer: &PixelBuffer, width: u32, height: u32) -> Result<Box<dyn Texture>> {
        Ok(Box::new(TglTexture::new(buffer, width, height)?))
    }

    fn create_mesh(&mut self) -> Result<Box<dyn Mesh>> {
        Ok(Box::new(TglMesh::new(self.context.clone())))
    }

    fn create_light(&mut self, kind: LightType) -> Result<Box<dyn Light>> {
        Ok(Box::new(TglLight::new(self.context.clone(), kind)))
    }

    fn create_primitive(&mut self, mode: DrawMode) -> Result<Box<dyn Primitive>> {
        Ok(Box::new(TglPrimitive::new(self.context.clone(), mode)))
    }

    fn create_shadow_plane(&mut self, geometry: ShadowPlaneGeometry) -> Result<Box<dyn ShadowPlane>> {
        Ok(Box::new(TglShadowPlane::new(self.context.clone(), geometry)?))
    }

    fn create_font(
        &mut self,
        metric: Arc<dyn FontMetric>,
        atlas: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<Arc<dyn Font>> {
        Ok(Arc::new(TglFont::new(metric, atlas, width, height)?))
    }

    fn create_label(&mut self, font: Arc<dyn Font>) -> Result<Box<dyn Label>> {
        if font.clone().into_any().downcast::<TglFont>().is_err() {
            return Err(Error::InvalidResource("font was not created by the TinyGL renderer".to_string()));
        }
        Ok(Box::new(TglLabel::new(self.context.clone(), font)))
    }
}

#[cfg(test)]
#[path = "tinygl_renderer_tests.rs"]
mod tests;
