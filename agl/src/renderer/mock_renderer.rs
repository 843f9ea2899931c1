/// Mock renderer for unit tests (no display, no rasterization)
///
/// Tracks pipeline state and light slots so the core contracts can be
/// tested without a backend crate.

use std::any::Any;
use std::sync::{Arc, Mutex};
use glam::Vec3;

use crate::error::{Error, Result};
use crate::graphics::{Color, DisplaySurface, FontMetric, PixelBuffer, PixelFormat};
use crate::math::{camera_up_vector, frustum_from_fov, look_at, roll_matrix, PipelineState};
use crate::renderer::*;
use crate::utils::SlotAllocator;

pub const MOCK_MAX_LIGHTS: u32 = 4;

// ============================================================================
// MockSurface
// ============================================================================

/// Display surface returning zeroed RGBA8888 framebuffers
#[derive(Default)]
pub struct MockSurface {
    /// Fail every `setup_screen`
    pub unavailable: bool,
    pub presented: Arc<Mutex<u32>>,
}

impl DisplaySurface for MockSurface {
    fn setup_screen(&mut self, width: u32, height: u32, _fullscreen: bool, _accelerated: bool) -> Result<PixelBuffer> {
        if self.unavailable {
            return Err(Error::SurfaceUnavailable(format!("{}x{} not available", width, height)));
        }
        Ok(PixelBuffer::new(PixelFormat::RGBA8888, (width * height) as usize))
    }

    fn present(&mut self, _frame: Option<&PixelBuffer>) -> Result<()> {
        *self.presented.lock().unwrap() += 1;
        Ok(())
    }
}

// ============================================================================
// MockTarget
// ============================================================================

/// Target over an in-memory framebuffer
pub struct MockTarget {
    pub width: u32,
    pub height: u32,
    pub framebuffer: PixelBuffer,
    stored: Option<PixelBuffer>,
}

impl MockTarget {
    pub fn new(framebuffer: PixelBuffer, width: u32, height: u32) -> Self {
        Self { width, height, framebuffer, stored: None }
    }
}

impl Target for MockTarget {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bpp(&self) -> u32 {
        self.framebuffer.format().bytes_per_pixel as u32 * 8
    }

    fn clear(&mut self) -> Result<()> {
        let len = self.framebuffer.len();
        self.framebuffer.clear(len);
        Ok(())
    }

    fn dim(&mut self, amount: f32) -> Result<()> {
        match self.stored.as_mut() {
            Some(stored) => dim_pixels(stored, amount),
            None => crate::agl_warn!("agl::mock::Target", "dim() without stored content"),
        }
        Ok(())
    }

    fn store_content(&mut self) -> Result<()> {
        self.stored = Some(self.framebuffer.clone());
        Ok(())
    }

    fn restore_content(&mut self) -> Result<()> {
        if let Some(stored) = &self.stored {
            let len = stored.len();
            self.framebuffer.copy_buffer(0, len, stored)?;
        }
        Ok(())
    }

    fn has_stored_content(&self) -> bool {
        self.stored.is_some()
    }

    fn screenshot(&self) -> Result<PixelBuffer> {
        self.framebuffer.converted(PixelFormat::RGBA8888)
    }
}

// ============================================================================
// Mock resources
// ============================================================================

pub struct MockState {
    pub pipeline: PipelineState,
    pub lights: SlotAllocator,
}

pub type SharedMockState = Arc<Mutex<MockState>>;

pub struct MockBitmap {
    kind: Bitmap2DType,
    width: u32,
    height: u32,
}

impl Bitmap2D for MockBitmap {
    fn kind(&self) -> Bitmap2DType {
        self.kind
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw(&self, _x: i32, _y: i32) -> Result<()> {
        Ok(())
    }
}

pub struct MockTexture {
    info: TextureInfo,
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockMesh {
    data: MeshData,
    state: SharedMockState,
}

impl Mesh for MockMesh {
    fn data(&self) -> &MeshData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut MeshData {
        &mut self.data
    }

    fn draw(&self, texture: Option<&dyn Texture>) -> Result<()> {
        if let Some(texture) = texture {
            texture.as_any().downcast_ref::<MockTexture>().ok_or_else(|| {
                Error::InvalidResource("texture from another renderer".to_string())
            })?;
        }
        self.data.drawable_faces().count();
        Ok(())
    }

    fn screen_bounding_box(&self) -> Result<Option<crate::graphics::Rect>> {
        let state = self.state.lock().unwrap();
        Ok(self.data.screen_bounding_box(&state.pipeline))
    }
}

pub struct MockLight {
    params: LightParams,
    slot: Option<u32>,
    state: SharedMockState,
}

impl Light for MockLight {
    fn params(&self) -> &LightParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut LightParams {
        &mut self.params
    }

    fn enable(&mut self) -> Result<()> {
        if self.slot.is_none() {
            self.slot = self.state.lock().unwrap().lights.alloc();
            if self.slot.is_none() {
                crate::agl_warn!("agl::mock::Light", "No free light slot");
            }
        }
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        if let Some(slot) = self.slot.take() {
            self.state.lock().unwrap().lights.free(slot);
        }
        Ok(())
    }

    fn slot(&self) -> Option<u32> {
        self.slot
    }
}

impl Drop for MockLight {
    fn drop(&mut self) {
        let _ = self.disable();
    }
}

pub struct MockPrimitive {
    data: PrimitiveData,
}

impl Primitive for MockPrimitive {
    fn data(&self) -> &PrimitiveData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut PrimitiveData {
        &mut self.data
    }

    fn draw(&self, _x: f32, _y: f32) -> Result<()> {
        Ok(())
    }
}

pub struct MockShadowPlane {
    geometry: ShadowPlaneGeometry,
    enabled: bool,
    state: SharedMockState,
}

impl ShadowPlane for MockShadowPlane {
    fn geometry(&self) -> &ShadowPlaneGeometry {
        &self.geometry
    }

    fn enable(&mut self, light_pos: Vec3, _color: Color) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.pipeline.push_modelview();
        state.pipeline.mult_modelview(self.geometry.projection(light_pos));
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        if self.enabled {
            self.state.lock().unwrap().pipeline.pop_modelview();
            self.enabled = false;
        }
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

pub struct MockFont {
    data: FontData,
}

impl Font for MockFont {
    fn data(&self) -> &FontData {
        &self.data
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub struct MockLabel {
    font: Arc<dyn Font>,
    layout: LabelLayout,
    color: Color,
}

impl Label for MockLabel {
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

    fn draw(&self, _x: i32, _y: i32) -> Result<()> {
        self.layout.layout(self.font.data().metric());
        Ok(())
    }
}

// ============================================================================
// MockRenderer
// ============================================================================

pub struct MockRenderer {
    surface: Box<dyn DisplaySurface>,
    pub state: SharedMockState,
    pub screens: u32,
}

impl MockRenderer {
    pub fn new(surface: Box<dyn DisplaySurface>) -> Self {
        Self {
            surface,
            state: Arc::new(Mutex::new(MockState {
                pipeline: PipelineState::new(0, 0),
                lights: SlotAllocator::new(MOCK_MAX_LIGHTS),
            })),
            screens: 0,
        }
    }

    pub fn modelview_depth(&self) -> usize {
        self.state.lock().unwrap().pipeline.modelview_depth()
    }
}

impl Renderer for MockRenderer {
    fn name(&self) -> &'static str {
        "Mock"
    }

    fn pretty_name(&self) -> &'static str {
        "Mock Renderer"
    }

    fn is_hardware_accelerated(&self) -> bool {
        false
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn max_lights(&self) -> u32 {
        MOCK_MAX_LIGHTS
    }

    fn setup_screen(&mut self, width: u32, height: u32, fullscreen: bool, _bpp: u32) -> Result<Arc<Mutex<dyn Target>>> {
        let framebuffer = self.surface.setup_screen(width, height, fullscreen, false)?;
        self.state.lock().unwrap().pipeline = PipelineState::new(width, height);
        self.screens += 1;
        Ok(Arc::new(Mutex::new(MockTarget::new(framebuffer, width, height))))
    }

    fn setup_camera(&mut self, fov: f32, near_clip: f32, far_clip: f32, roll: f32) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.pipeline.set_projection(frustum_from_fov(fov, near_clip, far_clip));
        state.pipeline.load_modelview(roll_matrix(roll));
        Ok(())
    }

    fn position_camera(&mut self, eye: Vec3, look_at_pos: Vec3) -> Result<()> {
        let up = camera_up_vector(eye, look_at_pos);
        self.state.lock().unwrap().pipeline.mult_modelview(look_at(eye, look_at_pos, up));
        Ok(())
    }

    fn flip_buffer(&mut self) -> Result<()> {
        self.surface.present(None)
    }

    fn enable_lighting(&mut self) -> Result<()> {
        self.state.lock().unwrap().pipeline.set_lighting(true);
        Ok(())
    }

    fn disable_lighting(&mut self) -> Result<()> {
        self.state.lock().unwrap().pipeline.set_lighting(false);
        Ok(())
    }

    fn push_matrix(&mut self) -> Result<()> {
        self.state.lock().unwrap().pipeline.push_modelview();
        Ok(())
    }

    fn pop_matrix(&mut self) -> Result<()> {
        let popped = self.state.lock().unwrap().pipeline.pop_modelview();
        debug_assert!(popped, "pop_matrix without matching push_matrix");
        Ok(())
    }

    fn translate(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        self.state.lock().unwrap().pipeline.translate(x, y, z);
        Ok(())
    }

    fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) -> Result<()> {
        self.state.lock().unwrap().pipeline.rotate(degrees, x, y, z);
        Ok(())
    }

    fn scale(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        self.state.lock().unwrap().pipeline.scale(x, y, z);
        Ok(())
    }

    fn create_bitmap_2d(&mut self, kind: Bitmap2DType, buffer: &PixelBuffer, width: u32, height: u32) -> Result<Box<dyn Bitmap2D>> {
        validate_bitmap_source(buffer, width, height)?;
        Ok(Box::new(MockBitmap { kind, width, height }))
    }

    fn create_texture(&mut self, buffer: &PixelBuffer, width: u32, height: u32) -> Result<Box<dyn Texture>> {
        validate_bitmap_source(buffer, width, height)?;
        Ok(Box::new(MockTexture {
            info: TextureInfo {
                width,
                height,
                format: buffer.format(),
                has_alpha: buffer.has_transparency(),
            },
        }))
    }

    fn create_mesh(&mut self) -> Result<Box<dyn Mesh>> {
        Ok(Box::new(MockMesh { data: MeshData::new(), state: self.state.clone() }))
    }

    fn create_light(&mut self, kind: LightType) -> Result<Box<dyn Light>> {
        Ok(Box::new(MockLight {
            params: LightParams::new(kind),
            slot: None,
            state: self.state.clone(),
        }))
    }

    fn create_primitive(&mut self, mode: DrawMode) -> Result<Box<dyn Primitive>> {
        Ok(Box::new(MockPrimitive { data: PrimitiveData::new(mode) }))
    }

    fn create_shadow_plane(&mut self, geometry: ShadowPlaneGeometry) -> Result<Box<dyn ShadowPlane>> {
        Ok(Box::new(MockShadowPlane { geometry, enabled: false, state: self.state.clone() }))
    }

    fn create_font(&mut self, metric: Arc<dyn FontMetric>, atlas: &PixelBuffer, width: u32, height: u32) -> Result<Arc<dyn Font>> {
        Ok(Arc::new(MockFont { data: FontData::new(metric, atlas, width, height)? }))
    }

    fn create_label(&mut self, font: Arc<dyn Font>) -> Result<Box<dyn Label>> {
        if font.clone().into_any().downcast::<MockFont>().is_err() {
            return Err(Error::InvalidResource("font from another renderer".to_string()));
        }
        Ok(Box::new(MockLabel { font, layout: LabelLayout::new(), color: Color::WHITE }))
    }
}

#[cfg(test)]
#[path = "mock_renderer_tests.rs"]
mod tests;
