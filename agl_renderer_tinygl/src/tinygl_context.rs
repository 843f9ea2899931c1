/// Shared software pipeline state
///
/// Every TinyGL resource holds the renderer's context and locks it for the
/// duration of a draw, the way hardware resources share one GL context.

use std::sync::{Arc, Mutex, MutexGuard};
use glam::{Mat3, Vec3, Vec4};
use agl::agl::{Error, Result};
use agl::agl::graphics::{Color, DisplaySurface, PixelBuffer, PixelFormat};
use agl::agl::math::PipelineState;
use agl::agl::render::LightParams;
use agl::agl::utils::SlotAllocator;

/// Light slots of the software pipeline
pub const TINYGL_MAX_LIGHTS: u32 = 16;

/// Scene ambient term added to every lit vertex
pub const AMBIENT: f32 = 0.2;

/// A light bound to a slot, already in eye space
#[derive(Debug, Clone, Copy)]
pub(crate) struct EyeLight {
    /// w = 0 for directional lights
    pub position: Vec4,
    pub spot_direction: Vec3,
    pub spot_cutoff: f32,
    pub diffuse: Vec4,
}

impl EyeLight {
    /// Capture `params` under the current model-view, as a fixed-function
    /// pipeline does when light parameters are set.
    pub fn new(params: &LightParams, pipeline: &PipelineState) -> Self {
        let modelview = pipeline.modelview();
        Self {
            position: modelview * params.homogeneous_position(),
            spot_direction: Mat3::from_mat4(modelview) * params.spot_direction(),
            spot_cutoff: params.spot_cutoff(),
            diffuse: params.diffuse(),
        }
    }
}

/// Shadow overlay installed by an enabled shadow plane
#[derive(Debug, Clone)]
pub(crate) struct ShadowOverlay {
    pub mask: Arc<Vec<bool>>,
    pub color: Color,
}

pub(crate) struct TglContext {
    pub surface: Box<dyn DisplaySurface>,
    pub framebuffer: PixelBuffer,
    /// Larger is nearer; cleared to 0
    pub depth: Vec<u16>,
    pub width: u32,
    pub height: u32,
    pub pipeline: PipelineState,
    pub depth_test: bool,
    pub lights: SlotAllocator,
    pub light_slots: Vec<Option<EyeLight>>,
    pub shadow: Option<ShadowOverlay>,
}

pub(crate) type SharedContext = Arc<Mutex<TglContext>>;

impl TglContext {
    pub fn new(surface: Box<dyn DisplaySurface>, max_lights: u32) -> Self {
        Self {
            surface,
            framebuffer: PixelBuffer::new(PixelFormat::RGBA8888, 0),
            depth: Vec::new(),
            width: 0,
            height: 0,
            pipeline: PipelineState::new(0, 0),
            depth_test: true,
            lights: SlotAllocator::new(max_lights),
            light_slots: vec![None; max_lights as usize],
            shadow: None,
        }
    }

    /// Adopt a new framebuffer of `width x height`
    pub fn resize(&mut self, framebuffer: PixelBuffer, width: u32, height: u32) -> Result<()> {
        let needed = width as usize * height as usize;
        if framebuffer.len() < needed {
            return Err(Error::SurfaceUnavailable(format!(
                "surface returned {} pixels for a {}x{} screen",
                framebuffer.len(), width, height
            )));
        }
        self.framebuffer = framebuffer;
        self.depth = vec![0; needed];
        self.width = width;
        self.height = height;
        let lighting = self.pipeline.lighting();
        self.pipeline = PipelineState::new(width, height);
        self.pipeline.set_lighting(lighting);
        self.shadow = None;
        Ok(())
    }

    pub fn pixel_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }

    /// Bound lights in slot order
    pub fn active_lights(&self) -> impl Iterator<Item = &EyeLight> {
        self.light_slots.iter().flatten()
    }
}

/// Lock the shared context, mapping poisoning to a backend error
pub(crate) fn lock(context: &SharedContext) -> Result<MutexGuard<'_, TglContext>> {
    context
        .lock()
        .map_err(|_| Error::BackendError("TinyGL context lock poisoned".to_string()))
}
