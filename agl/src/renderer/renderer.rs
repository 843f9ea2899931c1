/// Renderer trait - pipeline-state owner and resource factory

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, OnceLock};
use bitflags::bitflags;
use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics::{DisplaySurface, FontMetric, PixelBuffer};
use crate::math::DEFAULT_TILE_SIZE;
use crate::renderer::{
    Bitmap2D, Bitmap2DType, Font, Label, Light, LightType, Mesh, Primitive, DrawMode,
    ShadowPlane, ShadowPlaneGeometry, Target, Texture,
};

// ============================================================================
// Configuration and capabilities
// ============================================================================

/// Renderer configuration handed to the plugin factory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Extra validation and logging
    pub debug: bool,
    /// Edge of the square texture tiles used for oversized bitmaps
    pub bitmap_tile_size: u32,
    /// Optional cap on the backend-reported light count
    pub max_lights: Option<u32>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            debug: cfg!(debug_assertions),
            bitmap_tile_size: DEFAULT_TILE_SIZE,
            max_lights: None,
        }
    }
}

bitflags! {
    /// Optional features a backend provides
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Depth bitmaps can be drawn through a texture shader
        const DEPTH_SHADER = 1 << 0;
        /// Oversized bitmaps are split into texture tiles
        const TEXTURE_TILING = 1 << 1;
        /// Shadow planes clip through the stencil buffer
        const STENCIL_SHADOWS = 1 << 2;
        /// Shadow planes clip through a per-pixel coverage mask
        const SOFTWARE_SHADOW_MASK = 1 << 3;
    }
}

// ============================================================================
// Renderer trait
// ============================================================================

/// Main renderer trait
///
/// Owns the global pipeline state (matrix stack, lighting, depth/blend state)
/// and creates every resource. Resources are owned by the caller and release
/// their backend handles when dropped.
pub trait Renderer: Send {
    // ===== IDENTITY =====

    /// Plugin name the renderer is registered under (e.g. "TinyGL")
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn pretty_name(&self) -> &'static str;

    fn is_hardware_accelerated(&self) -> bool;

    fn capabilities(&self) -> Capabilities;

    /// Number of lights that can be enabled at once
    fn max_lights(&self) -> u32;

    // ===== SCREEN / CAMERA =====

    /// Ask the display surface for a `width x height` screen and return the
    /// target bound to it. Surface failures are propagated.
    fn setup_screen(
        &mut self,
        width: u32,
        height: u32,
        fullscreen: bool,
        bpp: u32,
    ) -> Result<Arc<Mutex<dyn Target>>>;

    /// Symmetric 4:3 frustum from `fov` degrees, then a fresh model-view
    /// rolled by `roll` degrees about the view axis.
    fn setup_camera(&mut self, fov: f32, near_clip: f32, far_clip: f32, roll: f32) -> Result<()>;

    /// Multiply in a look-at view matrix (up `(0,0,1)`, or `(0,1,0)` when
    /// looking straight up or down).
    fn position_camera(&mut self, eye: Vec3, look_at: Vec3) -> Result<()>;

    /// Present the finished frame through the display surface
    fn flip_buffer(&mut self) -> Result<()>;

    // ===== GLOBAL STATE =====

    fn enable_lighting(&mut self) -> Result<()>;

    fn disable_lighting(&mut self) -> Result<()>;

    fn push_matrix(&mut self) -> Result<()>;

    /// Pop the model-view stack. Popping without a matching push asserts in
    /// debug builds and is logged and ignored in release builds.
    fn pop_matrix(&mut self) -> Result<()>;

    fn translate(&mut self, x: f32, y: f32, z: f32) -> Result<()>;

    /// Rotate `degrees` about the axis `(x, y, z)`
    fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) -> Result<()>;

    fn scale(&mut self, x: f32, y: f32, z: f32) -> Result<()>;

    // ===== FACTORIES =====

    fn create_bitmap_2d(
        &mut self,
        kind: Bitmap2DType,
        buffer: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn Bitmap2D>>;

    fn create_texture(&mut self, buffer: &PixelBuffer, width: u32, height: u32) -> Result<Box<dyn Texture>>;

    fn create_mesh(&mut self) -> Result<Box<dyn Mesh>>;

    fn create_light(&mut self, kind: LightType) -> Result<Box<dyn Light>>;

    fn create_primitive(&mut self, mode: DrawMode) -> Result<Box<dyn Primitive>>;

    /// Build a shadow plane; the mask or stencil list is computed here with
    /// the current matrices.
    fn create_shadow_plane(&mut self, geometry: ShadowPlaneGeometry) -> Result<Box<dyn ShadowPlane>>;

    fn create_font(
        &mut self,
        metric: Arc<dyn FontMetric>,
        atlas: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<Arc<dyn Font>>;

    /// A label drawn with `font`, which must come from this renderer
    fn create_label(&mut self, font: Arc<dyn Font>) -> Result<Box<dyn Label>>;
}

// ============================================================================
// Scoped model-view push/pop
// ============================================================================

/// Pushes the model-view matrix on creation and pops it when dropped.
///
/// Derefs to the renderer so the scoped transforms are issued through it.
pub struct MatrixScope<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
}

impl<'a, R: Renderer + ?Sized> MatrixScope<'a, R> {
    pub fn new(renderer: &'a mut R) -> Result<Self> {
        renderer.push_matrix()?;
        Ok(Self { renderer })
    }
}

impl<R: Renderer + ?Sized> Deref for MatrixScope<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> DerefMut for MatrixScope<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> Drop for MatrixScope<'_, R> {
    fn drop(&mut self) {
        if let Err(e) = self.renderer.pop_matrix() {
            crate::agl_error!("agl::MatrixScope", "Failed to pop matrix: {}", e);
        }
    }
}

/// Push the model-view matrix for the lifetime of the returned guard
pub fn matrix_scope<R: Renderer + ?Sized>(renderer: &mut R) -> Result<MatrixScope<'_, R>> {
    MatrixScope::new(renderer)
}

// ============================================================================
// Plugin system for registering renderer backends
// ============================================================================

/// Renderer plugin factory function type
pub type RendererPluginFactory = Box<
    dyn Fn(Box<dyn DisplaySurface>, RendererConfig) -> Result<Arc<Mutex<dyn Renderer>>> + Send + Sync,
>;

/// Plugin registry for renderer backends
pub struct RendererPluginRegistry {
    plugins: FxHashMap<&'static str, RendererPluginFactory>,
}

impl RendererPluginRegistry {
    fn new() -> Self {
        Self {
            plugins: FxHashMap::default(),
        }
    }

    /// Register a plugin, replacing any plugin with the same name
    ///
    /// # Arguments
    ///
    /// * `name` - Plugin name (e.g., "TinyGL")
    /// * `factory` - Factory function to create the renderer
    pub fn register_plugin<F>(&mut self, name: &'static str, factory: F)
    where
        F: Fn(Box<dyn DisplaySurface>, RendererConfig) -> Result<Arc<Mutex<dyn Renderer>>> + Send + Sync + 'static,
    {
        self.plugins.insert(name, Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Registered plugin names, sorted
    pub fn plugin_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.plugins.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Create a renderer using a registered plugin
    ///
    /// An unknown name is a configuration error (`InitializationFailed`).
    pub fn create_renderer(
        &self,
        plugin_name: &str,
        surface: Box<dyn DisplaySurface>,
        config: RendererConfig,
    ) -> Result<Arc<Mutex<dyn Renderer>>> {
        let factory = self.plugins.get(plugin_name).ok_or_else(|| {
            Error::InitializationFailed(format!("Renderer plugin '{}' not found", plugin_name))
        })?;
        factory(surface, config)
    }
}

static RENDERER_REGISTRY: OnceLock<Mutex<RendererPluginRegistry>> = OnceLock::new();

/// Get the global renderer plugin registry
pub fn renderer_plugin_registry() -> &'static Mutex<RendererPluginRegistry> {
    RENDERER_REGISTRY.get_or_init(|| Mutex::new(RendererPluginRegistry::new()))
}

/// Register a renderer plugin in the global registry
pub fn register_renderer_plugin<F>(name: &'static str, factory: F) -> Result<()>
where
    F: Fn(Box<dyn DisplaySurface>, RendererConfig) -> Result<Arc<Mutex<dyn Renderer>>> + Send + Sync + 'static,
{
    renderer_plugin_registry()
        .lock()
        .map_err(|_| Error::BackendError("Renderer registry lock poisoned".to_string()))?
        .register_plugin(name, factory);
    crate::agl_debug!("agl::RendererPluginRegistry", "Registered renderer plugin '{}'", name);
    Ok(())
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
