/// AGL Manager - process-wide owner of the active renderer and target
///
/// The engine initializes the manager once with a backend name, sets up the
/// screen through it and reaches the renderer from its render loop. Backends
/// never call back into the manager except for logging.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;
use glam::Vec3;
use crate::error::{Result, Error};
use crate::graphics::{DisplaySurface, PixelBuffer};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use crate::renderer::{
    renderer_plugin_registry, Bitmap2D, Bitmap2DType, Mesh, Renderer, RendererConfig, Target, Texture,
};

// ===== INTERNAL STATE =====

/// Global manager state storage
static MANAGER_STATE: OnceLock<ManagerState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

struct ManagerState {
    renderer: RwLock<Option<Arc<Mutex<dyn Renderer>>>>,
    /// Target of the last `setup_screen`
    target: RwLock<Option<Arc<Mutex<dyn Target>>>>,
}

impl ManagerState {
    fn new() -> Self {
        Self {
            renderer: RwLock::new(None),
            target: RwLock::new(None),
        }
    }
}

// ===== PUBLIC API =====

/// Graphics manager singleton
///
/// # Example
///
/// ```no_run
/// use agl::agl::Manager;
/// use agl::agl::render::RendererConfig;
/// # fn surface() -> Box<dyn agl::agl::graphics::DisplaySurface> { unimplemented!() }
///
/// agl_renderer_tinygl::register()?;
/// Manager::init("TinyGL", surface(), RendererConfig::default())?;
/// Manager::setup_screen(640, 480, false, 16)?;
/// Manager::setup_camera(60.0, 0.1, 100.0, 0.0)?;
/// // ... draw ...
/// Manager::flip_buffer()?;
/// Manager::shutdown();
/// # Ok::<(), agl::agl::Error>(())
/// ```
pub struct Manager;

impl Manager {
    /// Log errors before returning them
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::agl_error!("agl::Manager", "Initialization failed: {}", msg);
            }
            Error::SurfaceUnavailable(msg) => {
                crate::agl_error!("agl::Manager", "Display surface unavailable: {}", msg);
            }
            _ => {
                crate::agl_error!("agl::Manager", "Manager error: {}", error);
            }
        }
        error
    }

    fn state() -> &'static ManagerState {
        MANAGER_STATE.get_or_init(ManagerState::new)
    }

    /// Create the renderer registered as `renderer_name` and make it current.
    ///
    /// An unknown name fails with `InitializationFailed`. A renderer that
    /// was already active is released together with its target.
    pub fn init(renderer_name: &str, surface: Box<dyn DisplaySurface>, config: RendererConfig) -> Result<()> {
        let renderer = {
            let registry = renderer_plugin_registry()
                .lock()
                .map_err(|_| Self::log_and_return_error(
                    Error::BackendError("Renderer registry lock poisoned".to_string())
                ))?;
            registry
                .create_renderer(renderer_name, surface, config)
                .map_err(Self::log_and_return_error)?
        };

        Self::install_renderer(renderer)?;
        crate::agl_info!("agl::Manager", "Renderer '{}' initialized", renderer_name);
        Ok(())
    }

    /// Make `renderer` current, releasing the previous renderer and target
    pub fn install_renderer(renderer: Arc<Mutex<dyn Renderer>>) -> Result<()> {
        let state = Self::state();

        // Target before renderer: targets reference renderer state
        Self::clear_target(state)?;

        let mut lock = state.renderer.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Renderer lock poisoned".to_string())
            ))?;
        if lock.is_some() {
            crate::agl_debug!("agl::Manager", "Replacing active renderer");
        }
        *lock = Some(renderer);
        Ok(())
    }

    fn clear_target(state: &ManagerState) -> Result<()> {
        let mut target = state.target.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Target lock poisoned".to_string())
            ))?;
        *target = None;
        Ok(())
    }

    /// Release the active target and renderer
    pub fn shutdown() {
        if let Some(state) = MANAGER_STATE.get() {
            if let Ok(mut target) = state.target.write() {
                *target = None;
            }
            if let Ok(mut renderer) = state.renderer.write() {
                if renderer.take().is_some() {
                    crate::agl_info!("agl::Manager", "Renderer shut down");
                }
            }
        }
    }

    pub fn is_initialized() -> bool {
        MANAGER_STATE
            .get()
            .and_then(|state| state.renderer.read().ok().map(|r| r.is_some()))
            .unwrap_or(false)
    }

    /// The active renderer
    ///
    /// # Errors
    ///
    /// `InitializationFailed` when no renderer has been initialized
    pub fn renderer() -> Result<Arc<Mutex<dyn Renderer>>> {
        let lock = Self::state().renderer.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Renderer lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Renderer not initialized. Call Manager::init() first.".to_string())
            ))
    }

    /// The target returned by the last `setup_screen`
    pub fn target() -> Result<Arc<Mutex<dyn Target>>> {
        let lock = Self::state().target.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Target lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Screen not set up. Call Manager::setup_screen() first.".to_string())
            ))
    }

    /// Run `f` on the locked active renderer
    pub fn with_renderer<T>(f: impl FnOnce(&mut dyn Renderer) -> Result<T>) -> Result<T> {
        let renderer = Self::renderer()?;
        let mut guard = renderer.lock()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Renderer mutex poisoned".to_string())
            ))?;
        f(&mut *guard)
    }

    // ===== SCREEN / CAMERA =====

    /// Set up the screen and make the new target current, releasing the old one.
    pub fn setup_screen(width: u32, height: u32, fullscreen: bool, bpp: u32) -> Result<Arc<Mutex<dyn Target>>> {
        let state = Self::state();
        Self::clear_target(state)?;

        let target = Self::with_renderer(|r| {
            r.setup_screen(width, height, fullscreen, bpp)
                .map_err(Self::log_and_return_error)
        })?;

        let mut lock = state.target.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Target lock poisoned".to_string())
            ))?;
        *lock = Some(target.clone());

        crate::agl_info!(
            "agl::Manager",
            "Screen set up: {}x{} ({}, {} bpp requested)",
            width, height, if fullscreen { "fullscreen" } else { "windowed" }, bpp
        );
        Ok(target)
    }

    pub fn setup_camera(fov: f32, near_clip: f32, far_clip: f32, roll: f32) -> Result<()> {
        Self::with_renderer(|r| r.setup_camera(fov, near_clip, far_clip, roll))
    }

    pub fn position_camera(eye: Vec3, look_at: Vec3) -> Result<()> {
        Self::with_renderer(|r| r.position_camera(eye, look_at))
    }

    pub fn flip_buffer() -> Result<()> {
        Self::with_renderer(|r| r.flip_buffer())
    }

    // ===== FACTORY SHORTCUTS =====

    pub fn create_bitmap_2d(kind: Bitmap2DType, buffer: &PixelBuffer, width: u32, height: u32) -> Result<Box<dyn Bitmap2D>> {
        Self::with_renderer(|r| r.create_bitmap_2d(kind, buffer, width, height))
    }

    pub fn create_texture(buffer: &PixelBuffer, width: u32, height: u32) -> Result<Box<dyn Texture>> {
        Self::with_renderer(|r| r.create_texture(buffer, width, height))
    }

    pub fn create_mesh() -> Result<Box<dyn Mesh>> {
        Self::with_renderer(|r| r.create_mesh())
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        Self::shutdown();
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (game console, file, ...)
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like agl_info!, agl_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
