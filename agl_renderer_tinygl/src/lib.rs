/*!
# AGL - TinyGL Software Renderer Backend

Software rasterizer implementation of the AGL renderer contract.

Everything is drawn on the CPU into the framebuffer handed out by the display
surface: triangles by edge functions with a 16-bit z-buffer, bitmaps and
labels by direct pixel copies, shadow planes through a per-pixel coverage
mask built when the plane is created.

The backend registers itself under the name `"TinyGL"`.
*/

mod tinygl_context;
mod tinygl_raster;
mod tinygl_texture;
mod tinygl_bitmap;
mod tinygl_mesh;
mod tinygl_light;
mod tinygl_primitive;
mod tinygl_shadow_plane;
mod tinygl_font;
mod tinygl_target;
mod tinygl_renderer;

#[cfg(test)]
mod test_support;

use std::sync::{Arc, Mutex};
use agl::agl::{Renderer, Result};
use agl::agl::graphics::DisplaySurface;
use agl::agl::render::{register_renderer_plugin, RendererConfig};

pub use tinygl_context::{AMBIENT, TINYGL_MAX_LIGHTS};
pub use tinygl_renderer::TinyGlRenderer;
pub use tinygl_bitmap::TglBitmap;
pub use tinygl_texture::TglTexture;
pub use tinygl_mesh::TglMesh;
pub use tinygl_light::TglLight;
pub use tinygl_primitive::TglPrimitive;
pub use tinygl_shadow_plane::TglShadowPlane;
pub use tinygl_font::{TglFont, TglLabel};
pub use tinygl_target::TglTarget;

/// Plugin name of this backend
pub const PLUGIN_NAME: &str = "TinyGL";

/// Register the TinyGL backend with the plugin system
///
/// # Example
///
/// ```ignore
/// agl_renderer_tinygl::register()?;
/// Manager::init("TinyGL", Box::new(my_surface), RendererConfig::default())?;
/// ```
pub fn register() -> Result<()> {
    register_renderer_plugin(PLUGIN_NAME, |surface: Box<dyn DisplaySurface>, config: RendererConfig| {
        let renderer: Arc<Mutex<dyn Renderer>> = Arc::new(Mutex::new(TinyGlRenderer::new(surface, config)));
        Ok(renderer)
    })
}
