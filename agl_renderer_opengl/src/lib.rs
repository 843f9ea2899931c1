/*!
# AGL - OpenGL Fixed-Function Renderer Backend

Hardware implementation of the AGL renderer contract over the OpenGL 1.x
fixed-function pipeline.

All GL traffic goes through the [`GlApi`] trait, so the backend is not tied
to a windowing crate: the application hands in an implementation bound to
its current context. With the `native-gl` feature, `NativeGl` drives a real
GL 2.1 compatibility context through bindings generated by `gl_generator`.
[`RecordingGl`] is a headless implementation that records every call; it
backs the tests and works without a GPU.

Images larger than a texture unit are split into square tiles, depth maps
are written with `glDrawPixels`, and shadow planes clip through the stencil
buffer.

The backend registers itself under the name `"OpenGL"`.
*/

mod opengl_api;
mod opengl_recording;
mod opengl_context;
mod opengl_texture;
mod opengl_bitmap;
mod opengl_mesh;
mod opengl_light;
mod opengl_primitive;
mod opengl_shadow_plane;
mod opengl_font;
mod opengl_target;
mod opengl_renderer;
#[cfg(feature = "native-gl")]
mod opengl_native;

#[cfg(test)]
mod test_support;

use std::sync::{Arc, Mutex};
use agl::agl::{Renderer, Result};
use agl::agl::graphics::DisplaySurface;
use agl::agl::render::{register_renderer_plugin, RendererConfig};

pub use opengl_api::{
    BeginMode, BlendFactor, Capability, ClearBuffers, CompareFunc, GlApi, LightParam, ListId,
    MatrixMode, PixelData, StencilOp, TextureId,
};
pub use opengl_recording::{GlCall, RecordingGl, RECORDING_MAX_LIGHTS, RECORDING_MAX_TEXTURE_SIZE};
pub use opengl_renderer::OpenGlRenderer;
pub use opengl_bitmap::GlBitmap;
pub use opengl_texture::GlTexture;
pub use opengl_mesh::GlMesh;
pub use opengl_light::GlLight;
pub use opengl_primitive::GlPrimitive;
pub use opengl_shadow_plane::GlShadowPlane;
pub use opengl_font::{GlFont, GlLabel};
pub use opengl_target::GlTarget;
#[cfg(feature = "native-gl")]
pub use opengl_native::NativeGl;

/// Plugin name of this backend
pub const PLUGIN_NAME: &str = "OpenGL";

/// Register the OpenGL backend with the plugin system
///
/// `api_factory` is called once per renderer and must return a `GlApi`
/// bound to the context the display surface makes current.
///
/// # Example
///
/// ```ignore
/// // With the `native-gl` feature, after the window made its context current
/// agl_renderer_opengl::register(|| {
///     Box::new(unsafe { NativeGl::load_with(|name| window.get_proc_address(name)) })
/// })?;
/// Manager::init("OpenGL", Box::new(my_window), RendererConfig::default())?;
/// ```
pub fn register<F>(api_factory: F) -> Result<()>
where
    F: Fn() -> Box<dyn GlApi> + Send + Sync + 'static,
{
    register_renderer_plugin(PLUGIN_NAME, move |surface: Box<dyn DisplaySurface>, config: RendererConfig| {
        let renderer: Arc<Mutex<dyn Renderer>> =
            Arc::new(Mutex::new(OpenGlRenderer::new(surface, api_factory(), config)));
        Ok(renderer)
    })
}
