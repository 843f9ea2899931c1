/// GlApi - the fixed-function OpenGL command surface driven by the backend
///
/// One method per GL entry point the backend issues, with typed enums in
/// place of raw `GLenum`s. A platform layer implements it over a real GL
/// context; `RecordingGl` implements it headless.

use bitflags::bitflags;
use glam::{Mat4, Vec2, Vec3, Vec4};
use agl::agl::graphics::Rect;

/// Texture object name
pub type TextureId = u32;

/// Display list name
pub type ListId = u32;

/// Server-side capability toggled by `glEnable` / `glDisable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Lighting,
    /// `GL_LIGHT0 + index`
    Light(u32),
    DepthTest,
    Blend,
    Texture2D,
    ScissorTest,
    StencilTest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixMode {
    Projection,
    ModelView,
}

/// `glBegin` mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginMode {
    Points,
    Lines,
    LineLoop,
    Quads,
    Polygon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFunc {
    Always,
    Less,
    Equal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    One,
    Zero,
    SrcAlpha,
    OneMinusSrcAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
}

/// One `glLight` parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightParam {
    Diffuse(Vec4),
    /// Transformed by the current model-view when set
    Position(Vec4),
    SpotDirection(Vec3),
    SpotCutoff(f32),
}

bitflags! {
    /// Buffers reset by `glClear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearBuffers: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Client pixel data for `glDrawPixels`, rows bottom-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelData<'a> {
    Rgba(&'a [u8]),
    /// `GL_DEPTH_COMPONENT` / `GL_UNSIGNED_SHORT`
    Depth16(&'a [u16]),
}

/// Fixed-function OpenGL 1.x entry points used by the hardware backend.
///
/// Every call goes to the GL context current on the caller's thread.
pub trait GlApi: Send {
    // ===== LIMITS =====

    /// `GL_MAX_LIGHTS`
    fn max_lights(&self) -> u32;

    /// `GL_MAX_TEXTURE_SIZE`
    fn max_texture_size(&self) -> u32;

    // ===== STATE =====

    fn enable(&mut self, cap: Capability);

    fn disable(&mut self, cap: Capability);

    fn is_enabled(&self, cap: Capability) -> bool;

    fn viewport(&mut self, rect: Rect);

    /// Scissor box in window coordinates (origin bottom-left)
    fn scissor(&mut self, rect: Rect);

    fn color_mask(&mut self, write: bool);

    fn depth_func(&mut self, func: CompareFunc);

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);

    fn stencil_func(&mut self, func: CompareFunc, reference: i32, mask: u32);

    fn stencil_op(&mut self, fail: StencilOp, depth_fail: StencilOp, pass: StencilOp);

    fn clear(&mut self, buffers: ClearBuffers);

    // ===== MATRICES =====

    fn matrix_mode(&mut self, mode: MatrixMode);

    fn load_matrix(&mut self, m: Mat4);

    fn mult_matrix(&mut self, m: Mat4);

    fn push_matrix(&mut self);

    fn pop_matrix(&mut self);

    // ===== IMMEDIATE MODE =====

    fn begin(&mut self, mode: BeginMode);

    fn end(&mut self);

    fn vertex2(&mut self, v: Vec2);

    fn vertex3(&mut self, v: Vec3);

    fn tex_coord(&mut self, uv: Vec2);

    fn normal(&mut self, n: Vec3);

    fn color(&mut self, rgba: Vec4);

    fn light(&mut self, index: u32, param: LightParam);

    // ===== TEXTURES =====

    /// `glGenTextures`; `None` when the driver is out of texture memory
    fn gen_texture(&mut self) -> Option<TextureId>;

    fn bind_texture(&mut self, id: TextureId);

    /// Upload RGBA8888 texels to the bound texture
    fn tex_image_2d(&mut self, width: u32, height: u32, rgba: &[u8]);

    fn delete_texture(&mut self, id: TextureId);

    // ===== PIXELS =====

    /// Set the raster position from object coordinates
    fn raster_pos(&mut self, pos: Vec2);

    /// Move the raster position by a window-space offset (`glBitmap` with
    /// no image)
    fn bitmap_move(&mut self, dx: f32, dy: f32);

    fn draw_pixels(&mut self, width: u32, height: u32, data: PixelData<'_>);

    /// RGBA8888 pixels of `rect` in window coordinates, rows bottom-up
    fn read_pixels(&mut self, rect: Rect) -> Vec<u8>;

    // ===== DISPLAY LISTS =====

    /// `glGenLists(1)`; `None` when no list name is available
    fn gen_list(&mut self) -> Option<ListId>;

    fn new_list(&mut self, id: ListId);

    fn end_list(&mut self);

    fn call_list(&mut self, id: ListId);

    fn delete_list(&mut self, id: ListId);
}
