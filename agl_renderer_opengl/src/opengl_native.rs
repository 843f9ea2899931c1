/// NativeGl - `GlApi` over a real OpenGL 2.1 compatibility context
///
/// Entry points come from compatibility-profile bindings generated at build
/// time by `gl_generator` and are resolved through the loader the windowing
/// layer provides. Creating and making the context current stays with the
/// `DisplaySurface` implementation.

use std::ffi::c_void;
use std::ptr;
use glam::{Mat4, Vec2, Vec3, Vec4};
use agl::agl::graphics::Rect;
use crate::opengl_api::{
    BeginMode, BlendFactor, Capability, ClearBuffers, CompareFunc, GlApi, LightParam, ListId,
    MatrixMode, PixelData, StencilOp, TextureId,
};

#[allow(clippy::all, dead_code, non_camel_case_types, non_snake_case, non_upper_case_globals, unused)]
mod bindings {
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

use bindings::types::{GLbitfield, GLenum, GLint, GLsizei, GLuint};

// ===== ENUM MAPPING =====

pub(crate) fn capability_enum(cap: Capability) -> GLenum {
    match cap {
        Capability::Lighting => bindings::LIGHTING,
        Capability::Light(index) => bindings::LIGHT0 + index,
        Capability::DepthTest => bindings::DEPTH_TEST,
        Capability::Blend => bindings::BLEND,
        Capability::Texture2D => bindings::TEXTURE_2D,
        Capability::ScissorTest => bindings::SCISSOR_TEST,
        Capability::StencilTest => bindings::STENCIL_TEST,
    }
}

pub(crate) fn begin_mode_enum(mode: BeginMode) -> GLenum {
    match mode {
        BeginMode::Points => bindings::POINTS,
        BeginMode::Lines => bindings::LINES,
        BeginMode::LineLoop => bindings::LINE_LOOP,
        BeginMode::Quads => bindings::QUADS,
        BeginMode::Polygon => bindings::POLYGON,
    }
}

pub(crate) fn compare_func_enum(func: CompareFunc) -> GLenum {
    match func {
        CompareFunc::Always => bindings::ALWAYS,
        CompareFunc::Less => bindings::LESS,
        CompareFunc::Equal => bindings::EQUAL,
    }
}

pub(crate) fn blend_factor_enum(factor: BlendFactor) -> GLenum {
    match factor {
        BlendFactor::One => bindings::ONE,
        BlendFactor::Zero => bindings::ZERO,
        BlendFactor::SrcAlpha => bindings::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => bindings::ONE_MINUS_SRC_ALPHA,
    }
}

pub(crate) fn stencil_op_enum(op: StencilOp) -> GLenum {
    match op {
        StencilOp::Keep => bindings::KEEP,
        StencilOp::Zero => bindings::ZERO,
        StencilOp::Replace => bindings::REPLACE,
    }
}

pub(crate) fn matrix_mode_enum(mode: MatrixMode) -> GLenum {
    match mode {
        MatrixMode::Projection => bindings::PROJECTION,
        MatrixMode::ModelView => bindings::MODELVIEW,
    }
}

pub(crate) fn clear_mask(buffers: ClearBuffers) -> GLbitfield {
    let mut mask = 0;
    if buffers.contains(ClearBuffers::COLOR) {
        mask |= bindings::COLOR_BUFFER_BIT;
    }
    if buffers.contains(ClearBuffers::DEPTH) {
        mask |= bindings::DEPTH_BUFFER_BIT;
    }
    if buffers.contains(ClearBuffers::STENCIL) {
        mask |= bindings::STENCIL_BUFFER_BIT;
    }
    mask
}

// ===== NATIVE API =====

/// Hardware `GlApi` bound to the thread's current GL context
pub struct NativeGl {
    gl: bindings::Gl,
}

// SAFETY: the table only holds function pointers resolved once at load
// time. Every call still goes to the context current on the calling thread,
// which the renderer's single-thread contract keeps fixed.
unsafe impl Send for NativeGl {}

impl NativeGl {
    /// Resolve every entry point through `loader` (e.g. `glXGetProcAddress`,
    /// `wglGetProcAddress`, or the windowing crate's `get_proc_address`).
    ///
    /// # Safety
    ///
    /// A GL 2.1 (or newer compatibility) context must be current on the
    /// thread that loads and later drives this API.
    pub unsafe fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        let gl = bindings::Gl::load_with(loader);
        // SAFETY: context current per this function's contract
        unsafe {
            gl.PixelStorei(bindings::UNPACK_ALIGNMENT, 1);
            gl.PixelStorei(bindings::PACK_ALIGNMENT, 1);
        }
        Self { gl }
    }

    fn get_integer(&self, pname: GLenum) -> u32 {
        let mut value: GLint = 0;
        // SAFETY: single-value query into a local
        unsafe { self.gl.GetIntegerv(pname, &mut value) };
        value.max(0) as u32
    }
}

// SAFETY (all blocks below): `NativeGl` is only constructed through
// `load_with`, whose contract makes a context current on this thread; slice
// arguments outlive the calls and match the sizes passed alongside them.
impl GlApi for NativeGl {
    fn max_lights(&self) -> u32 {
        self.get_integer(bindings::MAX_LIGHTS)
    }

    fn max_texture_size(&self) -> u32 {
        self.get_integer(bindings::MAX_TEXTURE_SIZE)
    }

    fn enable(&mut self, cap: Capability) {
        unsafe { self.gl.Enable(capability_enum(cap)) };
    }

    fn disable(&mut self, cap: Capability) {
        unsafe { self.gl.Disable(capability_enum(cap)) };
    }

    fn is_enabled(&self, cap: Capability) -> bool {
        unsafe { self.gl.IsEnabled(capability_enum(cap)) != 0 }
    }

    fn viewport(&mut self, rect: Rect) {
        unsafe { self.gl.Viewport(rect.x, rect.y, rect.width, rect.height) };
    }

    fn scissor(&mut self, rect: Rect) {
        unsafe { self.gl.Scissor(rect.x, rect.y, rect.width.max(0), rect.height.max(0)) };
    }

    fn color_mask(&mut self, write: bool) {
        let flag = u8::from(write);
        unsafe { self.gl.ColorMask(flag, flag, flag, flag) };
    }

    fn depth_func(&mut self, func: CompareFunc) {
        unsafe { self.gl.DepthFunc(compare_func_enum(func)) };
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        unsafe { self.gl.BlendFunc(blend_factor_enum(src), blend_factor_enum(dst)) };
    }

    fn stencil_func(&mut self, func: CompareFunc, reference: i32, mask: u32) {
        unsafe { self.gl.StencilFunc(compare_func_enum(func), reference, mask) };
    }

    fn stencil_op(&mut self, fail: StencilOp, depth_fail: StencilOp, pass: StencilOp) {
        unsafe {
            self.gl.StencilOp(stencil_op_enum(fail), stencil_op_enum(depth_fail), stencil_op_enum(pass))
        };
    }

    fn clear(&mut self, buffers: ClearBuffers) {
        unsafe { self.gl.Clear(clear_mask(buffers)) };
    }

    // ===== MATRICES =====

    fn matrix_mode(&mut self, mode: MatrixMode) {
        unsafe { self.gl.MatrixMode(matrix_mode_enum(mode)) };
    }

    fn load_matrix(&mut self, m: Mat4) {
        let cols = m.to_cols_array();
        unsafe { self.gl.LoadMatrixf(cols.as_ptr()) };
    }

    fn mult_matrix(&mut self, m: Mat4) {
        let cols = m.to_cols_array();
        unsafe { self.gl.MultMatrixf(cols.as_ptr()) };
    }

    fn push_matrix(&mut self) {
        unsafe { self.gl.PushMatrix() };
    }

    fn pop_matrix(&mut self) {
        unsafe { self.gl.PopMatrix() };
    }

    // ===== IMMEDIATE MODE =====

    fn begin(&mut self, mode: BeginMode) {
        unsafe { self.gl.Begin(begin_mode_enum(mode)) };
    }

    fn end(&mut self) {
        unsafe { self.gl.End() };
    }

    fn vertex2(&mut self, v: Vec2) {
        unsafe { self.gl.Vertex2f(v.x, v.y) };
    }

    fn vertex3(&mut self, v: Vec3) {
        unsafe { self.gl.Vertex3f(v.x, v.y, v.z) };
    }

    fn tex_coord(&mut self, uv: Vec2) {
        unsafe { self.gl.TexCoord2f(uv.x, uv.y) };
    }

    fn normal(&mut self, n: Vec3) {
        unsafe { self.gl.Normal3f(n.x, n.y, n.z) };
    }

    fn color(&mut self, rgba: Vec4) {
        unsafe { self.gl.Color4f(rgba.x, rgba.y, rgba.z, rgba.w) };
    }

    fn light(&mut self, index: u32, param: LightParam) {
        let light = bindings::LIGHT0 + index;
        unsafe {
            match param {
                LightParam::Diffuse(c) => self.gl.Lightfv(light, bindings::DIFFUSE, c.to_array().as_ptr()),
                LightParam::Position(p) => self.gl.Lightfv(light, bindings::POSITION, p.to_array().as_ptr()),
                LightParam::SpotDirection(d) => {
                    self.gl.Lightfv(light, bindings::SPOT_DIRECTION, d.to_array().as_ptr())
                }
                LightParam::SpotCutoff(angle) => self.gl.Lightf(light, bindings::SPOT_CUTOFF, angle),
            }
        }
    }

    // ===== TEXTURES =====

    fn gen_texture(&mut self) -> Option<TextureId> {
        let mut id: GLuint = 0;
        unsafe { self.gl.GenTextures(1, &mut id) };
        (id != 0).then_some(id)
    }

    fn bind_texture(&mut self, id: TextureId) {
        unsafe { self.gl.BindTexture(bindings::TEXTURE_2D, id) };
    }

    fn tex_image_2d(&mut self, width: u32, height: u32, rgba: &[u8]) {
        if rgba.len() < width as usize * height as usize * 4 {
            agl::agl_error!("agl::opengl::NativeGl", "Texel data shorter than {}x{}", width, height);
            return;
        }
        unsafe {
            // No mipmaps are uploaded
            self.gl.TexParameteri(bindings::TEXTURE_2D, bindings::TEXTURE_MIN_FILTER, bindings::LINEAR as GLint);
            self.gl.TexParameteri(bindings::TEXTURE_2D, bindings::TEXTURE_MAG_FILTER, bindings::LINEAR as GLint);
            self.gl.TexParameteri(bindings::TEXTURE_2D, bindings::TEXTURE_WRAP_S, bindings::CLAMP_TO_EDGE as GLint);
            self.gl.TexParameteri(bindings::TEXTURE_2D, bindings::TEXTURE_WRAP_T, bindings::CLAMP_TO_EDGE as GLint);
            self.gl.TexImage2D(
                bindings::TEXTURE_2D,
                0,
                bindings::RGBA as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                bindings::RGBA,
                bindings::UNSIGNED_BYTE,
                rgba.as_ptr().cast(),
            );
        }
    }

    fn delete_texture(&mut self, id: TextureId) {
        unsafe { self.gl.DeleteTextures(1, &id) };
    }

    // ===== PIXELS =====

    fn raster_pos(&mut self, pos: Vec2) {
        unsafe { self.gl.RasterPos2f(pos.x, pos.y) };
    }

    fn bitmap_move(&mut self, dx: f32, dy: f32) {
        unsafe { self.gl.Bitmap(0, 0, 0.0, 0.0, dx, dy, ptr::null()) };
    }

    fn draw_pixels(&mut self, width: u32, height: u32, data: PixelData<'_>) {
        let count = width as usize * height as usize;
        let (format, kind, pixels, len): (GLenum, GLenum, *const c_void, usize) = match data {
            PixelData::Rgba(rgba) => (bindings::RGBA, bindings::UNSIGNED_BYTE, rgba.as_ptr().cast(), rgba.len() / 4),
            PixelData::Depth16(depth) => {
                (bindings::DEPTH_COMPONENT, bindings::UNSIGNED_SHORT, depth.as_ptr().cast(), depth.len())
            }
        };
        if len < count {
            agl::agl_error!("agl::opengl::NativeGl", "Pixel data shorter than {}x{}", width, height);
            return;
        }
        unsafe { self.gl.DrawPixels(width as GLsizei, height as GLsizei, format, kind, pixels) };
    }

    fn read_pixels(&mut self, rect: Rect) -> Vec<u8> {
        let (width, height) = (rect.width.max(0), rect.height.max(0));
        let mut out = vec![0u8; width as usize * height as usize * 4];
        if !out.is_empty() {
            unsafe {
                self.gl.ReadPixels(
                    rect.x,
                    rect.y,
                    width,
                    height,
                    bindings::RGBA,
                    bindings::UNSIGNED_BYTE,
                    out.as_mut_ptr().cast(),
                )
            };
        }
        out
    }

    // ===== DISPLAY LISTS =====

    fn gen_list(&mut self) -> Option<ListId> {
        let id = unsafe { self.gl.GenLists(1) };
        (id != 0).then_some(id)
    }

    fn new_list(&mut self, id: ListId) {
        unsafe { self.gl.NewList(id, bindings::COMPILE) };
    }

    fn end_list(&mut self) {
        unsafe { self.gl.EndList() };
    }

    fn call_list(&mut self, id: ListId) {
        unsafe { self.gl.CallList(id) };
    }

    fn delete_list(&mut self, id: ListId) {
        unsafe { self.gl.DeleteLists(id, 1) };
    }
}

#[cfg(test)]
#[path = "opengl_native_tests.rs"]
mod tests;
