/// RecordingGl - headless `GlApi` that records every call
///
/// Keeps enough server state to answer queries the backend makes (enable
/// flags, matrix stacks, texture and list names) and models the color buffer
/// for raster-position pixel transfers, so targets can be stored, dimmed and
/// restored without a GPU. Geometry is recorded, not rasterized.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use glam::{Mat4, Vec2, Vec3, Vec4};
use rustc_hash::{FxHashMap, FxHashSet};
use agl::agl::graphics::Rect;
use crate::opengl_api::{
    BeginMode, BlendFactor, Capability, ClearBuffers, CompareFunc, GlApi, LightParam, ListId,
    MatrixMode, PixelData, StencilOp, TextureId,
};

/// GL limits reported when none are configured
pub const RECORDING_MAX_LIGHTS: u32 = 8;
pub const RECORDING_MAX_TEXTURE_SIZE: u32 = 1024;

/// One recorded GL call
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Enable(Capability),
    Disable(Capability),
    Viewport(Rect),
    Scissor(Rect),
    ColorMask(bool),
    DepthFunc(CompareFunc),
    BlendFunc(BlendFactor, BlendFactor),
    StencilFunc(CompareFunc, i32, u32),
    StencilOp(StencilOp, StencilOp, StencilOp),
    Clear(ClearBuffers),
    MatrixMode(MatrixMode),
    LoadMatrix(Mat4),
    MultMatrix(Mat4),
    PushMatrix,
    PopMatrix,
    Begin(BeginMode),
    End,
    Vertex2(Vec2),
    Vertex3(Vec3),
    TexCoord(Vec2),
    Normal(Vec3),
    Color(Vec4),
    Light(u32, LightParam),
    GenTexture(TextureId),
    BindTexture(TextureId),
    TexImage2D { width: u32, height: u32 },
    DeleteTexture(TextureId),
    RasterPos(Vec2),
    BitmapMove(f32, f32),
    DrawPixels { width: u32, height: u32, depth: bool },
    ReadPixels(Rect),
    GenList(ListId),
    NewList(ListId),
    EndList,
    CallList(ListId),
    DeleteList(ListId),
}

struct GlRecord {
    calls: Vec<GlCall>,
    enabled: FxHashSet<Capability>,
    max_lights: u32,
    max_texture_size: u32,
    texture_budget: Option<usize>,

    textures: FxHashMap<TextureId, (u32, u32)>,
    next_texture: TextureId,
    bound_texture: Option<TextureId>,
    lists: FxHashMap<ListId, Vec<GlCall>>,
    next_list: ListId,
    compiling: Option<(ListId, Vec<GlCall>)>,

    matrix_mode: MatrixMode,
    projection: Vec<Mat4>,
    modelview: Vec<Mat4>,
    viewport: Rect,
    scissor: Rect,
    color_mask: bool,

    /// Window coordinates, `None` when invalid
    raster: Option<Vec2>,
    width: u32,
    height: u32,
    /// RGBA8888, rows bottom-up
    color_buffer: Vec<u8>,
}

impl GlRecord {
    /// Record `call`; returns `false` while a display list is being
    /// compiled, in which case the call must not execute.
    fn record(&mut self, call: GlCall) -> bool {
        match self.compiling.as_mut() {
            Some((_, list)) => {
                list.push(call);
                false
            }
            None => {
                self.calls.push(call);
                true
            }
        }
    }

    fn stack(&mut self) -> &mut Vec<Mat4> {
        match self.matrix_mode {
            MatrixMode::Projection => &mut self.projection,
            MatrixMode::ModelView => &mut self.modelview,
        }
    }

    fn top(stack: &[Mat4]) -> Mat4 {
        stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    fn in_buffer(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn passes_scissor(&self, x: i32, y: i32) -> bool {
        !self.enabled.contains(&Capability::ScissorTest)
            || (x >= self.scissor.x && x < self.scissor.right() && y >= self.scissor.y && y < self.scissor.bottom())
    }
}

/// Recording `GlApi`. Clones share the same record, so a test can keep one
/// handle while the renderer owns another.
#[derive(Clone)]
pub struct RecordingGl {
    inner: Arc<Mutex<GlRecord>>,
}

impl RecordingGl {
    /// A context whose default framebuffer is `width x height`
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(GlRecord {
                calls: Vec::new(),
                enabled: FxHashSet::default(),
                max_lights: RECORDING_MAX_LIGHTS,
                max_texture_size: RECORDING_MAX_TEXTURE_SIZE,
                texture_budget: None,
                textures: FxHashMap::default(),
                next_texture: 1,
                bound_texture: None,
                lists: FxHashMap::default(),
                next_list: 1,
                compiling: None,
                matrix_mode: MatrixMode::ModelView,
                projection: vec![Mat4::IDENTITY],
                modelview: vec![Mat4::IDENTITY],
                viewport: Rect::new(0, 0, width as i32, height as i32),
                scissor: Rect::new(0, 0, width as i32, height as i32),
                color_mask: true,
                raster: None,
                width,
                height,
                color_buffer: vec![0; width as usize * height as usize * 4],
            })),
        }
    }

    pub fn with_max_lights(self, max_lights: u32) -> Self {
        self.lock().max_lights = max_lights;
        self
    }

    /// Fail `gen_texture` once `count` textures are alive
    pub fn with_texture_budget(self, count: usize) -> Self {
        self.lock().texture_budget = Some(count);
        self
    }

    fn lock(&self) -> MutexGuard<'_, GlRecord> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== INSPECTION =====

    pub fn calls(&self) -> Vec<GlCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn count_calls(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn live_textures(&self) -> usize {
        self.lock().textures.len()
    }

    /// Size of a live texture
    pub fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.lock().textures.get(&id).copied()
    }

    pub fn live_lists(&self) -> usize {
        self.lock().lists.len()
    }

    /// Calls compiled into a display list
    pub fn list_calls(&self, id: ListId) -> Option<Vec<GlCall>> {
        self.lock().lists.get(&id).cloned()
    }

    pub fn capability(&self, cap: Capability) -> bool {
        self.lock().enabled.contains(&cap)
    }

    pub fn projection(&self) -> Mat4 {
        GlRecord::top(&self.lock().projection)
    }

    pub fn modelview(&self) -> Mat4 {
        GlRecord::top(&self.lock().modelview)
    }

    /// Entries pushed above the base model-view matrix
    pub fn modelview_depth(&self) -> usize {
        self.lock().modelview.len() - 1
    }

    /// Color buffer pixel at `(x, y)`, y counted from the top
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let r = self.lock();
        if x >= r.width || y >= r.height {
            return [0; 4];
        }
        let i = (((r.height - 1 - y) * r.width + x) * 4) as usize;
        [r.color_buffer[i], r.color_buffer[i + 1], r.color_buffer[i + 2], r.color_buffer[i + 3]]
    }

    /// Overwrite one pixel, y counted from the top
    pub fn set_pixel(&self, x: u32, y: u32, rgba: [u8; 4]) {
        let mut r = self.lock();
        if x >= r.width || y >= r.height {
            return;
        }
        let i = (((r.height - 1 - y) * r.width + x) * 4) as usize;
        r.color_buffer[i..i + 4].copy_from_slice(&rgba);
    }

    /// Paint the whole color buffer
    pub fn fill(&self, rgba: [u8; 4]) {
        for px in self.lock().color_buffer.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }
}

impl GlApi for RecordingGl {
    fn max_lights(&self) -> u32 {
        self.lock().max_lights
    }

    fn max_texture_size(&self) -> u32 {
        self.lock().max_texture_size
    }

    fn enable(&mut self, cap: Capability) {
        let mut r = self.lock();
        if r.record(GlCall::Enable(cap)) {
            r.enabled.insert(cap);
        }
    }

    fn disable(&mut self, cap: Capability) {
        let mut r = self.lock();
        if r.record(GlCall::Disable(cap)) {
            r.enabled.remove(&cap);
        }
    }

    fn is_enabled(&self, cap: Capability) -> bool {
        self.lock().enabled.contains(&cap)
    }

    fn viewport(&mut self, rect: Rect) {
        let mut r = self.lock();
        if r.record(GlCall::Viewport(rect)) {
            r.viewport = rect;
        }
    }

    fn scissor(&mut self, rect: Rect) {
        let mut r = self.lock();
        if r.record(GlCall::Scissor(rect)) {
            r.scissor = rect;
        }
    }

    fn color_mask(&mut self, write: bool) {
        let mut r = self.lock();
        if r.record(GlCall::ColorMask(write)) {
            r.color_mask = write;
        }
    }

    fn depth_func(&mut self, func: CompareFunc) {
        self.lock().record(GlCall::DepthFunc(func));
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.lock().record(GlCall::BlendFunc(src, dst));
    }

    fn stencil_func(&mut self, func: CompareFunc, reference: i32, mask: u32) {
        self.lock().record(GlCall::StencilFunc(func, reference, mask));
    }

    fn stencil_op(&mut self, fail: StencilOp, depth_fail: StencilOp, pass: StencilOp) {
        self.lock().record(GlCall::StencilOp(fail, depth_fail, pass));
    }

    fn clear(&mut self, buffers: ClearBuffers) {
        let mut r = self.lock();
        if r.record(GlCall::Clear(buffers)) && buffers.contains(ClearBuffers::COLOR) {
            r.color_buffer.fill(0);
        }
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        let mut r = self.lock();
        if r.record(GlCall::MatrixMode(mode)) {
            r.matrix_mode = mode;
        }
    }

    fn load_matrix(&mut self, m: Mat4) {
        let mut r = self.lock();
        if r.record(GlCall::LoadMatrix(m)) {
            if let Some(top) = r.stack().last_mut() {
                *top = m;
            }
        }
    }

    fn mult_matrix(&mut self, m: Mat4) {
        let mut r = self.lock();
        if r.record(GlCall::MultMatrix(m)) {
            if let Some(top) = r.stack().last_mut() {
                *top *= m;
            }
        }
    }

    fn push_matrix(&mut self) {
        let mut r = self.lock();
        if r.record(GlCall::PushMatrix) {
            let stack = r.stack();
            let top = GlRecord::top(stack);
            stack.push(top);
        }
    }

    fn pop_matrix(&mut self) {
        let mut r = self.lock();
        if r.record(GlCall::PopMatrix) {
            // Underflow is a GL error and leaves the stack alone
            let stack = r.stack();
            if stack.len() > 1 {
                stack.pop();
            }
        }
    }

    fn begin(&mut self, mode: BeginMode) {
        self.lock().record(GlCall::Begin(mode));
    }

    fn end(&mut self) {
        self.lock().record(GlCall::End);
    }

    fn vertex2(&mut self, v: Vec2) {
        self.lock().record(GlCall::Vertex2(v));
    }

    fn vertex3(&mut self, v: Vec3) {
        self.lock().record(GlCall::Vertex3(v));
    }

    fn tex_coord(&mut self, uv: Vec2) {
        self.lock().record(GlCall::TexCoord(uv));
    }

    fn normal(&mut self, n: Vec3) {
        self.lock().record(GlCall::Normal(n));
    }

    fn color(&mut self, rgba: Vec4) {
        self.lock().record(GlCall::Color(rgba));
    }

    fn light(&mut self, index: u32, param: LightParam) {
        self.lock().record(GlCall::Light(index, param));
    }

    fn gen_texture(&mut self) -> Option<TextureId> {
        let mut r = self.lock();
        if r.texture_budget.is_some_and(|budget| r.textures.len() >= budget) {
            return None;
        }
        let id = r.next_texture;
        r.next_texture += 1;
        r.textures.insert(id, (0, 0));
        r.calls.push(GlCall::GenTexture(id));
        Some(id)
    }

    fn bind_texture(&mut self, id: TextureId) {
        let mut r = self.lock();
        if r.record(GlCall::BindTexture(id)) {
            r.bound_texture = Some(id);
        }
    }

    fn tex_image_2d(&mut self, width: u32, height: u32, _rgba: &[u8]) {
        let mut r = self.lock();
        if !r.record(GlCall::TexImage2D { width, height }) {
            return;
        }
        if let Some(id) = r.bound_texture {
            if let Some(size) = r.textures.get_mut(&id) {
                *size = (width, height);
            }
        }
    }

    fn delete_texture(&mut self, id: TextureId) {
        let mut r = self.lock();
        r.calls.push(GlCall::DeleteTexture(id));
        r.textures.remove(&id);
        if r.bound_texture == Some(id) {
            r.bound_texture = None;
        }
    }

    fn raster_pos(&mut self, pos: Vec2) {
        let mut r = self.lock();
        if !r.record(GlCall::RasterPos(pos)) {
            return;
        }
        let clip = GlRecord::top(&r.projection) * GlRecord::top(&r.modelview) * pos.extend(0.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        let inside = clip.w > 0.0 && ndc.x.abs() <= 1.0 + 1e-5 && ndc.y.abs() <= 1.0 + 1e-5;
        let vp = r.viewport;
        r.raster = inside.then(|| {
            Vec2::new(
                vp.x as f32 + (ndc.x + 1.0) * 0.5 * vp.width as f32,
                vp.y as f32 + (ndc.y + 1.0) * 0.5 * vp.height as f32,
            )
        });
    }

    fn bitmap_move(&mut self, dx: f32, dy: f32) {
        let mut r = self.lock();
        if r.record(GlCall::BitmapMove(dx, dy)) {
            if let Some(raster) = r.raster.as_mut() {
                *raster += Vec2::new(dx, dy);
            }
        }
    }

    fn draw_pixels(&mut self, width: u32, height: u32, data: PixelData<'_>) {
        let mut r = self.lock();
        let depth = matches!(data, PixelData::Depth16(_));
        if !r.record(GlCall::DrawPixels { width, height, depth }) {
            return;
        }
        let (PixelData::Rgba(rgba), Some(origin), true) = (data, r.raster, r.color_mask) else {
            return;
        };
        let (ox, oy) = (origin.x.round() as i32, origin.y.round() as i32);
        let buffer_width = r.width as usize;
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let (x, y) = (ox + col, oy + row);
                if !r.in_buffer(x, y) || !r.passes_scissor(x, y) {
                    continue;
                }
                let src = (row as usize * width as usize + col as usize) * 4;
                let dst = (y as usize * buffer_width + x as usize) * 4;
                if let Some(px) = rgba.get(src..src + 4) {
                    r.color_buffer[dst..dst + 4].copy_from_slice(px);
                }
            }
        }
    }

    fn read_pixels(&mut self, rect: Rect) -> Vec<u8> {
        let mut r = self.lock();
        r.calls.push(GlCall::ReadPixels(rect));
        let mut out = Vec::with_capacity(rect.width.max(0) as usize * rect.height.max(0) as usize * 4);
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if r.in_buffer(x, y) {
                    let i = (y as usize * r.width as usize + x as usize) * 4;
                    out.extend_from_slice(&r.color_buffer[i..i + 4]);
                } else {
                    out.extend_from_slice(&[0; 4]);
                }
            }
        }
        out
    }

    fn gen_list(&mut self) -> Option<ListId> {
        let mut r = self.lock();
        let id = r.next_list;
        r.next_list += 1;
        r.calls.push(GlCall::GenList(id));
        Some(id)
    }

    fn new_list(&mut self, id: ListId) {
        let mut r = self.lock();
        r.calls.push(GlCall::NewList(id));
        r.compiling = Some((id, Vec::new()));
    }

    fn end_list(&mut self) {
        let mut r = self.lock();
        r.calls.push(GlCall::EndList);
        if let Some((id, list)) = r.compiling.take() {
            r.lists.insert(id, list);
        }
    }

    fn call_list(&mut self, id: ListId) {
        self.lock().record(GlCall::CallList(id));
    }

    fn delete_list(&mut self, id: ListId) {
        let mut r = self.lock();
        r.calls.push(GlCall::DeleteList(id));
        r.lists.remove(&id);
    }
}

#[cfg(test)]
#[path = "opengl_recording_tests.rs"]
mod tests;
