/// Scanline-free software rasterizer
///
/// Triangles are filled with edge functions over their screen bounding box,
/// lines with Bresenham. Colors and texture coordinates are interpolated
/// perspective-correct; depth is linear in window space.

use glam::{Vec2, Vec3, Vec4};
use agl::agl::graphics::PixelBuffer;
use agl::agl::math::PipelineState;
use crate::tinygl_context::{ShadowOverlay, TglContext};
use crate::tinygl_texture::TextureImage;

/// Vertex after the model-view-projection transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ClipVertex {
    pub clip: Vec4,
    pub color: Vec4,
    pub uv: Vec2,
}

impl ClipVertex {
    fn lerp(&self, other: &ClipVertex, t: f32) -> ClipVertex {
        ClipVertex {
            clip: self.clip.lerp(other.clip, t),
            color: self.color.lerp(other.color, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

/// Vertex in window coordinates, ready for rasterization
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScreenVertex {
    /// x right, y down, z in [0, 1]
    pub pos: Vec3,
    pub inv_w: f32,
    pub color: Vec4,
    pub uv: Vec2,
}

/// Clip a polygon against the near plane (`z >= -w`).
pub(crate) fn clip_near(polygon: &[ClipVertex]) -> Vec<ClipVertex> {
    let distance = |v: &ClipVertex| v.clip.z + v.clip.w;
    let mut out = Vec::with_capacity(polygon.len() + 2);
    for (i, cur) in polygon.iter().enumerate() {
        let next = &polygon[(i + 1) % polygon.len()];
        let (dc, dn) = (distance(cur), distance(next));
        if dc >= 0.0 {
            out.push(*cur);
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            out.push(cur.lerp(next, dc / (dc - dn)));
        }
    }
    out
}

pub(crate) fn to_screen(v: &ClipVertex, pipeline: &PipelineState) -> Option<ScreenVertex> {
    let pos = pipeline.clip_to_window(v.clip)?;
    Some(ScreenVertex {
        pos,
        inv_w: 1.0 / v.clip.w,
        color: v.color,
        uv: v.uv,
    })
}

/// Depth buffer value of a window-space depth; nearer is larger.
pub(crate) fn depth_value(z: f32) -> u16 {
    ((1.0 - z.clamp(0.0, 1.0)) * 65535.0).round() as u16
}

/// Call `f(x, y, barycentrics)` for every pixel center inside the triangle.
///
/// Both windings are filled. Pixels outside `width x height` are skipped.
pub(crate) fn for_each_covered(
    v0: Vec2,
    v1: Vec2,
    v2: Vec2,
    width: u32,
    height: u32,
    mut f: impl FnMut(i32, i32, [f32; 3]),
) {
    let edge = |a: Vec2, b: Vec2, p: Vec2| (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);

    let area = edge(v0, v1, v2);
    if area.abs() < f32::EPSILON || width == 0 || height == 0 {
        return;
    }

    let min = v0.min(v1).min(v2);
    let max = v0.max(v1).max(v2);
    let min_x = (min.x.floor() as i32).max(0);
    let min_y = (min.y.floor() as i32).max(0);
    let max_x = (max.x.ceil() as i32).min(width as i32 - 1);
    let max_y = (max.y.ceil() as i32).min(height as i32 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let b0 = edge(v1, v2, p) / area;
            let b1 = edge(v2, v0, p) / area;
            let b2 = edge(v0, v1, p) / area;
            if b0 >= 0.0 && b1 >= 0.0 && b2 >= 0.0 {
                f(x, y, [b0, b1, b2]);
            }
        }
    }
}

/// Fragment destination borrowed out of the context
pub(crate) struct FragmentSink<'a> {
    framebuffer: &'a mut PixelBuffer,
    depth: &'a mut [u16],
    width: u32,
    height: u32,
    depth_test: bool,
    shadow: Option<&'a ShadowOverlay>,
}

impl<'a> FragmentSink<'a> {
    pub fn new(ctx: &'a mut TglContext) -> Self {
        let TglContext { framebuffer, depth, width, height, depth_test, shadow, .. } = ctx;
        Self {
            framebuffer,
            depth,
            width: *width,
            height: *height,
            depth_test: *depth_test,
            shadow: shadow.as_ref(),
        }
    }

    /// Depth-test and write one fragment. Fragments with zero alpha are dropped.
    /// While a shadow overlay is active only masked pixels are written, in
    /// the shadow color.
    fn write(&mut self, x: i32, y: i32, z: f32, color: Vec4) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height || color.w <= 0.0 {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;

        let color = match self.shadow {
            Some(overlay) if !overlay.mask.get(index).copied().unwrap_or(false) => return,
            Some(overlay) => {
                let c = overlay.color;
                Vec4::new(c.r as f32, c.g as f32, c.b as f32, 255.0) / 255.0
            }
            None => color,
        };

        if self.depth_test {
            let d = depth_value(z);
            if d < self.depth[index] {
                return;
            }
            self.depth[index] = d;
        }

        let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
        self.framebuffer.set_pixel_at(index, c.x as u8, c.y as u8, c.z as u8);
    }
}

/// Fill a triangle with Gouraud color, optionally modulated by a texture.
pub(crate) fn fill_triangle(sink: &mut FragmentSink<'_>, v: [ScreenVertex; 3], texture: Option<&TextureImage>) {
    let (width, height) = (sink.width, sink.height);
    for_each_covered(v[0].pos.truncate(), v[1].pos.truncate(), v[2].pos.truncate(), width, height, |x, y, b| {
        let z = v[0].pos.z * b[0] + v[1].pos.z * b[1] + v[2].pos.z * b[2];

        // Perspective-correct weights
        let w = [b[0] * v[0].inv_w, b[1] * v[1].inv_w, b[2] * v[2].inv_w];
        let sum = w[0] + w[1] + w[2];
        let w = if sum.abs() > f32::EPSILON { [w[0] / sum, w[1] / sum, w[2] / sum] } else { b };

        let mut color = v[0].color * w[0] + v[1].color * w[1] + v[2].color * w[2];
        if let Some(texture) = texture {
            let uv = v[0].uv * w[0] + v[1].uv * w[1] + v[2].uv * w[2];
            color *= texture.sample(uv);
        }
        sink.write(x, y, z, color);
    });
}

/// Bresenham line with interpolated color and depth.
pub(crate) fn draw_line(sink: &mut FragmentSink<'_>, a: ScreenVertex, b: ScreenVertex) {
    let (mut x, mut y) = (a.pos.x.floor() as i32, a.pos.y.floor() as i32);
    let (x1, y1) = (b.pos.x.floor() as i32, b.pos.y.floor() as i32);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let steps = dx.max(-dy).max(1) as f32;
    let mut err = dx + dy;
    let mut step = 0.0;

    loop {
        let t = step / steps;
        sink.write(x, y, a.pos.z + (b.pos.z - a.pos.z) * t, a.color.lerp(b.color, t));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        step += 1.0;
    }
}

pub(crate) fn draw_point(sink: &mut FragmentSink<'_>, v: ScreenVertex) {
    sink.write(v.pos.x.floor() as i32, v.pos.y.floor() as i32, v.pos.z, v.color);
}

#[cfg(test)]
#[path = "tinygl_raster_tests.rs"]
mod tests;
