//! End-to-end frames through the Manager with the TinyGL backend
//!
//! The Manager is process-wide, so every test is #[serial].

use std::sync::{Arc, Mutex};
use agl::agl::{Error, Manager, Result};
use agl::agl::graphics::{Color, DisplaySurface, FontMetric, PixelBuffer, PixelFormat, Rect};
use agl::agl::render::{
    Bitmap2DType, DrawMode, LightType, MeshFace, PrimitiveSub, RendererConfig, Sector,
    ShadowPlaneGeometry, SubColor,
};
use agl::glam::Vec3;
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Surface keeping a copy of every presented frame
#[derive(Clone, Default)]
struct CaptureSurface {
    frames: Arc<Mutex<Vec<PixelBuffer>>>,
}

impl DisplaySurface for CaptureSurface {
    fn setup_screen(&mut self, width: u32, height: u32, _fullscreen: bool, _accelerated: bool) -> Result<PixelBuffer> {
        if width > 4096 || height > 4096 {
            return Err(Error::SurfaceUnavailable(format!("{}x{} not supported", width, height)));
        }
        Ok(PixelBuffer::new(PixelFormat::RGBA8888, (width * height) as usize))
    }

    fn present(&mut self, frame: Option<&PixelBuffer>) -> Result<()> {
        if let Some(frame) = frame {
            self.frames.lock().unwrap().push(frame.clone());
        }
        Ok(())
    }
}

struct BlockFont;

impl FontMetric for BlockFont {
    fn char_texture_rect(&self, _ch: char) -> Rect {
        Rect::new(0, 0, 4, 4)
    }

    fn char_quad_rect(&self, _ch: char) -> Rect {
        Rect::new(0, 0, 4, 4)
    }

    fn char_width(&self, _ch: char) -> i32 {
        5
    }

    fn height(&self) -> i32 {
        6
    }
}

fn start(width: u32, height: u32) -> CaptureSurface {
    Manager::shutdown();
    agl_renderer_tinygl::register().unwrap();
    let surface = CaptureSurface::default();
    Manager::init("TinyGL", Box::new(surface.clone()), RendererConfig::default()).unwrap();
    Manager::setup_screen(width, height, false, 32).unwrap();
    surface
}

fn floor_triangle_mesh() -> Box<dyn agl::agl::render::Mesh> {
    let mut mesh = Manager::create_mesh().unwrap();
    let data = mesh.data_mut();
    let mut face = MeshFace::default();
    face.set_normal(Vec3::Z);
    for p in [Vec3::new(-2.0, -2.0, 0.0), Vec3::new(2.0, -2.0, 0.0), Vec3::new(0.0, 2.0, 0.0)] {
        face.add_vertex(data.add_vertex(p));
    }
    data.add_face(face);
    mesh
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
#[serial]
fn test_init_selects_tinygl() {
    start(64, 48);
    let name = Manager::with_renderer(|r| Ok(r.name())).unwrap();
    assert_eq!(name, "TinyGL");
    Manager::shutdown();
}

#[test]
#[serial]
fn test_unknown_backend_is_fatal() {
    Manager::shutdown();
    agl_renderer_tinygl::register().unwrap();
    let result = Manager::init("Glide", Box::new(CaptureSurface::default()), RendererConfig::default());
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
    assert!(!Manager::is_initialized());
}

#[test]
#[serial]
fn test_oversized_screen_fails() {
    start(64, 48);
    assert!(matches!(Manager::setup_screen(8000, 8000, true, 32), Err(Error::SurfaceUnavailable(_))));
    Manager::shutdown();
}

#[test]
#[serial]
fn test_lit_frame_is_presented() {
    let surface = start(64, 48);
    Manager::setup_camera(60.0, 1.0, 100.0, 0.0).unwrap();
    Manager::position_camera(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO).unwrap();

    let mut light = Manager::with_renderer(|r| r.create_light(LightType::Directional)).unwrap();
    light.params_mut().direction = Vec3::new(0.0, 0.0, -1.0);
    light.enable().unwrap();
    Manager::with_renderer(|r| r.enable_lighting()).unwrap();

    Manager::target().unwrap().lock().unwrap().clear().unwrap();
    floor_triangle_mesh().draw(None).unwrap();
    Manager::flip_buffer().unwrap();

    let frames = surface.frames.lock().unwrap();
    assert_eq!(frames.len(), 1);
    let (r, g, b) = frames[0].get_rgb_at(24 * 64 + 32);
    // Ambient plus a full-strength diffuse term from straight above
    assert!(r > 200 && r == g && g == b, "center pixel {:?}", (r, g, b));
    assert_eq!(frames[0].get_rgb_at(0), (0, 0, 0));
    drop(frames);
    Manager::shutdown();
}

#[test]
#[serial]
fn test_pause_screen_dims_stored_frame() {
    start(16, 16);
    let mut overlay = Manager::with_renderer(|r| r.create_primitive(DrawMode::Quads)).unwrap();
    overlay
        .data_mut()
        .add_sub(PrimitiveSub::new(vec![0.0, 0.0, 16.0, 0.0, 16.0, 16.0, 0.0, 16.0], SubColor::Global(Color::rgb(90, 150, 60))).unwrap());
    overlay.draw(0.0, 0.0).unwrap();

    let target = Manager::target().unwrap();
    let mut target = target.lock().unwrap();
    target.store_content().unwrap();
    target.dim(0.5).unwrap();
    target.restore_content().unwrap();

    let shot = target.screenshot().unwrap();
    for i in 0..shot.len() {
        assert_eq!(shot.get_rgb_at(i), (50, 50, 50));
    }
    drop(target);
    Manager::shutdown();
}

#[test]
#[serial]
fn test_depth_bitmap_occludes_later_geometry() {
    start(64, 48);
    Manager::setup_camera(60.0, 1.0, 100.0, 0.0).unwrap();
    Manager::position_camera(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO).unwrap();

    // Nearest possible depth everywhere
    let nearest = PixelBuffer::from_rgba(&vec![[255, 255, 255, 255]; 64 * 48]);
    let depth = Manager::create_bitmap_2d(Bitmap2DType::Depth, &nearest, 64, 48).unwrap();
    depth.draw(0, 0).unwrap();

    floor_triangle_mesh().draw(None).unwrap();
    let shot = Manager::target().unwrap().lock().unwrap().screenshot().unwrap();
    assert!((0..shot.len()).all(|i| shot.get_rgb_at(i) == (0, 0, 0)));
    Manager::shutdown();
}

#[test]
#[serial]
fn test_shadow_plane_paints_only_its_sectors() {
    start(64, 48);
    Manager::setup_camera(60.0, 1.0, 100.0, 0.0).unwrap();
    Manager::position_camera(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO).unwrap();

    // Small floor patch; the shadow of a larger triangle is clipped to it
    let sector = Sector::new(vec![
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    ])
    .unwrap();
    let geometry = ShadowPlaneGeometry::new(vec![sector]).unwrap();
    let mut plane = Manager::with_renderer(|r| r.create_shadow_plane(geometry)).unwrap();

    plane.enable(Vec3::new(0.0, 0.0, 50.0), Color::rgb(20, 20, 20)).unwrap();
    floor_triangle_mesh().draw(None).unwrap();
    plane.disable().unwrap();

    let shot = Manager::target().unwrap().lock().unwrap().screenshot().unwrap();
    let shadowed = (0..shot.len()).filter(|&i| shot.get_rgb_at(i) == (20, 20, 20)).count();
    let lit = (0..shot.len()).filter(|&i| shot.get_rgb_at(i) == (255, 255, 255)).count();
    assert!(shadowed > 0);
    assert_eq!(lit, 0);
    Manager::shutdown();
}

#[test]
#[serial]
fn test_label_draws_glyph_blocks() {
    start(32, 16);
    let atlas = PixelBuffer::from_rgba(&vec![[255, 255, 255, 255]; 16]);
    let font = Manager::with_renderer(|r| r.create_font(Arc::new(BlockFont), &atlas, 4, 4)).unwrap();
    let mut label = Manager::with_renderer(|r| r.create_label(font.clone())).unwrap();
    label.layout_mut().set_text("ab");
    label.set_color(Color::rgb(0, 255, 0));
    label.draw(1, 1).unwrap();

    let shot = Manager::target().unwrap().lock().unwrap().screenshot().unwrap();
    let green = (0..shot.len()).filter(|&i| shot.get_rgb_at(i) == (0, 254, 0)).count();
    assert_eq!(green, 32);
    Manager::shutdown();
}
