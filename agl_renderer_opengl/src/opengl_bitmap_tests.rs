use super::*;
use agl::agl::Error;
use crate::opengl_recording::GlCall;
use crate::test_support::{batches, context, context_with_tiles};

fn opaque(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_rgba(&vec![[10, 20, 30, 255]; (width * height) as usize])
}

fn bitmap(ctx: &SharedGlContext, kind: Bitmap2DType, buffer: &PixelBuffer, w: u32, h: u32) -> GlBitmap {
    GlBitmap::new(ctx.clone(), kind, buffer, w, h).unwrap()
}

// ============================================================================
// Tiling
// ============================================================================

#[test]
fn test_image_split_into_full_size_tiles() {
    let (ctx, gl) = context(640, 480);
    let image = bitmap(&ctx, Bitmap2DType::Image, &opaque(600, 300), 600, 300);
    assert_eq!(image.tile_count(), 6);
    assert_eq!(gl.live_textures(), 6);
    assert_eq!(gl.count_calls(|c| *c == GlCall::TexImage2D { width: 256, height: 256 }), 6);
}

#[test]
fn test_tile_texels_pad_overhang() {
    let rgba = PixelBuffer::from_rgba(&[[1, 1, 1, 1], [2, 2, 2, 2], [3, 3, 3, 3], [4, 4, 4, 4], [5, 5, 5, 5], [6, 6, 6, 6]]);
    let tile = TileGrid::new(3, 2, 2).tiles().nth(1).unwrap();
    let texels = tile_texels(&rgba, 3, &tile, 2);
    assert_eq!(texels, vec![3, 3, 3, 3, 0, 0, 0, 0, 6, 6, 6, 6, 0, 0, 0, 0]);
}

#[test]
fn test_draw_emits_one_quad_per_tile() {
    let (ctx, gl) = context(640, 480);
    let image = bitmap(&ctx, Bitmap2DType::Image, &opaque(600, 300), 600, 300);
    gl.clear_calls();
    image.draw(10, 20).unwrap();

    let calls = gl.calls();
    let quads = batches(&calls);
    assert_eq!(quads.len(), 6);
    assert_eq!(quads[0][0], GlCall::Vertex2(Vec2::new(10.0, 20.0)));
    assert_eq!(quads[0][2], GlCall::Vertex2(Vec2::new(266.0, 276.0)));
    // Last tile: column 2, row 1, still a full tile
    assert_eq!(quads[5][0], GlCall::Vertex2(Vec2::new(522.0, 276.0)));
    assert_eq!(quads[5][2], GlCall::Vertex2(Vec2::new(778.0, 532.0)));

    assert!(calls.contains(&GlCall::Scissor(Rect::new(10, 480 - 320, 600, 300))));
    assert!(calls.contains(&GlCall::Disable(Capability::Blend)));
}

#[test]
fn test_transparent_image_blends() {
    let (ctx, gl) = context(64, 64);
    let mut pixels = vec![[255, 0, 0, 255]; 4];
    pixels[0][3] = 0;
    let image = bitmap(&ctx, Bitmap2DType::Image, &PixelBuffer::from_rgba(&pixels), 2, 2);
    image.draw(0, 0).unwrap();

    let calls = gl.calls();
    assert!(calls.contains(&GlCall::Enable(Capability::Blend)));
    assert!(calls.contains(&GlCall::BlendFunc(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)));
    assert!(!gl.capability(Capability::Blend));
}

#[test]
fn test_draw_restores_state() {
    let (ctx, gl) = context(64, 64);
    {
        let mut guard = ctx.lock().unwrap();
        guard.gl.enable(Capability::Lighting);
        guard.gl.enable(Capability::DepthTest);
    }
    let image = bitmap(&ctx, Bitmap2DType::Image, &opaque(4, 4), 4, 4);
    let projection = gl.projection();
    image.draw(1, 1).unwrap();

    let calls = gl.calls();
    let first_quad = calls
        .iter()
        .position(|c| *c == GlCall::Begin(BeginMode::Quads))
        .unwrap();
    assert!(calls[..first_quad].contains(&GlCall::Disable(Capability::DepthTest)));

    assert!(gl.capability(Capability::Lighting));
    assert!(gl.capability(Capability::DepthTest));
    assert!(!gl.capability(Capability::ScissorTest));
    assert!(!gl.capability(Capability::Texture2D));
    assert_eq!(gl.projection(), projection);
    assert_eq!(gl.modelview_depth(), 0);
}

#[test]
fn test_out_of_texture_memory_releases_partial_tiles() {
    let (ctx, gl) = context_with_tiles(64, 64, 16);
    gl.clone().with_texture_budget(3);
    let result = GlBitmap::new(ctx.clone(), Bitmap2DType::Image, &opaque(64, 64), 64, 64);
    assert!(matches!(result, Err(Error::OutOfMemory)));
    assert_eq!(gl.live_textures(), 0);
}

#[test]
fn test_drop_deletes_tiles() {
    let (ctx, gl) = context_with_tiles(64, 64, 16);
    let image = bitmap(&ctx, Bitmap2DType::Image, &opaque(40, 20), 40, 20);
    assert_eq!(gl.live_textures(), 6);
    drop(image);
    assert_eq!(gl.live_textures(), 0);
}

// ============================================================================
// Depth
// ============================================================================

#[test]
fn test_depth_rows_are_flipped() {
    let (ctx, _gl) = context(64, 64);
    let top = [0xFF, 0xFF, 0xFF, 0xFF];
    let bottom = [0, 0, 0, 0xFF];
    let buffer = PixelBuffer::from_rgba(&[top, top, bottom, bottom]);
    let depth = bitmap(&ctx, Bitmap2DType::Depth, &buffer, 2, 2);
    let BitmapStorage::Depth(values) = &depth.storage else {
        panic!("depth bitmap without depth storage");
    };
    assert_eq!(values, &vec![0, 0, 0xFFFF, 0xFFFF]);
}

#[test]
fn test_depth_draw_sequence() {
    let (ctx, gl) = context(64, 48);
    let depth = bitmap(&ctx, Bitmap2DType::Depth, &opaque(8, 8), 8, 8);
    gl.clear_calls();
    depth.draw(4, 10).unwrap();

    let calls: Vec<GlCall> = gl
        .calls()
        .into_iter()
        .filter(|c| {
            matches!(
                c,
                GlCall::DepthFunc(_) | GlCall::ColorMask(_) | GlCall::RasterPos(_) | GlCall::BitmapMove(..) | GlCall::DrawPixels { .. }
            )
        })
        .collect();
    assert_eq!(
        calls,
        vec![
            GlCall::DepthFunc(CompareFunc::Always),
            GlCall::ColorMask(false),
            GlCall::RasterPos(Vec2::new(4.0, 18.0)),
            GlCall::DrawPixels { width: 8, height: 8, depth: true },
            GlCall::ColorMask(true),
            GlCall::DepthFunc(CompareFunc::Less),
        ]
    );
    assert!(gl.calls().contains(&GlCall::Scissor(Rect::new(4, 48 - 18, 8, 8))));
    assert_eq!(batches(&gl.calls()).len(), 0);
}

#[test]
fn test_depth_on_bottom_edge_is_nudged() {
    let (ctx, gl) = context(64, 48);
    let depth = bitmap(&ctx, Bitmap2DType::Depth, &opaque(64, 48), 64, 48);
    depth.draw(0, 0).unwrap();
    let calls = gl.calls();
    assert!(calls.contains(&GlCall::RasterPos(Vec2::new(0.0, 47.0))));
    assert!(calls.contains(&GlCall::BitmapMove(0.0, -1.0)));
    assert_eq!(gl.live_textures(), 0);
}
