use super::*;
use agl::agl::math::frustum_from_fov;
use agl::agl::render::SubColor;
use crate::test_support::{context, count_pixels};

fn primitive(ctx: &SharedContext, mode: DrawMode, positions: Vec<f32>, color: SubColor) -> TglPrimitive {
    let mut p = TglPrimitive::new(ctx.clone(), mode);
    p.data_mut().add_sub(PrimitiveSub::new(positions, color).unwrap());
    p
}

#[test]
fn test_quad_fills_pixel_rectangle() {
    let ctx = context(16, 16);
    let quad = primitive(
        &ctx,
        DrawMode::Quads,
        vec![2.0, 2.0, 6.0, 2.0, 6.0, 5.0, 2.0, 5.0],
        SubColor::Global(Color::rgb(255, 0, 0)),
    );
    quad.draw(0.0, 0.0).unwrap();
    assert_eq!(count_pixels(&ctx.lock().unwrap(), (255, 0, 0)), 12);
}

#[test]
fn test_draw_offset_moves_primitive() {
    let ctx = context(16, 16);
    let point = primitive(&ctx, DrawMode::Points, vec![1.5, 1.5], SubColor::Global(Color::WHITE));
    point.draw(3.0, 4.0).unwrap();
    assert_eq!(ctx.lock().unwrap().framebuffer.get_rgb_at(5 * 16 + 4), (255, 255, 255));
}

#[test]
fn test_per_vertex_colors_reach_line_ends() {
    let ctx = context(16, 4);
    let line = primitive(
        &ctx,
        DrawMode::Lines,
        vec![0.5, 1.5, 15.5, 1.5],
        SubColor::PerVertex(vec![255, 0, 0, 255, 0, 0, 255, 255]),
    );
    line.draw(0.0, 0.0).unwrap();
    let guard = ctx.lock().unwrap();
    assert_eq!(guard.framebuffer.get_rgb_at(16), (255, 0, 0));
    assert_eq!(guard.framebuffer.get_rgb_at(16 + 15), (0, 0, 255));
}

#[test]
fn test_line_loop_closes() {
    let ctx = context(8, 8);
    let triangle = primitive(
        &ctx,
        DrawMode::LineLoop,
        vec![1.5, 1.5, 6.5, 1.5, 1.5, 6.5],
        SubColor::Global(Color::WHITE),
    );
    triangle.draw(0.0, 0.0).unwrap();
    let guard = ctx.lock().unwrap();
    // Closing edge runs down the left column
    for y in 1..=6 {
        assert_eq!(guard.framebuffer.get_rgb_at(y * 8 + 1), (255, 255, 255), "row {}", y);
    }
}

#[test]
fn test_draw_restores_pipeline_state() {
    let ctx = context(8, 8);
    {
        let mut guard = ctx.lock().unwrap();
        guard.pipeline.set_projection(frustum_from_fov(60.0, 1.0, 10.0));
        guard.pipeline.translate(1.0, 2.0, 3.0);
        guard.pipeline.set_lighting(true);
    }
    let before = ctx.lock().unwrap().pipeline.clone();

    let point = primitive(&ctx, DrawMode::Points, vec![0.0, 0.0], SubColor::Global(Color::WHITE));
    point.draw(0.0, 0.0).unwrap();

    let guard = ctx.lock().unwrap();
    assert_eq!(guard.pipeline.projection(), before.projection());
    assert_eq!(guard.pipeline.modelview(), before.modelview());
    assert!(guard.pipeline.lighting());
    assert!(guard.depth_test);
}
