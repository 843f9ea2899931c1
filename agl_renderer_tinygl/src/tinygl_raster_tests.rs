use super::*;
use crate::test_support::{context, count_pixels};

fn sv(x: f32, y: f32, z: f32, color: Vec4) -> ScreenVertex {
    ScreenVertex { pos: Vec3::new(x, y, z), inv_w: 1.0, color, uv: Vec2::ZERO }
}

const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
const BLUE: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

// ============================================================================
// Coverage
// ============================================================================

#[test]
fn test_covered_pixels_match_area() {
    let mut count = 0;
    for_each_covered(Vec2::new(0.0, 0.0), Vec2::new(16.0, 0.0), Vec2::new(0.0, 16.0), 32, 32, |_, _, b| {
        assert!((b[0] + b[1] + b[2] - 1.0).abs() < 1e-4);
        count += 1;
    });
    // Half of a 16x16 square, give or take the diagonal
    assert!((120..=136).contains(&count), "{}", count);
}

#[test]
fn test_both_windings_fill_same_pixels() {
    let (a, b, c) = (Vec2::new(2.0, 1.0), Vec2::new(20.0, 5.0), Vec2::new(7.0, 18.0));
    let mut ccw = Vec::new();
    let mut cw = Vec::new();
    for_each_covered(a, b, c, 32, 32, |x, y, _| ccw.push((x, y)));
    for_each_covered(a, c, b, 32, 32, |x, y, _| cw.push((x, y)));
    assert!(!ccw.is_empty());
    assert_eq!(ccw, cw);
}

#[test]
fn test_coverage_is_clipped_to_screen() {
    for_each_covered(Vec2::new(-50.0, -50.0), Vec2::new(100.0, -50.0), Vec2::new(-50.0, 100.0), 8, 8, |x, y, _| {
        assert!((0..8).contains(&x) && (0..8).contains(&y));
    });
}

#[test]
fn test_degenerate_triangle_covers_nothing() {
    let mut count = 0;
    for_each_covered(Vec2::ZERO, Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0), 16, 16, |_, _, _| count += 1);
    assert_eq!(count, 0);
}

// ============================================================================
// Depth
// ============================================================================

#[test]
fn test_depth_value_orders_nearer_higher() {
    assert!(depth_value(0.1) > depth_value(0.9));
    assert_eq!(depth_value(1.0), 0);
    assert_eq!(depth_value(0.0), 0xFFFF);
}

#[test]
fn test_nearer_triangle_wins_in_any_order() {
    let ctx = context(16, 16);
    let mut guard = ctx.lock().unwrap();
    {
        let mut sink = FragmentSink::new(&mut guard);
        let near = [sv(0.0, 0.0, 0.2, RED), sv(16.0, 0.0, 0.2, RED), sv(0.0, 16.0, 0.2, RED)];
        let far = [sv(0.0, 0.0, 0.8, BLUE), sv(16.0, 0.0, 0.8, BLUE), sv(0.0, 16.0, 0.8, BLUE)];
        fill_triangle(&mut sink, near, None);
        fill_triangle(&mut sink, far, None);
    }
    assert_eq!(guard.framebuffer.get_rgb_at(0), (255, 0, 0));
    assert_eq!(count_pixels(&guard, (0, 0, 255)), 0);
}

#[test]
fn test_zero_alpha_fragments_are_dropped() {
    let ctx = context(8, 8);
    let mut guard = ctx.lock().unwrap();
    {
        let mut sink = FragmentSink::new(&mut guard);
        let clear = Vec4::new(1.0, 1.0, 1.0, 0.0);
        fill_triangle(&mut sink, [sv(0.0, 0.0, 0.5, clear), sv(8.0, 0.0, 0.5, clear), sv(0.0, 8.0, 0.5, clear)], None);
    }
    assert_eq!(count_pixels(&guard, (255, 255, 255)), 0);
}

// ============================================================================
// Lines and points
// ============================================================================

#[test]
fn test_line_hits_both_endpoints() {
    let ctx = context(16, 16);
    let mut guard = ctx.lock().unwrap();
    guard.depth_test = false;
    {
        let mut sink = FragmentSink::new(&mut guard);
        draw_line(&mut sink, sv(1.0, 2.0, 0.0, RED), sv(12.0, 9.0, 0.0, RED));
    }
    let at = |x: usize, y: usize| guard.framebuffer.get_rgb_at(y * 16 + x);
    assert_eq!(at(1, 2), (255, 0, 0));
    assert_eq!(at(12, 9), (255, 0, 0));
    // One pixel per column along the major axis
    assert_eq!(count_pixels(&guard, (255, 0, 0)), 12);
}

#[test]
fn test_point_outside_screen_is_ignored() {
    let ctx = context(4, 4);
    let mut guard = ctx.lock().unwrap();
    {
        let mut sink = FragmentSink::new(&mut guard);
        draw_point(&mut sink, sv(-1.0, 2.0, 0.5, RED));
        draw_point(&mut sink, sv(2.0, 3.0, 0.5, RED));
    }
    assert_eq!(count_pixels(&guard, (255, 0, 0)), 1);
}

// ============================================================================
// Near clipping
// ============================================================================

#[test]
fn test_clip_near_keeps_front_polygon() {
    let v = |z: f32, w: f32| ClipVertex { clip: Vec4::new(0.0, 0.0, z, w), color: RED, uv: Vec2::ZERO };
    let front = [v(0.0, 1.0), v(0.5, 1.0), v(0.2, 1.0)];
    assert_eq!(clip_near(&front), front.to_vec());

    let behind = [v(-2.0, 1.0), v(-3.0, 1.0), v(-4.0, 1.0)];
    assert!(clip_near(&behind).is_empty());
}

#[test]
fn test_clip_near_splits_crossing_triangle() {
    let v = |z: f32| ClipVertex { clip: Vec4::new(0.0, 0.0, z, 1.0), color: RED, uv: Vec2::ZERO };
    let clipped = clip_near(&[v(0.0), v(-3.0), v(0.5)]);
    assert_eq!(clipped.len(), 4);
    assert!(clipped.iter().all(|c| c.clip.z + c.clip.w >= -1e-6));
}
