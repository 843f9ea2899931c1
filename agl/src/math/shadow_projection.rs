/// Planar shadow projection.
///
/// Builds the matrix that flattens geometry onto a plane along rays cast from
/// a point light, so that drawing a model through it produces its shadow on
/// the plane.

use glam::{Mat4, Vec3};

/// Planar projection from `light` onto the plane through `plane_point` with `normal`.
///
/// The normal is negated unless `dont_negate` is set. Negation does not move
/// the projected point (the matrix only changes sign), but it keeps the
/// homogeneous `w` positive for geometry lying between the plane and the light
/// when the normal faces the light, which fixed-function clipping requires.
pub fn shadow_projection(light: Vec3, plane_point: Vec3, normal: Vec3, dont_negate: bool) -> Mat4 {
    let n = if dont_negate { normal } else { -normal };
    let l = light;

    let d = n.dot(l);
    let c = n.dot(plane_point) - d;

    // Column-major, element [col * 4 + row]
    Mat4::from_cols_array(&[
        l.x * n.x + c, n.x * l.y, n.x * l.z, n.x,
        n.y * l.x, l.y * n.y + c, n.y * l.z, n.y,
        n.z * l.x, n.z * l.y, l.z * n.z + c, n.z,
        -l.x * c - l.x * d, -l.y * c - l.y * d, -l.z * c - l.z * d, -d,
    ])
}

#[cfg(test)]
#[path = "shadow_projection_tests.rs"]
mod tests;
