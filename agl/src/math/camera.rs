/// Camera math shared by every backend.
///
/// The backends differ in where the matrices end up (a software matrix stack
/// or the fixed-function GL stack), not in how they are built.

use glam::{Mat4, Vec3};

/// Fixed vertical/horizontal ratio applied to the camera frustum (4:3 screens).
pub const CAMERA_ASPECT: f32 = 0.75;

/// Perspective matrix equivalent to `glFrustum(l, r, b, t, n, f)`.
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);
    let c = -(far + near) / (far - near);
    let d = -(2.0 * far * near) / (far - near);
    Mat4::from_cols_array(&[
        2.0 * near / (right - left), 0.0, 0.0, 0.0,
        0.0, 2.0 * near / (top - bottom), 0.0, 0.0,
        a, b, c, -1.0,
        0.0, 0.0, d, 0.0,
    ])
}

/// Symmetric camera frustum for a horizontal field of view in degrees.
///
/// `right = near * tan(fov / 2)`, `top = right * 0.75`.
pub fn frustum_from_fov(fov: f32, near: f32, far: f32) -> Mat4 {
    let right = near * (fov / 2.0).to_radians().tan();
    let top = right * CAMERA_ASPECT;
    frustum(-right, right, -top, top, near, far)
}

/// Roll of `roll` degrees about the view axis `(0, 0, -1)`.
pub fn roll_matrix(roll: f32) -> Mat4 {
    Mat4::from_axis_angle(Vec3::NEG_Z, roll.to_radians())
}

/// Rotation of `degrees` about an arbitrary axis (normalized here, like `glRotatef`).
pub fn rotation(degrees: f32, axis: Vec3) -> Mat4 {
    let axis = axis.normalize_or_zero();
    if axis == Vec3::ZERO {
        return Mat4::IDENTITY;
    }
    Mat4::from_axis_angle(axis, degrees.to_radians())
}

/// Up vector used when positioning the camera.
///
/// `(0, 0, 1)` unless the camera looks straight up or down (eye and target
/// share X and Y), where the cross product would vanish; then `(0, 1, 0)`.
pub fn camera_up_vector(eye: Vec3, look_at: Vec3) -> Vec3 {
    if eye.x == look_at.x && eye.y == look_at.y {
        Vec3::Y
    } else {
        Vec3::Z
    }
}

/// Right-handed camera basis `(x, y, z)` of a look-at view, z pointing from
/// `center` to `eye`.
///
/// Zero-length vectors are left unnormalized instead of producing NaNs.
pub fn look_at_basis(eye: Vec3, center: Vec3, up: Vec3) -> (Vec3, Vec3, Vec3) {
    let z = normalize_if_nonzero(eye - center);
    let x = up.cross(z);
    let y = z.cross(x);
    (normalize_if_nonzero(x), normalize_if_nonzero(y), z)
}

/// View matrix of `gluLookAt(eye, center, up)`.
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let (x, y, z) = look_at_basis(eye, center, up);
    let rotation = Mat4::from_cols_array(&[
        x.x, y.x, z.x, 0.0,
        x.y, y.y, z.y, 0.0,
        x.z, y.z, z.z, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);
    rotation * Mat4::from_translation(-eye)
}

fn normalize_if_nonzero(v: Vec3) -> Vec3 {
    let mag = v.length();
    if mag != 0.0 { v / mag } else { v }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
