/// Shadow planes: coplanar sectors that receive projected planar shadows

use glam::{Mat4, Vec3};
use crate::error::{Error, Result};
use crate::graphics::Color;
use crate::math::shadow_projection;

/// Distance from the reference plane still counted as coplanar.
pub const COPLANAR_TOLERANCE: f32 = 1e-3;

/// One planar polygon of a shadow plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    vertices: Vec<Vec3>,
    normal: Vec3,
}

impl Sector {
    /// Build a sector from an ordered polygon loop.
    ///
    /// The unit normal follows the winding (Newell's method). Fewer than three
    /// vertices, or a loop with zero area, is rejected.
    pub fn new(vertices: Vec<Vec3>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::InvalidResource(format!(
                "sector needs at least 3 vertices, got {}", vertices.len()
            )));
        }

        let mut normal = Vec3::ZERO;
        for (i, cur) in vertices.iter().enumerate() {
            let next = vertices[(i + 1) % vertices.len()];
            normal.x += (cur.y - next.y) * (cur.z + next.z);
            normal.y += (cur.z - next.z) * (cur.x + next.x);
            normal.z += (cur.x - next.x) * (cur.y + next.y);
        }

        let normal = normal.try_normalize().ok_or_else(|| {
            Error::InvalidResource("sector is degenerate (zero-area polygon)".to_string())
        })?;

        Ok(Self { vertices, normal })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

/// The sectors of a shadow plane plus the normal-sign convention.
///
/// Only the first sector's first vertex and normal define the projection
/// plane; the rest are assumed to lie on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowPlaneGeometry {
    sectors: Vec<Sector>,
    dont_negate: bool,
}

impl ShadowPlaneGeometry {
    pub fn new(sectors: Vec<Sector>) -> Result<Self> {
        let first = sectors.first().ok_or_else(|| {
            Error::InvalidResource("shadow plane needs at least one sector".to_string())
        })?;

        let point = first.vertices[0];
        let normal = first.normal;
        let coplanar = sectors
            .iter()
            .flat_map(|s| s.vertices.iter())
            .all(|v| (*v - point).dot(normal).abs() <= COPLANAR_TOLERANCE);
        if !coplanar {
            crate::agl_error!("agl::ShadowPlane", "Shadow plane sectors are not coplanar");
            debug_assert!(coplanar, "shadow plane sectors are not coplanar");
        }

        Ok(Self { sectors, dont_negate: false })
    }

    /// Keep the sector normal as wound instead of negating it.
    pub fn with_dont_negate(mut self, dont_negate: bool) -> Self {
        self.dont_negate = dont_negate;
        self
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn dont_negate(&self) -> bool {
        self.dont_negate
    }

    /// Reference point and normal of the projection plane
    pub fn reference_plane(&self) -> (Vec3, Vec3) {
        let first = &self.sectors[0];
        (first.vertices[0], first.normal)
    }

    /// Matrix flattening geometry onto the plane as seen from `light`.
    pub fn projection(&self, light: Vec3) -> Mat4 {
        let (point, normal) = self.reference_plane();
        shadow_projection(light, point, normal, self.dont_negate)
    }
}

/// Shadow plane resource.
///
/// While enabled, everything drawn is flattened onto the plane and painted in
/// the shadow color. The per-pixel mask (software) or stencil list (hardware)
/// is built once at creation; sectors cannot change afterwards.
pub trait ShadowPlane: Send {
    fn geometry(&self) -> &ShadowPlaneGeometry;

    /// Push a model-view entry, multiply in the projection for `light_pos`
    /// and set the overlay color.
    fn enable(&mut self, light_pos: Vec3, color: Color) -> Result<()>;

    /// Pop the matrix pushed by `enable` and clear the overlay.
    /// No-op when not enabled.
    fn disable(&mut self) -> Result<()>;

    fn is_enabled(&self) -> bool;
}

#[cfg(test)]
#[path = "shadow_plane_tests.rs"]
mod tests;
