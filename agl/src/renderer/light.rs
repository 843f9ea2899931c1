/// Light trait and the parameter mapping shared by the backends

use glam::{Vec3, Vec4};
use crate::error::Result;
use crate::graphics::Color;

/// Kind of light source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    Point,
    Directional,
    Spot,
}

/// Divisor applied to intensity when mapping to backend diffuse color.
pub const INTENSITY_SCALE: f32 = 1.3;

/// Full range of a color channel as the engine stores it (0..=15).
pub const COLOR_CHANNEL_RANGE: f32 = 15.0;

/// Engine-side light description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub kind: LightType,
    pub position: Vec3,
    pub direction: Vec3,
    /// Channels in the 0..=15 range
    pub color: Color,
    pub intensity: f32,
    /// Spot cone half-angle in degrees
    pub cutoff: f32,
}

impl LightParams {
    pub fn new(kind: LightType) -> Self {
        Self {
            kind,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            color: Color::rgb(15, 15, 15),
            intensity: 1.0,
            cutoff: 180.0,
        }
    }

    /// Backend diffuse color: `(channel / 15) * (intensity / 1.3)`, alpha 1
    pub fn diffuse(&self) -> Vec4 {
        let scale = self.intensity / INTENSITY_SCALE;
        Vec4::new(
            self.color.r as f32 / COLOR_CHANNEL_RANGE * scale,
            self.color.g as f32 / COLOR_CHANNEL_RANGE * scale,
            self.color.b as f32 / COLOR_CHANNEL_RANGE * scale,
            1.0,
        )
    }

    /// Homogeneous position in the fixed-function convention.
    ///
    /// Directional lights are `(-direction, 0)`; the others sit at `(position, 1)`.
    pub fn homogeneous_position(&self) -> Vec4 {
        match self.kind {
            LightType::Directional => (-self.direction).extend(0.0),
            LightType::Point | LightType::Spot => self.position.extend(1.0),
        }
    }

    /// Spot direction, or the fixed-function default for non-spot lights
    pub fn spot_direction(&self) -> Vec3 {
        match self.kind {
            LightType::Spot => self.direction,
            _ => Vec3::NEG_Z,
        }
    }

    /// Spot cutoff, 180 (no cone) for non-spot lights
    pub fn spot_cutoff(&self) -> f32 {
        match self.kind {
            LightType::Spot => self.cutoff,
            _ => 180.0,
        }
    }
}

/// Light resource bound to a backend light slot while enabled.
pub trait Light: Send {
    fn params(&self) -> &LightParams;

    /// Changes take effect on the next `enable`.
    fn params_mut(&mut self) -> &mut LightParams;

    /// Bind to the lowest free slot and upload the parameters.
    ///
    /// When every slot is taken this logs a warning and leaves the light
    /// unbound; it is not an error. A bound light keeps its slot.
    fn enable(&mut self) -> Result<()>;

    /// Release the slot. No-op when unbound.
    fn disable(&mut self) -> Result<()>;

    /// Backend slot, `None` when unbound
    fn slot(&self) -> Option<u32>;

    fn is_bound(&self) -> bool {
        self.slot().is_some()
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
