/// Light - TinyGL implementation of the Light trait

use glam::{Vec3, Vec4};
use agl::agl::Result;
use agl::agl::render::{Light, LightParams, LightType};
use crate::tinygl_context::{lock, EyeLight, SharedContext, AMBIENT};

pub struct TglLight {
    context: SharedContext,
    params: LightParams,
    slot: Option<u32>,
}

impl TglLight {
    pub(crate) fn new(context: SharedContext, kind: LightType) -> Self {
        Self {
            context,
            params: LightParams::new(kind),
            slot: None,
        }
    }
}

impl Light for TglLight {
    fn params(&self) -> &LightParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut LightParams {
        &mut self.params
    }

    fn enable(&mut self) -> Result<()> {
        let mut ctx = lock(&self.context)?;

        let slot = match self.slot {
            Some(slot) => slot,
            None => match ctx.lights.alloc() {
                Some(slot) => slot,
                None => {
                    agl::agl_warn!(
                        "agl::tinygl::Light",
                        "Cannot init light: all {} light slots are in use",
                        ctx.lights.capacity()
                    );
                    return Ok(());
                }
            },
        };

        ctx.pipeline.set_lighting(true);
        let eye_light = EyeLight::new(&self.params, &ctx.pipeline);
        ctx.light_slots[slot as usize] = Some(eye_light);
        self.slot = Some(slot);
        agl::agl_trace!("agl::tinygl::Light", "{:?} light bound to slot {}", self.params.kind, slot);
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        if let Some(slot) = self.slot.take() {
            let mut ctx = lock(&self.context)?;
            ctx.lights.free(slot);
            ctx.light_slots[slot as usize] = None;
        }
        Ok(())
    }

    fn slot(&self) -> Option<u32> {
        self.slot
    }
}

impl Drop for TglLight {
    fn drop(&mut self) {
        if let Err(e) = self.disable() {
            agl::agl_error!("agl::tinygl::Light", "Failed to release light slot: {}", e);
        }
    }
}

/// Lit color of a vertex in eye space: ambient plus one diffuse term per light.
pub(crate) fn shade(lights: &[EyeLight], eye_pos: Vec3, normal: Vec3) -> Vec4 {
    let mut color = Vec3::splat(AMBIENT);
    for light in lights {
        let to_light = if light.position.w == 0.0 {
            light.position.truncate().normalize_or_zero()
        } else {
            (light.position.truncate() / light.position.w - eye_pos).normalize_or_zero()
        };

        let mut factor = normal.dot(to_light).max(0.0);
        if light.spot_cutoff < 180.0 {
            let cos = (-to_light).dot(light.spot_direction.normalize_or_zero());
            if cos < light.spot_cutoff.to_radians().cos() {
                factor = 0.0;
            }
        }
        color += light.diffuse.truncate() * factor;
    }
    color.min(Vec3::ONE).extend(1.0)
}

#[cfg(test)]
#[path = "tinygl_light_tests.rs"]
mod tests;
