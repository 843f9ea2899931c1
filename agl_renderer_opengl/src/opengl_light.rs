/// Light - OpenGL implementation of the Light trait
///
/// Slots are the GL light units. A light probes them from 0 upward and
/// takes the first one not enabled; the parameters are uploaded under the
/// current model-view, which GL applies to the position.

use agl::agl::Result;
use agl::agl::render::{Light, LightParams, LightType};
use crate::opengl_api::{Capability, LightParam};
use crate::opengl_context::{lock, GlContext, SharedGlContext};

pub struct GlLight {
    context: SharedGlContext,
    params: LightParams,
    slot: Option<u32>,
}

impl GlLight {
    pub(crate) fn new(context: SharedGlContext, kind: LightType) -> Self {
        Self {
            context,
            params: LightParams::new(kind),
            slot: None,
        }
    }
}

fn free_slot(ctx: &GlContext) -> Option<u32> {
    (0..ctx.max_lights).find(|&i| !ctx.gl.is_enabled(Capability::Light(i)))
}

fn upload(ctx: &mut GlContext, slot: u32, params: &LightParams) {
    ctx.gl.light(slot, LightParam::Diffuse(params.diffuse()));
    ctx.gl.light(slot, LightParam::Position(params.homogeneous_position()));
    ctx.gl.light(slot, LightParam::SpotDirection(params.spot_direction()));
    ctx.gl.light(slot, LightParam::SpotCutoff(params.spot_cutoff()));
    ctx.gl.enable(Capability::Light(slot));
}

impl Light for GlLight {
    fn params(&self) -> &LightParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut LightParams {
        &mut self.params
    }

    fn enable(&mut self) -> Result<()> {
        let mut ctx = lock(&self.context)?;

        let slot = match self.slot.or_else(|| free_slot(&ctx)) {
            Some(slot) => slot,
            None => {
                agl::agl_warn!(
                    "agl::opengl::Light",
                    "Cannot init light: all {} GL lights are in use",
                    ctx.max_lights
                );
                return Ok(());
            }
        };

        ctx.gl.enable(Capability::Lighting);
        ctx.pipeline.set_lighting(true);
        upload(&mut ctx, slot, &self.params);
        self.slot = Some(slot);
        agl::agl_trace!("agl::opengl::Light", "{:?} light bound to GL_LIGHT{}", self.params.kind, slot);
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        if let Some(slot) = self.slot.take() {
            lock(&self.context)?.gl.disable(Capability::Light(slot));
        }
        Ok(())
    }

    fn slot(&self) -> Option<u32> {
        self.slot
    }
}

impl Drop for GlLight {
    fn drop(&mut self) {
        if let Err(e) = self.disable() {
            agl::agl_error!("agl::opengl::Light", "Failed to release light: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "opengl_light_tests.rs"]
mod tests;
