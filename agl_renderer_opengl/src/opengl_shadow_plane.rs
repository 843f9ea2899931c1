/// ShadowPlane - OpenGL implementation of the ShadowPlane trait
///
/// The sector polygons are compiled into a display list at creation. While
/// enabled, the list is drawn into the stencil buffer and everything after
/// it is flattened onto the plane, drawn only where the stencil is set.

use glam::{Vec3, Vec4};
use agl::agl::{Error, Result};
use agl::agl::graphics::Color;
use agl::agl::render::{ShadowPlane, ShadowPlaneGeometry};
use crate::opengl_api::{BeginMode, Capability, ClearBuffers, CompareFunc, ListId, StencilOp};
use crate::opengl_context::{lock, GlContext, SharedGlContext};
use crate::opengl_primitive::color_vec;

/// Enable flags changed by `enable` and put back by `disable`
const SHADOW_CAPABILITIES: [Capability; 4] = [
    Capability::StencilTest,
    Capability::DepthTest,
    Capability::Lighting,
    Capability::Texture2D,
];

pub struct GlShadowPlane {
    context: SharedGlContext,
    geometry: ShadowPlaneGeometry,
    list: ListId,
    /// Flags saved by `enable`, `None` while disabled
    saved: Option<Vec<(Capability, bool)>>,
}

fn compile_sectors(ctx: &mut GlContext, geometry: &ShadowPlaneGeometry) -> Result<ListId> {
    let list = ctx.gl.gen_list().ok_or(Error::OutOfMemory)?;
    ctx.gl.new_list(list);
    for sector in geometry.sectors() {
        ctx.gl.begin(BeginMode::Polygon);
        ctx.gl.normal(sector.normal());
        for &v in sector.vertices() {
            ctx.gl.vertex3(v);
        }
        ctx.gl.end();
    }
    ctx.gl.end_list();
    Ok(list)
}

impl GlShadowPlane {
    pub(crate) fn new(context: SharedGlContext, geometry: ShadowPlaneGeometry) -> Result<Self> {
        let list = compile_sectors(&mut *lock(&context)?, &geometry)?;
        agl::agl_debug!(
            "agl::opengl::ShadowPlane",
            "Shadow plane compiled into list {} ({} sectors)",
            list, geometry.sectors().len()
        );
        Ok(Self { context, geometry, list, saved: None })
    }
}

impl ShadowPlane for GlShadowPlane {
    fn geometry(&self) -> &ShadowPlaneGeometry {
        &self.geometry
    }

    fn enable(&mut self, light_pos: Vec3, color: Color) -> Result<()> {
        if self.saved.is_some() {
            return Ok(());
        }
        let mut ctx = lock(&self.context)?;
        if !ctx.push_modelview() {
            agl::agl_bail!("agl::opengl::ShadowPlane", "Model-view stack overflow");
        }
        let saved: Vec<(Capability, bool)> = SHADOW_CAPABILITIES
            .iter()
            .map(|&cap| (cap, ctx.gl.is_enabled(cap)))
            .collect();

        // Stencil = 1 wherever the plane covers the screen
        ctx.gl.clear(ClearBuffers::STENCIL);
        ctx.gl.enable(Capability::StencilTest);
        ctx.gl.disable(Capability::DepthTest);
        ctx.gl.stencil_func(CompareFunc::Always, 1, 0xFF);
        ctx.gl.stencil_op(StencilOp::Keep, StencilOp::Keep, StencilOp::Replace);
        ctx.gl.color_mask(false);
        ctx.gl.call_list(self.list);
        ctx.gl.color_mask(true);

        ctx.gl.stencil_func(CompareFunc::Equal, 1, 0xFF);
        ctx.gl.stencil_op(StencilOp::Keep, StencilOp::Keep, StencilOp::Keep);
        ctx.gl.disable(Capability::Lighting);
        ctx.gl.disable(Capability::Texture2D);
        ctx.gl.color(color_vec(color));
        ctx.mult_modelview(self.geometry.projection(light_pos));

        self.saved = Some(saved);
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        let Some(saved) = self.saved.take() else {
            return Ok(());
        };
        let mut ctx = lock(&self.context)?;
        if !ctx.pop_modelview() {
            agl::agl_error!("agl::opengl::ShadowPlane", "Model-view entry pushed by enable is gone");
        }
        for (cap, enabled) in saved {
            ctx.set_capability(cap, enabled);
        }
        ctx.gl.color(Vec4::ONE);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.saved.is_some()
    }
}

impl Drop for GlShadowPlane {
    fn drop(&mut self) {
        if let Err(e) = self.disable() {
            agl::agl_error!("agl::opengl::ShadowPlane", "Failed to disable shadow plane: {}", e);
        }
        match lock(&self.context) {
            Ok(mut ctx) => ctx.gl.delete_list(self.list),
            Err(e) => agl::agl_error!("agl::opengl::ShadowPlane", "Failed to delete list {}: {}", self.list, e),
        }
    }
}

#[cfg(test)]
#[path = "opengl_shadow_plane_tests.rs"]
mod tests;
