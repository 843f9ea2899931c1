/// ShadowPlane - TinyGL implementation of the ShadowPlane trait
///
/// The sectors are rasterized once, under the transform current at creation,
/// into a per-pixel mask. While enabled, the rasterizer only writes masked
/// pixels and paints them in the shadow color.

use std::sync::Arc;
use glam::Vec3;
use agl::agl::Result;
use agl::agl::graphics::Color;
use agl::agl::render::{ShadowPlane, ShadowPlaneGeometry};
use crate::tinygl_context::{lock, ShadowOverlay, SharedContext, TglContext};
use crate::tinygl_raster::for_each_covered;

pub struct TglShadowPlane {
    context: SharedContext,
    geometry: ShadowPlaneGeometry,
    mask: Arc<Vec<bool>>,
    enabled: bool,
    /// Overlay that was installed when this plane was enabled
    previous: Option<ShadowOverlay>,
}

impl TglShadowPlane {
    pub(crate) fn new(context: SharedContext, geometry: ShadowPlaneGeometry) -> Result<Self> {
        let mask = {
            let ctx = lock(&context)?;
            rasterize_mask(&ctx, &geometry)
        };
        agl::agl_debug!(
            "agl::tinygl::ShadowPlane",
            "Shadow mask built: {} sectors, {} pixels covered",
            geometry.sectors().len(),
            mask.iter().filter(|&&m| m).count()
        );
        Ok(Self {
            context,
            geometry,
            mask: Arc::new(mask),
            enabled: false,
            previous: None,
        })
    }

    pub(crate) fn mask(&self) -> &[bool] {
        &self.mask
    }
}

fn rasterize_mask(ctx: &TglContext, geometry: &ShadowPlaneGeometry) -> Vec<bool> {
    let (width, height) = (ctx.width, ctx.height);
    let mut mask = vec![false; width as usize * height as usize];

    for sector in geometry.sectors() {
        let projected: Vec<_> = sector
            .vertices()
            .iter()
            .filter_map(|&v| ctx.pipeline.project(v))
            .map(|p| p.truncate())
            .collect();
        for i in 1..projected.len().saturating_sub(1) {
            for_each_covered(projected[0], projected[i], projected[i + 1], width, height, |x, y, _| {
                mask[y as usize * width as usize + x as usize] = true;
            });
        }
    }
    mask
}

impl ShadowPlane for TglShadowPlane {
    fn geometry(&self) -> &ShadowPlaneGeometry {
        &self.geometry
    }

    fn enable(&mut self, light_pos: Vec3, color: Color) -> Result<()> {
        if self.enabled {
            return Ok(());
        }
        let mut ctx = lock(&self.context)?;
        if !ctx.pipeline.push_modelview() {
            agl::agl_bail!("agl::tinygl::ShadowPlane", "Model-view stack overflow");
        }
        ctx.pipeline.mult_modelview(self.geometry.projection(light_pos));
        self.previous = ctx.shadow.replace(ShadowOverlay { mask: Arc::clone(&self.mask), color });
        if self.previous.is_some() {
            agl::agl_warn!(
                "agl::tinygl::ShadowPlane",
                "Shadow plane enabled over another one; disable them in reverse order"
            );
        }
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let mut ctx = lock(&self.context)?;
        ctx.pipeline.pop_modelview();
        ctx.shadow = self.previous.take();
        self.enabled = false;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Drop for TglShadowPlane {
    fn drop(&mut self) {
        if let Err(e) = self.disable() {
            agl::agl_error!("agl::tinygl::ShadowPlane", "Failed to disable shadow plane: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "tinygl_shadow_plane_tests.rs"]
mod tests;
