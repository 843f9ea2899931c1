/// Mesh - OpenGL implementation of the Mesh trait

use agl::agl::{Error, Result};
use agl::agl::graphics::Rect;
use agl::agl::render::{Mesh, MeshData, Texture};
use crate::opengl_api::{BeginMode, Capability};
use crate::opengl_context::{lock, SharedGlContext};
use crate::opengl_texture::GlTexture;

pub struct GlMesh {
    context: SharedGlContext,
    data: MeshData,
}

impl GlMesh {
    pub(crate) fn new(context: SharedGlContext) -> Self {
        Self { context, data: MeshData::new() }
    }
}

impl Mesh for GlMesh {
    fn data(&self) -> &MeshData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut MeshData {
        &mut self.data
    }

    fn draw(&self, texture: Option<&dyn Texture>) -> Result<()> {
        let texture = match texture {
            Some(t) => Some(t.as_any().downcast_ref::<GlTexture>().ok_or_else(|| {
                Error::InvalidResource("texture was not created by the OpenGL renderer".to_string())
            })?),
            None => None,
        };

        let mut guard = lock(&self.context)?;
        let mut ctx = guard.capability_scope(&[Capability::Texture2D]);
        match texture {
            Some(texture) => {
                ctx.gl.enable(Capability::Texture2D);
                ctx.gl.bind_texture(texture.id());
            }
            None => ctx.gl.disable(Capability::Texture2D),
        }

        for face in self.data.drawable_faces() {
            ctx.gl.begin(BeginMode::Polygon);
            for (i, &index) in face.vertices().iter().enumerate() {
                let normal = face.normal_at(i).map_or(face.normal(), |k| self.data.vertex_normal(k));
                ctx.gl.normal(normal);
                if let Some(k) = face.tex_vertex_at(i) {
                    ctx.gl.tex_coord(self.data.tex_vertex(k));
                }
                ctx.gl.vertex3(self.data.vertex(index));
            }
            ctx.gl.end();
        }
        Ok(())
    }

    fn screen_bounding_box(&self) -> Result<Option<Rect>> {
        let ctx = lock(&self.context)?;
        Ok(self.data.screen_bounding_box(&ctx.pipeline))
    }
}

#[cfg(test)]
#[path = "opengl_mesh_tests.rs"]
mod tests;
