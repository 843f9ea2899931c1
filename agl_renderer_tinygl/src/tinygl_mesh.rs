/// Mesh - TinyGL implementation of the Mesh trait

use glam::{Mat3, Vec2, Vec4};
use agl::agl::{Error, Result};
use agl::agl::graphics::Rect;
use agl::agl::render::{Mesh, MeshData, Texture};
use crate::tinygl_context::{lock, EyeLight, SharedContext};
use crate::tinygl_light::shade;
use crate::tinygl_raster::{clip_near, fill_triangle, to_screen, ClipVertex, FragmentSink, ScreenVertex};
use crate::tinygl_texture::TglTexture;

pub struct TglMesh {
    context: SharedContext,
    data: MeshData,
}

impl TglMesh {
    pub(crate) fn new(context: SharedContext) -> Self {
        Self { context, data: MeshData::new() }
    }
}

impl Mesh for TglMesh {
    fn data(&self) -> &MeshData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut MeshData {
        &mut self.data
    }

    fn draw(&self, texture: Option<&dyn Texture>) -> Result<()> {
        let texture = match texture {
            Some(t) => Some(t.as_any().downcast_ref::<TglTexture>().ok_or_else(|| {
                Error::InvalidResource("texture was not created by the TinyGL renderer".to_string())
            })?),
            None => None,
        };
        let image = texture.map(|t| &t.image);

        let mut guard = lock(&self.context)?;
        let pipeline = guard.pipeline.clone();
        let modelview = pipeline.modelview();
        let normal_matrix = Mat3::from_mat4(modelview).inverse().transpose();
        let mvp = pipeline.mvp();
        let lights: Vec<EyeLight> = if pipeline.lighting() {
            guard.active_lights().copied().collect()
        } else {
            Vec::new()
        };

        let mut sink = FragmentSink::new(&mut guard);
        for face in self.data.drawable_faces() {
            if face.len() < 3 {
                continue;
            }

            let corners: Vec<ClipVertex> = face
                .vertices()
                .iter()
                .enumerate()
                .map(|(i, &index)| {
                    let p = self.data.vertex(index);
                    let color = if pipeline.lighting() {
                        let n = face.normal_at(i).map_or(face.normal(), |k| self.data.vertex_normal(k));
                        shade(&lights, modelview.transform_point3(p), (normal_matrix * n).normalize_or_zero())
                    } else {
                        Vec4::ONE
                    };
                    let uv = face.tex_vertex_at(i).map_or(Vec2::ZERO, |k| self.data.tex_vertex(k));
                    ClipVertex { clip: mvp * p.extend(1.0), color, uv }
                })
                .collect();

            let screen: Vec<ScreenVertex> = clip_near(&corners)
                .iter()
                .filter_map(|v| to_screen(v, &pipeline))
                .collect();
            for i in 1..screen.len().saturating_sub(1) {
                fill_triangle(&mut sink, [screen[0], screen[i], screen[i + 1]], image);
            }
        }
        Ok(())
    }

    fn screen_bounding_box(&self) -> Result<Option<Rect>> {
        let ctx = lock(&self.context)?;
        Ok(self.data.screen_bounding_box(&ctx.pipeline))
    }
}

#[cfg(test)]
#[path = "tinygl_mesh_tests.rs"]
mod tests;
