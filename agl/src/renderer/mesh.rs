/// Mesh geometry storage and the Mesh trait
///
/// `MeshData` owns the flat position / texture-coordinate / normal arrays.
/// Faces live in a slot map and only hold indices into those arrays, checked
/// against the array lengths every time the mesh is drawn.

use glam::{Vec2, Vec3};
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::graphics::Rect;
use crate::math::PipelineState;
use super::Texture;

new_key_type! {
    /// Stable handle to a face of one mesh
    pub struct MeshFaceKey;
}

/// One polygon of a mesh, as index lists into the parent arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshFace {
    normal: Vec3,
    vertices: Vec<u32>,
    tex_vertices: Vec<u32>,
    normals: Vec<u32>,
}

impl MeshFace {
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn set_normal(&mut self, normal: Vec3) {
        self.normal = normal;
    }

    pub fn add_vertex(&mut self, index: u32) {
        self.vertices.push(index);
    }

    pub fn add_tex_vertex(&mut self, index: u32) {
        self.tex_vertices.push(index);
    }

    pub fn add_normal(&mut self, index: u32) {
        self.normals.push(index);
    }

    pub fn vertices(&self) -> &[u32] {
        &self.vertices
    }

    pub fn tex_vertices(&self) -> &[u32] {
        &self.tex_vertices
    }

    pub fn normals(&self) -> &[u32] {
        &self.normals
    }

    /// Number of corners
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Texture coordinate index of corner `i`, when every corner has one
    pub fn tex_vertex_at(&self, i: usize) -> Option<u32> {
        if self.tex_vertices.len() == self.vertices.len() {
            self.tex_vertices.get(i).copied()
        } else {
            None
        }
    }

    /// Normal index of corner `i`, when every corner has one
    pub fn normal_at(&self, i: usize) -> Option<u32> {
        if self.normals.len() == self.vertices.len() {
            self.normals.get(i).copied()
        } else {
            None
        }
    }

    /// Whether every index is inside the parent arrays.
    pub fn is_valid_for(&self, mesh: &MeshData) -> bool {
        self.vertices.iter().all(|&i| i < mesh.vertex_count())
            && self.tex_vertices.iter().all(|&i| i < mesh.tex_vertex_count())
            && self.normals.iter().all(|&i| i < mesh.normal_count())
    }
}

/// Vertex storage of a mesh plus its faces.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    vertices: Vec<f32>,
    tex_vertices: Vec<f32>,
    normals: Vec<f32>,
    faces: SlotMap<MeshFaceKey, MeshFace>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== VERTEX ARRAYS =====

    /// Append a position, returning its index.
    pub fn add_vertex(&mut self, v: Vec3) -> u32 {
        self.vertices.extend_from_slice(&v.to_array());
        self.vertex_count() - 1
    }

    /// Append a texture coordinate, returning its index.
    pub fn add_tex_vertex(&mut self, uv: Vec2) -> u32 {
        self.tex_vertices.extend_from_slice(&uv.to_array());
        self.tex_vertex_count() - 1
    }

    /// Append a vertex normal, returning its index.
    pub fn add_normal(&mut self, n: Vec3) -> u32 {
        self.normals.extend_from_slice(&n.to_array());
        self.normal_count() - 1
    }

    pub fn vertex_count(&self) -> u32 {
        (self.vertices.len() / 3) as u32
    }

    pub fn tex_vertex_count(&self) -> u32 {
        (self.tex_vertices.len() / 2) as u32
    }

    pub fn normal_count(&self) -> u32 {
        (self.normals.len() / 3) as u32
    }

    pub fn vertex(&self, index: u32) -> Vec3 {
        Vec3::from_slice(&self.vertices[index as usize * 3..])
    }

    pub fn tex_vertex(&self, index: u32) -> Vec2 {
        Vec2::from_slice(&self.tex_vertices[index as usize * 2..])
    }

    pub fn vertex_normal(&self, index: u32) -> Vec3 {
        Vec3::from_slice(&self.normals[index as usize * 3..])
    }

    /// Flat position floats, 3 per vertex
    pub fn raw_vertices(&self) -> &[f32] {
        &self.vertices
    }

    // ===== FACES =====

    pub fn add_face(&mut self, face: MeshFace) -> MeshFaceKey {
        self.faces.insert(face)
    }

    pub fn remove_face(&mut self, key: MeshFaceKey) -> Option<MeshFace> {
        self.faces.remove(key)
    }

    pub fn face(&self, key: MeshFaceKey) -> Option<&MeshFace> {
        self.faces.get(key)
    }

    pub fn face_mut(&mut self, key: MeshFaceKey) -> Option<&mut MeshFace> {
        self.faces.get_mut(key)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn faces(&self) -> impl Iterator<Item = (MeshFaceKey, &MeshFace)> {
        self.faces.iter()
    }

    /// Faces whose indices are all in range.
    ///
    /// An out-of-range index is a programming error: it asserts in debug
    /// builds, and the face is logged and skipped in release builds.
    pub fn drawable_faces(&self) -> impl Iterator<Item = &MeshFace> {
        self.faces.values().filter(move |face| {
            let valid = face.is_valid_for(self);
            if !valid {
                crate::agl_error!(
                    "agl::Mesh",
                    "Skipping face with out-of-range index ({} vertices, {} tex vertices, {} normals)",
                    self.vertex_count(), self.tex_vertex_count(), self.normal_count()
                );
                debug_assert!(valid, "mesh face index out of range");
            }
            valid
        })
    }

    /// Screen rectangle covering every face corner in front of the eye,
    /// clamped to the viewport. `None` when nothing lands on screen.
    pub fn screen_bounding_box(&self, state: &PipelineState) -> Option<Rect> {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        let mut any = false;

        for face in self.drawable_faces() {
            for &index in face.vertices() {
                if let Some(p) = state.project(self.vertex(index)) {
                    min = min.min(p.truncate());
                    max = max.max(p.truncate());
                    any = true;
                }
            }
        }

        if !any {
            return None;
        }
        // Corners close to the eye plane project arbitrarily far out
        let vp = state.viewport();
        let lo = Vec2::new(vp.x as f32, vp.y as f32);
        let hi = Vec2::new(vp.right() as f32, vp.bottom() as f32);
        let min = min.floor().clamp(lo, hi);
        let max = max.ceil().clamp(lo, hi);
        let rect = Rect::new(
            min.x as i32,
            min.y as i32,
            (max.x - min.x) as i32,
            (max.y - min.y) as i32,
        );
        if rect.is_empty() { None } else { Some(rect) }
    }
}

/// Mesh resource.
///
/// The engine fills `data_mut()` with vertices and faces, then draws the
/// whole mesh every frame with the current model-view matrix.
pub trait Mesh: Send {
    fn data(&self) -> &MeshData;

    fn data_mut(&mut self) -> &mut MeshData;

    /// Draw every face, optionally textured.
    fn draw(&self, texture: Option<&dyn Texture>) -> Result<()>;

    /// Screen rectangle the mesh covers under the current matrices.
    fn screen_bounding_box(&self) -> Result<Option<Rect>>;
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
