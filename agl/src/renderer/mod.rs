/// Renderer module - the backend contract and every resource trait

pub mod renderer;
pub mod target;
pub mod bitmap2d;
pub mod texture;
pub mod mesh;
pub mod light;
pub mod primitive;
pub mod shadow_plane;
pub mod font;

#[cfg(test)]
pub mod mock_renderer;

pub use renderer::*;
pub use target::*;
pub use bitmap2d::*;
pub use texture::*;
pub use mesh::*;
pub use light::*;
pub use primitive::*;
pub use shadow_plane::*;
pub use font::*;
