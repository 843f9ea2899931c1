/// Texture trait

use std::any::Any;
use crate::graphics::PixelFormat;

/// Immutable description of an uploaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    /// Format of the source pixels
    pub format: PixelFormat,
    /// Whether any source pixel is translucent
    pub has_alpha: bool,
}

/// A texture that fits one backend texture unit (never tiled).
///
/// Meshes receive textures as `&dyn Texture` and downcast to their own
/// backend's type through `as_any`; a texture from another backend is
/// rejected with `Error::InvalidResource`.
pub trait Texture: Send + Sync {
    fn info(&self) -> &TextureInfo;

    fn as_any(&self) -> &dyn Any;
}
