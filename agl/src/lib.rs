/*!
# AGL - Abstract Graphics Layer

Renderer-agnostic drawing, camera, lighting and shadow API for a 3D game
engine, realized by interchangeable fixed-function backends.

Backends live in their own crates and register themselves by name in the
plugin registry; the [`agl::Manager`] selects one at startup.

## Architecture

- **Renderer**: pipeline-state owner (matrix stack, lighting) and resource factory
- **Target**: the active framebuffer (clear, store/restore, dim, screenshot)
- **Bitmap2D / Texture / Mesh / Light / Primitive / ShadowPlane / Font / Label**:
  resource traits with one concrete type per backend
- **Manager**: process-wide owner of the active renderer and target
*/

// Internal modules
mod error;
mod manager;
mod utils;
pub mod log;
pub mod graphics;
pub mod math;
pub mod renderer;

// Main agl namespace module
pub mod agl {
    // Error types
    pub use crate::error::{Error, Result};

    // Manager singleton
    pub use crate::manager::Manager;

    // Renderer factory trait
    pub use crate::renderer::Renderer;

    // Logging sub-module (types only, macros are exported at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with the backend contract
    pub mod render {
        pub use crate::renderer::*;
    }

    // Pixel buffers and external collaborators
    pub mod graphics {
        pub use crate::graphics::*;
    }

    // Camera / shadow / tiling math and pipeline state
    pub mod math {
        pub use crate::math::*;
    }

    // Shared helpers for backends
    pub mod utils {
        pub use crate::utils::SlotAllocator;
    }
}

// Re-export math library at crate root
pub use glam;
