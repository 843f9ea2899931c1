//! Math shared by every backend
//!
//! Camera matrices, planar shadow projection, bitmap tiling and the
//! fixed-function pipeline state (matrix stack + toggles).

mod camera;
mod shadow_projection;
mod tiling;
mod pipeline_state;

pub use camera::{
    CAMERA_ASPECT,
    frustum, frustum_from_fov, roll_matrix, rotation,
    camera_up_vector, look_at_basis, look_at,
};
pub use shadow_projection::shadow_projection;
pub use tiling::{Tile, TileGrid, DEFAULT_TILE_SIZE, flip_rows_in_place};
pub use pipeline_state::{PipelineState, MAX_MODELVIEW_DEPTH};
