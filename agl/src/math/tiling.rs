/// Tiling of oversized bitmaps into fixed-size texture units, and the
/// vertical flip applied to depth images for bottom-up raster writes.

use crate::graphics::Rect;

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// One tile of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Row-major index
    pub index: usize,
    pub column: u32,
    pub row: u32,
    /// Pixels of the source image held by this tile (clamped at the right/bottom edge)
    pub rect: Rect,
}

/// Grid of `tile_size` squares covering a `width x height` image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: u32,
    columns: u32,
    rows: u32,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        debug_assert!(tile_size > 0, "tile size must be positive");
        let tile_size = tile_size.max(1);
        Self {
            width,
            height,
            tile_size,
            columns: width.div_ceil(tile_size),
            rows: height.div_ceil(tile_size),
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// `ceil(width / tile) * ceil(height / tile)`
    pub fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| {
                let x = column * self.tile_size;
                let y = row * self.tile_size;
                Tile {
                    index: (row * self.columns + column) as usize,
                    column,
                    row,
                    rect: Rect::new(
                        x as i32,
                        y as i32,
                        self.tile_size.min(self.width - x) as i32,
                        self.tile_size.min(self.height - y) as i32,
                    ),
                }
            })
        })
    }
}

/// Swap row `y` with row `height - 1 - y` for every `y < height / 2`.
///
/// Applying it twice restores the original buffer.
pub fn flip_rows_in_place<T>(data: &mut [T], width: usize, height: usize) {
    debug_assert!(data.len() >= width * height);
    for y in 0..height / 2 {
        let (top, bottom) = data.split_at_mut((height - 1 - y) * width);
        top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
    }
}

#[cfg(test)]
#[path = "tiling_tests.rs"]
mod tests;
