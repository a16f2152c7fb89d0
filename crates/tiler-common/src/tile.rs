//! Tile grid definitions.
//!
//! Every zoom level `z` splits global pixel space into `2^z` square tiles per
//! axis. Tiles keep a constant pixel size, so the world is `2^z * tile_size`
//! pixels wide; with the default 256 px tiles this is `2^(z+8)`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Deepest supported zoom level.
pub const MAX_ZOOM: u32 = 30;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Origin of this tile in global pixel space.
    pub fn pixel_origin(&self, tile_size: u32) -> [f64; 2] {
        [
            self.x as f64 * tile_size as f64,
            self.y as f64 * tile_size as f64,
        ]
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "z={} x={} y={}", self.z, self.x, self.y)
    }
}

/// Number of tiles per axis at a zoom level.
pub fn tiles_count_at_zoom(zoom: u32) -> u64 {
    1u64 << zoom
}

/// Size of global pixel space per axis at a zoom level for 256 px tiles.
pub fn world_size_at_zoom(zoom: u32) -> f64 {
    2f64.powi(zoom as i32 + 8)
}

/// Size of global pixel space per axis for an arbitrary tile size.
pub fn pixels_count_at_zoom(zoom: u32, tile_size: u32) -> f64 {
    tiles_count_at_zoom(zoom) as f64 * tile_size as f64
}
