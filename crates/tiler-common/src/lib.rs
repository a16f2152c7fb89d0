//! Common types and utilities shared across all layer-tiler crates.

pub mod bounds;
pub mod error;
pub mod geo;
pub mod tile;

pub use bounds::{Bounds, BoundsParseError};
pub use error::{TilerError, TilerResult};
pub use geo::{CoordOrder, Point};
pub use tile::{TileCoord, DEFAULT_TILE_SIZE, MAX_ZOOM};
