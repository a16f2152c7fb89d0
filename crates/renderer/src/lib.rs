//! Raster back-end for the tile pyramid.
//!
//! Implements the pixel side of tiling:
//! - Decoding and resampling the source raster
//! - Painting crop windows into fixed-size tiles
//! - PNG (indexed or RGBA) and JPEG encoding
//! - The HTML preview page

pub mod error;
pub mod page;
pub mod png;
pub mod source;
pub mod tile;

pub use error::RasterError;
pub use page::{PageData, PageRenderer};
pub use source::{CropWindow, ImageSource, SourceImage};
pub use tile::{Tile, TileFormat, DEFAULT_JPEG_QUALITY};
