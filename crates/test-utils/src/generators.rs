//! Synthetic source rasters.
//!
//! These generators create predictable, verifiable pixel patterns that can be
//! used across the test suite.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

/// Creates an image whose pixels encode their own position.
///
/// Each pixel is `[x % 256, y % 256, (x / 256 + y / 256) % 256, 255]`, so a
/// crop can be traced back to the source rectangle it came from.
///
/// # Example
///
/// ```
/// use test_utils::create_coordinate_image;
///
/// let img = create_coordinate_image(300, 10);
/// assert_eq!(img.get_pixel(5, 7).0, [5, 7, 0, 255]);
/// assert_eq!(img.get_pixel(260, 0).0, [4, 0, 1, 255]);
/// ```
pub fn create_coordinate_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x % 256) as u8,
            (y % 256) as u8,
            ((x / 256 + y / 256) % 256) as u8,
            255,
        ])
    })
}

/// Creates a horizontal gradient from transparent black to opaque white.
///
/// Produces many distinct colours, so PNG output uses the RGBA path.
pub fn create_gradient_image(width: u32, height: u32) -> RgbaImage {
    let span = width.saturating_sub(1).max(1) as f32;
    RgbaImage::from_fn(width, height, |x, y| {
        let t = x as f32 / span;
        let v = (t * 255.0).round() as u8;
        Rgba([v, (y % 256) as u8, 255 - v, v])
    })
}

/// Creates a checkerboard of two colours with `cell`-pixel squares.
///
/// Only two distinct colours, so PNG output uses the indexed path.
pub fn create_checkerboard_image(width: u32, height: u32, cell: u32) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    })
}

/// Writes `image` as a PNG file called `name` inside `dir`.
///
/// Panics on failure; intended for test setup only.
pub fn write_test_image(dir: &Path, name: &str, image: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    image
        .save(&path)
        .unwrap_or_else(|e| panic!("failed to write test image {}: {}", path.display(), e));
    path
}
