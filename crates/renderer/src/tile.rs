//! Output tiles.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::RasterError;
use crate::png;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Encoded file format of output tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

impl TileFormat {
    /// File extension, also used in preview page tile URLs.
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileFormat::Png => write!(f, "png"),
            TileFormat::Jpeg => write!(f, "jpeg"),
        }
    }
}

impl FromStr for TileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(TileFormat::Png),
            "jpeg" | "jpg" => Ok(TileFormat::Jpeg),
            _ => Err(format!("unknown tile type '{}', expected 'png' or 'jpeg'", s)),
        }
    }
}

/// Square, initially transparent RGBA tile.
#[derive(Debug, Clone)]
pub struct Tile {
    pixels: RgbaImage,
}

impl Tile {
    pub fn new(size: u32) -> Self {
        Self {
            pixels: RgbaImage::new(size, size),
        }
    }

    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// True if nothing has been painted.
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 0)
    }

    /// Encode the tile. `quality` only applies to JPEG.
    pub fn encode(&self, format: TileFormat, quality: u8) -> Result<Vec<u8>, RasterError> {
        let (width, height) = self.pixels.dimensions();
        match format {
            TileFormat::Png => png::encode(self.pixels.as_raw(), width, height).map(|p| p.bytes),
            TileFormat::Jpeg => {
                let rgb = flatten_alpha(&self.pixels);
                let mut bytes = Vec::new();
                JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
                    .encode(&rgb, width, height, ColorType::Rgb8)
                    .map_err(RasterError::encode)?;
                Ok(bytes)
            }
        }
    }

    /// Encode and write the tile to `path`, replacing any existing file.
    pub fn save(&self, path: &Path, format: TileFormat, quality: u8) -> Result<(), RasterError> {
        let bytes = self.encode(format, quality)?;
        fs::write(path, &bytes).map_err(|source| RasterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        trace!(path = %path.display(), bytes = bytes.len(), "Wrote tile");
        Ok(())
    }
}

/// Composite RGBA over opaque black, dropping the alpha channel.
fn flatten_alpha(pixels: &RgbaImage) -> Vec<u8> {
    pixels
        .pixels()
        .flat_map(|p| {
            let [r, g, b, a] = p.0;
            let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
            [scale(r), scale(g), scale(b)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tile_is_transparent() {
        let tile = Tile::new(8);
        assert_eq!(tile.size(), 8);
        assert!(tile.is_blank());
    }

    #[test]
    fn test_format_parse_and_extension() {
        assert_eq!("jpg".parse::<TileFormat>().unwrap(), TileFormat::Jpeg);
        assert_eq!("PNG".parse::<TileFormat>().unwrap(), TileFormat::Png);
        assert!("gif".parse::<TileFormat>().is_err());
        assert_eq!(TileFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn test_flatten_alpha() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([200, 100, 50, 255]));
        img.put_pixel(1, 0, image::Rgba([200, 100, 50, 0]));
        assert_eq!(flatten_alpha(&img), vec![200, 100, 50, 0, 0, 0]);
    }

    #[test]
    fn test_encode_jpeg_signature() {
        let bytes = Tile::new(16).encode(TileFormat::Jpeg, 80).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }
}
