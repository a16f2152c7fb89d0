//! Source raster and crop windows.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use tracing::{debug, info};

use crate::error::RasterError;
use crate::tile::Tile;

/// Integer source rectangle mapped onto a destination rectangle in a tile.
///
/// All fields are non-negative by construction; a window with any zero
/// dimension paints nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropWindow {
    pub sx: u32,
    pub sy: u32,
    pub sw: u32,
    pub sh: u32,
    pub dx: u32,
    pub dy: u32,
    pub dw: u32,
    pub dh: u32,
}

impl CropWindow {
    /// Window copying a `width`x`height` block unscaled.
    pub fn unscaled(sx: u32, sy: u32, width: u32, height: u32, dx: u32, dy: u32) -> Self {
        Self {
            sx,
            sy,
            sw: width,
            sh: height,
            dx,
            dy,
            dw: width,
            dh: height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sw == 0 || self.sh == 0 || self.dw == 0 || self.dh == 0
    }

    /// True when source and destination sizes match.
    pub fn is_unscaled(&self) -> bool {
        self.sw == self.dw && self.sh == self.dh
    }
}

/// Raster capability the pyramid engine renders from.
pub trait SourceImage {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Sample `window`'s source rectangle into its destination rectangle of
    /// `tile`, compositing over what is already there.
    fn crop_into(&self, tile: &mut Tile, window: &CropWindow) -> Result<(), RasterError>;

    /// Replace the raster with a resampled `width`x`height` copy.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), RasterError>;
}

/// Decoded source raster held as RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pixels: RgbaImage,
}

impl ImageSource {
    /// Decode an image file. The format is guessed from its contents.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RasterError> {
        let path = path.as_ref();
        let decoded = image::io::Reader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| RasterError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .decode()
            .map_err(|e| RasterError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let source = Self::from_image(decoded);
        info!(
            path = %path.display(),
            width = source.width(),
            height = source.height(),
            "Opened source image"
        );
        Ok(source)
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            pixels: image.to_rgba8(),
        }
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl SourceImage for ImageSource {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn crop_into(&self, tile: &mut Tile, window: &CropWindow) -> Result<(), RasterError> {
        if window.is_empty() {
            return Ok(());
        }

        if window.sx >= self.width() || window.sy >= self.height() {
            return Err(RasterError::geometry(format!(
                "crop origin ({}, {}) outside {}x{} source",
                window.sx,
                window.sy,
                self.width(),
                self.height()
            )));
        }

        // Rounding may overshoot the raster edge by a pixel.
        let sw = window.sw.min(self.width() - window.sx);
        let sh = window.sh.min(self.height() - window.sy);

        let patch = imageops::crop_imm(&self.pixels, window.sx, window.sy, sw, sh).to_image();
        let patch = if sw == window.dw && sh == window.dh {
            patch
        } else {
            imageops::resize(&patch, window.dw, window.dh, FilterType::Triangle)
        };

        imageops::overlay(tile.pixels_mut(), &patch, window.dx as i64, window.dy as i64);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::geometry(format!(
                "cannot resize source to {}x{}",
                width, height
            )));
        }
        if (width, height) == self.pixels.dimensions() {
            return Ok(());
        }

        debug!(
            from_width = self.width(),
            from_height = self.height(),
            width,
            height,
            "Resizing source"
        );
        self.pixels = imageops::resize(&self.pixels, width, height, FilterType::Triangle);
        Ok(())
    }
}
