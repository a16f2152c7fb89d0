//! PNG encoding for tile buffers.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: used when the tile has ≤256 distinct
//!   colours, which is typical for tiles that are mostly transparent margin
//!   or cut from maps with flat fills.
//! - **RGBA PNG (color type 6)**: fallback for photographic content.
//!
//! Fully transparent pixels are folded into a single palette entry, since
//! resampling leaves many invisible pixels with different RGB values.

use std::collections::HashMap;
use std::io::Write;

use rayon::prelude::*;

use crate::error::RasterError;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Which PNG color type an encoded tile ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Indexed,
    Rgba,
}

/// Encoded PNG bytes together with the chosen color mode.
#[derive(Debug, Clone)]
pub struct EncodedPng {
    pub mode: ColorMode,
    pub bytes: Vec<u8>,
}

/// Encode RGBA pixels, choosing indexed mode whenever a palette fits.
pub fn encode(pixels: &[u8], width: u32, height: u32) -> Result<EncodedPng, RasterError> {
    check_dimensions(pixels, width, height)?;

    match Palette::extract(pixels) {
        Some(palette) => Ok(EncodedPng {
            mode: ColorMode::Indexed,
            bytes: encode_indexed(&palette, width, height)?,
        }),
        None => Ok(EncodedPng {
            mode: ColorMode::Rgba,
            bytes: encode_rgba(pixels, width, height)?,
        }),
    }
}

fn check_dimensions(pixels: &[u8], width: u32, height: u32) -> Result<(), RasterError> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(RasterError::geometry(format!(
            "{}x{} RGBA buffer needs {} bytes, got {}",
            width,
            height,
            expected,
            pixels.len()
        )));
    }
    Ok(())
}

/// Pack RGBA bytes into a u32, mapping every fully transparent pixel to 0.
#[inline(always)]
fn pack_color(px: &[u8]) -> u32 {
    if px[3] == 0 {
        return 0;
    }
    (px[0] as u32) | ((px[1] as u32) << 8) | ((px[2] as u32) << 16) | ((px[3] as u32) << 24)
}

#[inline(always)]
fn unpack_color(packed: u32) -> [u8; 4] {
    packed.to_le_bytes()
}

/// Colour table plus one palette index per pixel.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
    indices: Vec<u8>,
}

impl Palette {
    /// Build a palette for `pixels`, or `None` when there are more than 256
    /// distinct colours.
    pub fn extract(pixels: &[u8]) -> Option<Self> {
        if pixels.len() / 4 >= PARALLEL_THRESHOLD {
            Self::extract_parallel(pixels)
        } else {
            Self::extract_sequential(pixels)
        }
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    fn has_transparency(&self) -> bool {
        self.colors.iter().any(|c| c[3] < 255)
    }

    fn extract_sequential(pixels: &[u8]) -> Option<Self> {
        let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
        let mut colors = Vec::with_capacity(MAX_PALETTE_SIZE);
        let mut indices = Vec::with_capacity(pixels.len() / 4);

        for px in pixels.chunks_exact(4) {
            let packed = pack_color(px);
            let index = match color_to_index.get(&packed) {
                Some(&idx) => idx,
                None => {
                    if colors.len() >= MAX_PALETTE_SIZE {
                        return None;
                    }
                    let idx = colors.len() as u8;
                    colors.push(unpack_color(packed));
                    color_to_index.insert(packed, idx);
                    idx
                }
            };
            indices.push(index);
        }

        Some(Self { colors, indices })
    }

    /// Two parallel passes: collect per-chunk colour sets, then map pixels to
    /// indices once the merged palette is known to fit.
    fn extract_parallel(pixels: &[u8]) -> Option<Self> {
        let chunk_size = (pixels.len() / 4 / rayon::current_num_threads()).max(256) * 4;

        let local_sets: Vec<Vec<u32>> = pixels
            .par_chunks(chunk_size)
            .map(|chunk| {
                let mut local: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
                for px in chunk.chunks_exact(4) {
                    local.insert(pack_color(px), ());
                    // Already too many for the whole image.
                    if local.len() > MAX_PALETTE_SIZE {
                        break;
                    }
                }
                let mut colors: Vec<u32> = local.into_keys().collect();
                colors.sort_unstable();
                colors
            })
            .collect();

        let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
        let mut colors = Vec::with_capacity(MAX_PALETTE_SIZE);
        for packed in local_sets.into_iter().flatten() {
            if color_to_index.contains_key(&packed) {
                continue;
            }
            if colors.len() >= MAX_PALETTE_SIZE {
                return None;
            }
            color_to_index.insert(packed, colors.len() as u8);
            colors.push(unpack_color(packed));
        }

        let indices = pixels
            .par_chunks_exact(4)
            .map(|px| color_to_index.get(&pack_color(px)).copied().unwrap_or(0))
            .collect();

        Some(Self { colors, indices })
    }
}

/// Encode an indexed PNG (color type 3).
pub fn encode_indexed(palette: &Palette, width: u32, height: u32) -> Result<Vec<u8>, RasterError> {
    if palette.indices.len() != width as usize * height as usize {
        return Err(RasterError::geometry(format!(
            "{}x{} indexed image needs {} indices, got {}",
            width,
            height,
            width as usize * height as usize,
            palette.indices.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    let plte: Vec<u8> = palette.colors.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    // tRNS carries one alpha per palette entry, only when needed
    if palette.has_transparency() {
        let trns: Vec<u8> = palette.colors.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(&palette.indices, width as usize, height as usize)
        .map_err(|e| RasterError::encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode an RGBA PNG (color type 6).
pub fn encode_rgba(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RasterError> {
    check_dimensions(pixels, width, height)?;

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));

    let idat = deflate_scanlines(pixels, width as usize * 4, height as usize)
        .map_err(|e| RasterError::encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn ihdr(width: u32, height: u32, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    data
}

/// Prefix each row with filter byte 0 and zlib-compress the result.
fn deflate_scanlines(data: &[u8], row_bytes: usize, rows: usize) -> std::io::Result<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(rows * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes.max(1)).take(rows) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
