//! Tests for tile PNG encoding.
//!
//! Covers mode selection (indexed vs RGBA), transparency handling and that
//! encoded bytes decode back to the original pixels.

use image::RgbaImage;
use renderer::png::{encode, encode_rgba, ColorMode};
use std::collections::HashSet;
use test_utils::{create_checkerboard_image, create_coordinate_image, create_gradient_image};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

// ============================================================================
// Helper functions
// ============================================================================

fn decode(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .expect("encoded PNG should decode")
        .to_rgba8()
}

/// Count unique colors, folding fully transparent pixels together
fn count_unique_colors(pixels: &[u8]) -> usize {
    let mut unique: HashSet<[u8; 4]> = HashSet::new();
    for px in pixels.chunks_exact(4) {
        if px[3] == 0 {
            unique.insert([0, 0, 0, 0]);
        } else {
            unique.insert([px[0], px[1], px[2], px[3]]);
        }
    }
    unique.len()
}

/// Tile-like content: opaque checkerboard in the middle, transparent margin
fn margin_tile(size: u32, inner: u32) -> RgbaImage {
    let board = create_checkerboard_image(inner, inner, 8);
    let mut tile = RgbaImage::new(size, size);
    let offset = ((size - inner) / 2) as i64;
    image::imageops::overlay(&mut tile, &board, offset, offset);
    tile
}

// ============================================================================
// Basic PNG creation tests
// ============================================================================

#[test]
fn test_encode_simple() {
    let pixels = [
        255, 0, 0, 255, // red
        0, 255, 0, 255, // green
        0, 255, 0, 255, // green
        255, 0, 0, 255, // red
    ];

    let png = encode(&pixels, 2, 2).unwrap();
    assert_eq!(&png.bytes[0..8], &SIGNATURE);
    assert_eq!(png.mode, ColorMode::Indexed);
    assert_eq!(decode(&png.bytes).as_raw().as_slice(), &pixels);
}

#[test]
fn test_encode_rgba_round_trip() {
    let img = create_gradient_image(300, 4);
    let bytes = encode_rgba(img.as_raw(), 300, 4).unwrap();

    assert_eq!(&bytes[0..8], &SIGNATURE);
    assert_eq!(decode(&bytes), img);
}

#[test]
fn test_encode_with_transparency() {
    let pixels = [
        255, 0, 0, 255, // red, opaque
        0, 0, 0, 0, // transparent
        0, 255, 0, 128, // green, semi-transparent
        0, 0, 255, 255, // blue, opaque
    ];

    let png = encode(&pixels, 2, 2).unwrap();
    assert_eq!(png.mode, ColorMode::Indexed);

    let decoded = decode(&png.bytes);
    assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 0, 0]);
    assert_eq!(decoded.get_pixel(0, 1).0, [0, 255, 0, 128]);
}

// ============================================================================
// Format selection tests
// ============================================================================

#[test]
fn test_rgba_fallback_many_colors() {
    let img = create_coordinate_image(300, 1);
    assert!(count_unique_colors(img.as_raw()) > 256);

    let png = encode(img.as_raw(), 300, 1).unwrap();
    assert_eq!(png.mode, ColorMode::Rgba);
    assert_eq!(decode(&png.bytes), img);
}

#[test]
fn test_exactly_256_colors_is_indexed() {
    let mut pixels = Vec::with_capacity(256 * 4);
    for i in 0..256 {
        let v = i as u8;
        pixels.extend_from_slice(&[v, v, v, 255]);
    }

    let png = encode(&pixels, 256, 1).unwrap();
    assert_eq!(png.mode, ColorMode::Indexed);
}

#[test]
fn test_257_colors_is_rgba() {
    let mut pixels = Vec::with_capacity(257 * 4);
    for i in 0..256 {
        let v = i as u8;
        pixels.extend_from_slice(&[v, v, v, 255]);
    }
    pixels.extend_from_slice(&[128, 0, 0, 255]);

    let png = encode(&pixels, 257, 1).unwrap();
    assert_eq!(png.mode, ColorMode::Rgba);
}

#[test]
fn test_invisible_noise_still_indexed() {
    // Transparent pixels with varying RGB, as left behind by resampling
    let mut img = create_coordinate_image(64, 64);
    for px in img.pixels_mut() {
        px.0[3] = 0;
    }

    let png = encode(img.as_raw(), 64, 64).unwrap();
    assert_eq!(png.mode, ColorMode::Indexed);
    assert!(decode(&png.bytes).pixels().all(|p| p.0[3] == 0));
}

// ============================================================================
// Tile-sized tests (parallel palette extraction)
// ============================================================================

#[test]
fn test_margin_tile_256() {
    let tile = margin_tile(256, 100);
    assert_eq!(count_unique_colors(tile.as_raw()), 3);

    let png = encode(tile.as_raw(), 256, 256).unwrap();
    assert_eq!(png.mode, ColorMode::Indexed);
    assert_eq!(decode(&png.bytes), tile);

    let rgba = encode_rgba(tile.as_raw(), 256, 256).unwrap();
    assert!(
        png.bytes.len() <= rgba.len(),
        "Indexed PNG ({} bytes) should not exceed RGBA ({} bytes)",
        png.bytes.len(),
        rgba.len()
    );
}

#[test]
fn test_margin_tile_512() {
    let tile = margin_tile(512, 300);
    let png = encode(tile.as_raw(), 512, 512).unwrap();
    assert_eq!(png.mode, ColorMode::Indexed);
    assert_eq!(decode(&png.bytes), tile);
}

// ============================================================================
// Edge case tests
// ============================================================================

#[test]
fn test_single_pixel() {
    let png = encode(&[255, 0, 0, 255], 1, 1).unwrap();
    assert_eq!(decode(&png.bytes).get_pixel(0, 0).0, [255, 0, 0, 255]);
}

#[test]
fn test_single_color_image_is_small() {
    let pixels: Vec<u8> = [128, 64, 32, 255].repeat(100 * 100);
    let png = encode(&pixels, 100, 100).unwrap();
    assert!(png.bytes.len() < 1000, "Single color 100x100 should be very small");
}

#[test]
fn test_all_transparent() {
    let pixels = vec![0u8; 10 * 10 * 4];
    let png = encode(&pixels, 10, 10).unwrap();
    assert_eq!(png.mode, ColorMode::Indexed);
}
