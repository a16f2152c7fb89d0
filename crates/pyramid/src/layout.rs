//! Tile enumeration and crop geometry.
//!
//! A layout answers three questions for every zoom level: which tiles to
//! write, which part of the source goes where in each tile, and what size
//! the source should be resampled to before the zoom is rendered. All
//! answers depend only on the layout, the zoom and the current source size,
//! so repeated runs produce identical geometry.

use std::fmt;

use projection::bounds::to_global_pixel_bounds;
use projection::Projection;
use renderer::CropWindow;
use tiler_common::tile::{pixels_count_at_zoom, tiles_count_at_zoom, world_size_at_zoom};
use tiler_common::{Bounds, TileCoord, MAX_ZOOM};

pub trait TileLayout: fmt::Debug + Send {
    /// Highest zoom at which the source is shown at native resolution.
    fn auto_max_zoom(&self, width: u32, height: u32) -> u32;

    /// Tiles covered by a `width`x`height` source at `zoom`, column-major.
    fn tiles_at_zoom(&self, zoom: u32, width: u32, height: u32) -> Vec<TileCoord>;

    /// Source-to-tile windows for one tile. Empty windows are never returned.
    fn crop_windows(&self, tile: TileCoord, width: u32, height: u32) -> Vec<CropWindow>;

    /// New source size before rendering `zoom`, if it has to shrink.
    fn resize_for_zoom(&self, zoom: u32, width: u32, height: u32) -> Option<(u32, u32)>;
}

/// Smallest zoom with at least `tiles` tiles per axis.
fn zoom_for_tiles(tiles: u64) -> u32 {
    (0..MAX_ZOOM)
        .find(|&zoom| tiles_count_at_zoom(zoom) >= tiles)
        .unwrap_or(MAX_ZOOM)
}

fn ceil_div(value: u32, divisor: u32) -> u64 {
    (value as u64 + divisor as u64 - 1) / divisor as u64
}

/// Source without geographic bounds, centred in the world at its native
/// resolution.
#[derive(Debug, Clone, Copy)]
pub struct CenteredLayout {
    tile_size: u32,
}

impl CenteredLayout {
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    /// Tile index range `[start, end)` along one axis.
    fn tile_range(&self, zoom: u32, extent: u32) -> (u64, u64) {
        let tiles = tiles_count_at_zoom(zoom) as f64;
        let covered = (extent as f64 / self.tile_size as f64 / 2.0).ceil() * 2.0;
        let offset = (tiles - covered) / 2.0;
        let start = offset.ceil().max(0.0);
        let end = (covered + offset).ceil().min(tiles);
        (start as u64, end.max(start) as u64)
    }

    /// Source interval and destination offset along one axis.
    fn axis_window(&self, zoom: u32, index: u32, extent: u32) -> Option<(u32, u32, u32)> {
        let ts = self.tile_size as i64;
        let world = pixels_count_at_zoom(zoom, self.tile_size) as i64;
        let extent = extent as i64;
        let offset = (world - extent + 1).div_euclid(2);
        let tile_start = index as i64 * ts;

        let lo = (tile_start - offset).clamp(0, extent);
        let hi = (tile_start + ts - offset).clamp(0, extent);
        if hi <= lo {
            return None;
        }
        let dest = (offset - tile_start).clamp(0, ts);
        Some((lo as u32, (hi - lo) as u32, dest as u32))
    }
}

impl TileLayout for CenteredLayout {
    fn auto_max_zoom(&self, width: u32, height: u32) -> u32 {
        let tiles = ceil_div(width, self.tile_size).max(ceil_div(height, self.tile_size));
        zoom_for_tiles(tiles)
    }

    fn tiles_at_zoom(&self, zoom: u32, width: u32, height: u32) -> Vec<TileCoord> {
        let (x0, x1) = self.tile_range(zoom, width);
        let (y0, y1) = self.tile_range(zoom, height);
        (x0..x1)
            .flat_map(|x| (y0..y1).map(move |y| TileCoord::new(zoom, x as u32, y as u32)))
            .collect()
    }

    fn crop_windows(&self, tile: TileCoord, width: u32, height: u32) -> Vec<CropWindow> {
        let x = self.axis_window(tile.z, tile.x, width);
        let y = self.axis_window(tile.z, tile.y, height);
        match (x, y) {
            (Some((sx, w, dx)), Some((sy, h, dy))) => vec![CropWindow::unscaled(sx, sy, w, h, dx, dy)],
            _ => Vec::new(),
        }
    }

    fn resize_for_zoom(&self, zoom: u32, width: u32, height: u32) -> Option<(u32, u32)> {
        let target = pixels_count_at_zoom(zoom, self.tile_size);
        let longer = width.max(height) as f64;
        if longer <= target {
            return None;
        }
        let shrink = |side: u32| ((side as f64 * target / longer).round() as u32).max(1);
        let size = if width >= height {
            (target as u32, shrink(height))
        } else {
            (shrink(width), target as u32)
        };
        Some(size)
    }
}

/// Source pinned to geographic bounds through a projection.
#[derive(Debug)]
pub struct BoundedLayout {
    bounds: Bounds,
    projection: Box<dyn Projection>,
    tile_size: u32,
}

/// One placement of the source along an axis.
#[derive(Debug, Clone, Copy)]
struct AxisSpan {
    src: u32,
    src_len: u32,
    dest: u32,
    dest_len: u32,
}

impl BoundedLayout {
    pub fn new(bounds: Bounds, projection: Box<dyn Projection>, tile_size: u32) -> Self {
        Self {
            bounds,
            projection,
            tile_size,
        }
    }

    pub fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Source extent in tile pixels at `zoom`. May extend past the world on
    /// cyclic axes.
    pub fn extent_at_zoom(&self, zoom: u32) -> Bounds {
        let pixels = to_global_pixel_bounds(&self.bounds, self.projection.as_ref(), zoom);
        let k = self.tile_size as f64 / tiler_common::DEFAULT_TILE_SIZE as f64;
        Bounds::new(
            [pixels.lower()[0] * k, pixels.lower()[1] * k],
            [pixels.upper()[0] * k, pixels.upper()[1] * k],
        )
    }

    /// Width and height of the source in tile pixels at `zoom`.
    pub fn size_at_zoom(&self, zoom: u32) -> [f64; 2] {
        let extent = self.extent_at_zoom(zoom);
        [extent.span(0), extent.span(1)]
    }

    fn axis_indices(&self, zoom: u32, lo: f64, hi: f64, cycled: bool) -> Vec<u32> {
        let ts = self.tile_size as f64;
        let tiles = tiles_count_at_zoom(zoom) as i64;
        let start = (lo / ts).floor() as i64;
        let end = start.max((hi / ts).ceil() as i64 - 1);

        if cycled {
            if end - start + 1 >= tiles {
                return (0..tiles).map(|i| i as u32).collect();
            }
            (start..=end).map(|i| i.rem_euclid(tiles) as u32).collect()
        } else {
            (start.max(0)..=end.min(tiles - 1)).map(|i| i as u32).collect()
        }
    }

    /// Placements of the source along one axis of a tile. A cyclic axis can
    /// see the source twice: once from the current world copy and once from
    /// the previous one.
    fn axis_spans(
        &self,
        zoom: u32,
        tile_origin: f64,
        axis: usize,
        native: u32,
        extent: &Bounds,
    ) -> Vec<AxisSpan> {
        let ts = self.tile_size as f64;
        let size = extent.span(axis);
        if native == 0 || size <= 0.0 {
            return Vec::new();
        }
        let scale = size / native as f64;
        let offset = extent.lower()[axis] - tile_origin;

        let starts = if self.projection.is_cycled()[axis] {
            let world = world_size_at_zoom(zoom) * ts / tiler_common::DEFAULT_TILE_SIZE as f64;
            let first = offset.rem_euclid(world);
            vec![first, first - world]
        } else {
            vec![offset]
        };

        starts
            .into_iter()
            .filter_map(|start| {
                let dest_lo = start.max(0.0);
                let dest_hi = (start + size).min(ts);
                if dest_hi <= dest_lo {
                    return None;
                }
                let dest = dest_lo.round() as u32;
                let dest_len = (dest_hi.round() as u32).saturating_sub(dest);
                if dest_len == 0 {
                    return None;
                }

                let src_lo = ((dest_lo - start) / scale).clamp(0.0, native as f64);
                let src_hi = ((dest_hi - start) / scale).clamp(0.0, native as f64);
                let mut src = src_lo.round() as u32;
                let mut src_len = (src_hi.round() as u32).saturating_sub(src);
                if src_len == 0 {
                    src = src.min(native - 1);
                    src_len = 1;
                }

                Some(AxisSpan {
                    src,
                    src_len,
                    dest,
                    dest_len,
                })
            })
            .collect()
    }
}

impl TileLayout for BoundedLayout {
    fn auto_max_zoom(&self, width: u32, height: u32) -> u32 {
        (0..MAX_ZOOM)
            .find(|&zoom| {
                let [w, h] = self.size_at_zoom(zoom);
                w >= width as f64 && h >= height as f64
            })
            .unwrap_or(MAX_ZOOM)
    }

    fn tiles_at_zoom(&self, zoom: u32, _width: u32, _height: u32) -> Vec<TileCoord> {
        let extent = self.extent_at_zoom(zoom);
        let cycled = self.projection.is_cycled();
        let xs = self.axis_indices(zoom, extent.lower()[0], extent.upper()[0], cycled[0]);
        let ys = self.axis_indices(zoom, extent.lower()[1], extent.upper()[1], cycled[1]);

        xs.iter()
            .flat_map(|&x| ys.iter().map(move |&y| TileCoord::new(zoom, x, y)))
            .collect()
    }

    fn crop_windows(&self, tile: TileCoord, width: u32, height: u32) -> Vec<CropWindow> {
        let extent = self.extent_at_zoom(tile.z);
        let origin = tile.pixel_origin(self.tile_size);
        let xs = self.axis_spans(tile.z, origin[0], 0, width, &extent);
        let ys = self.axis_spans(tile.z, origin[1], 1, height, &extent);

        xs.iter()
            .flat_map(|x| {
                ys.iter().map(move |y| CropWindow {
                    sx: x.src,
                    sy: y.src,
                    sw: x.src_len,
                    sh: y.src_len,
                    dx: x.dest,
                    dy: y.dest,
                    dw: x.dest_len,
                    dh: y.dest_len,
                })
            })
            .filter(|window| !window.is_empty())
            .collect()
    }

    fn resize_for_zoom(&self, zoom: u32, width: u32, height: u32) -> Option<(u32, u32)> {
        let [w, h] = self.size_at_zoom(zoom);
        let target = (
            (w.round() as u32).clamp(1, width.max(1)),
            (h.round() as u32).clamp(1, height.max(1)),
        );
        (target != (width, height)).then_some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::{CartesianProjection, MercatorProjection};
    use tiler_common::CoordOrder;

    fn plane(cycled: [bool; 2]) -> BoundedLayout {
        let bounds = Bounds::new([0.0, 0.0], [100.0, 100.0]);
        let projection =
            CartesianProjection::new(bounds, [1.0, 1.0], cycled, CoordOrder::LongLat).unwrap();
        BoundedLayout::new(bounds, Box::new(projection), 256)
    }

    #[test]
    fn test_centered_single_tile() {
        let layout = CenteredLayout::new(256);
        assert_eq!(layout.auto_max_zoom(256, 256), 0);
        assert_eq!(layout.tiles_at_zoom(0, 256, 256), vec![TileCoord::new(0, 0, 0)]);
        assert_eq!(
            layout.crop_windows(TileCoord::new(0, 0, 0), 256, 256),
            vec![CropWindow::unscaled(0, 0, 256, 256, 0, 0)]
        );
    }

    #[test]
    fn test_centered_auto_zoom() {
        let layout = CenteredLayout::new(256);
        assert_eq!(layout.auto_max_zoom(257, 10), 1);
        assert_eq!(layout.auto_max_zoom(1000, 250), 2);
        assert_eq!(layout.auto_max_zoom(100, 60), 0);
    }

    #[test]
    fn test_centered_small_image_at_zoom_zero() {
        let layout = CenteredLayout::new(256);
        let windows = layout.crop_windows(TileCoord::new(0, 0, 0), 100, 60);
        assert_eq!(windows, vec![CropWindow::unscaled(0, 0, 100, 60, 78, 98)]);
    }

    #[test]
    fn test_centered_panorama_rows() {
        // 512x128 at zoom 1: starts 192 px down the first row of tiles.
        let layout = CenteredLayout::new(256);
        let tiles = layout.tiles_at_zoom(1, 512, 128);
        assert_eq!(tiles.len(), 4);

        let top = layout.crop_windows(TileCoord::new(1, 0, 0), 512, 128);
        assert_eq!(top, vec![CropWindow::unscaled(0, 0, 256, 64, 0, 192)]);
        let bottom = layout.crop_windows(TileCoord::new(1, 1, 1), 512, 128);
        assert_eq!(bottom, vec![CropWindow::unscaled(256, 64, 256, 64, 0, 0)]);
    }

    #[test]
    fn test_centered_resize_keeps_aspect() {
        let layout = CenteredLayout::new(256);
        assert_eq!(layout.resize_for_zoom(1, 1000, 250), Some((512, 128)));
        assert_eq!(layout.resize_for_zoom(0, 300, 600), Some((128, 256)));
        assert_eq!(layout.resize_for_zoom(2, 1000, 250), None);
    }

    #[test]
    fn test_bounded_whole_plane_single_tile() {
        let layout = plane([false, false]);
        assert_eq!(layout.size_at_zoom(0), [256.0, 256.0]);
        assert_eq!(layout.tiles_at_zoom(0, 256, 256), vec![TileCoord::new(0, 0, 0)]);
        assert_eq!(layout.tiles_at_zoom(1, 256, 256).len(), 4);
        assert_eq!(layout.auto_max_zoom(256, 256), 0);
        assert_eq!(layout.auto_max_zoom(1000, 1000), 2);
    }

    #[test]
    fn test_bounded_scaled_crop() {
        let layout = plane([false, false]);
        let windows = layout.crop_windows(TileCoord::new(1, 1, 0), 100, 100);
        assert_eq!(
            windows,
            vec![CropWindow {
                sx: 50,
                sy: 0,
                sw: 50,
                sh: 50,
                dx: 0,
                dy: 0,
                dw: 256,
                dh: 256,
            }]
        );
    }

    #[test]
    fn test_bounded_resize_only_shrinks() {
        let layout = plane([false, false]);
        assert_eq!(layout.resize_for_zoom(0, 1024, 512), Some((256, 256)));
        assert_eq!(layout.resize_for_zoom(0, 100, 100), None);
        assert_eq!(layout.resize_for_zoom(2, 1024, 512), None);
    }

    #[test]
    fn test_bounded_antimeridian_wraps() {
        let bounds = Bounds::new([-10.0, 170.0], [10.0, -170.0]);
        let layout = BoundedLayout::new(
            bounds,
            Box::new(MercatorProjection::spherical(CoordOrder::LatLong)),
            256,
        );
        let tiles = layout.tiles_at_zoom(2, 64, 64);
        let xs: Vec<u32> = tiles.iter().map(|t| t.x).collect();
        assert!(xs.contains(&3));
        assert!(xs.contains(&0));
        assert!(tiles.iter().all(|t| t.x < 4 && t.y < 4));

        let left = layout.crop_windows(TileCoord::new(2, 0, 1), 64, 64);
        assert!(!left.is_empty());
        assert!(left.iter().all(|w| w.dx == 0));
    }

    #[test]
    fn test_bounded_longitude_past_antimeridian() {
        let bounds = Bounds::new([170.0, -10.0], [190.0, 10.0]);
        let layout = BoundedLayout::new(
            bounds,
            Box::new(MercatorProjection::spherical(CoordOrder::LongLat)),
            256,
        );
        let mut xs: Vec<u32> = layout.tiles_at_zoom(3, 64, 64).iter().map(|t| t.x).collect();
        xs.sort_unstable();
        xs.dedup();
        assert_eq!(xs, vec![0, 7]);
    }
}
