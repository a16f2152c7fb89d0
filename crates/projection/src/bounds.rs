//! Conversions and containment tests for bounds under a projection.
//!
//! Geographic bounds are given as `[lower, upper]` corners in the
//! projection's coordinate order. On a cyclic axis the corners describe a
//! directed interval: a lower corner east of the upper one crosses the
//! wrap line (e.g. `170°..-170°` spans the antimeridian).

use tiler_common::tile::world_size_at_zoom;
use tiler_common::{Bounds, Point};

use crate::Projection;

/// Shrink applied when a cyclic span covers the whole world, so that both
/// corners stay strictly inside one world copy.
const WORLD_EPSILON: f64 = 1e-10;

/// Something that can lie inside bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    Point(Point),
    Bounds(Bounds),
}

impl Region {
    fn corners(&self) -> Vec<Point> {
        match self {
            Region::Point(point) => vec![*point],
            Region::Bounds(bounds) => vec![bounds.lower(), bounds.upper()],
        }
    }
}

impl From<Point> for Region {
    fn from(point: Point) -> Self {
        Region::Point(point)
    }
}

impl From<Bounds> for Region {
    fn from(bounds: Bounds) -> Self {
        Region::Bounds(bounds)
    }
}

/// Check whether `outer` contains a point or entire bounds.
///
/// Without a projection all values are compared as given. With one, both
/// sides are first converted to zoom-0 global pixels and a point off a
/// cyclic axis interval is also tried one world to either side.
pub fn contains(outer: &Bounds, inner: impl Into<Region>, projection: Option<&dyn Projection>) -> bool {
    let region = inner.into();

    match projection {
        None => region
            .corners()
            .into_iter()
            .all(|corner| outer.contains_point(corner)),
        Some(projection) => {
            let pixel_outer = to_global_pixel_bounds(outer, projection, 0);
            let cycled = projection.is_cycled();
            let world_size = world_size_at_zoom(0);

            region.corners().into_iter().all(|corner| {
                let pixel = projection.to_global_pixels(corner, 0);
                contains_pixel(&pixel_outer, pixel, cycled, world_size)
            })
        }
    }
}

fn contains_pixel(bounds: &Bounds, point: Point, cycled: [bool; 2], world_size: f64) -> bool {
    let normalized = bounds.normalized();

    (0..2).all(|axis| {
        let lo = normalized.lower()[axis];
        let hi = normalized.upper()[axis];
        let inside = |v: f64| v >= lo && v <= hi;
        let v = point[axis];

        inside(v) || (cycled[axis] && (inside(v + world_size) || inside(v - world_size)))
    })
}

/// Convert geographic bounds to global pixel bounds at `zoom`.
///
/// The result always has `lower <= upper` per axis. A cyclic axis whose
/// pixel corners run against [`Projection::pixel_direction`] (`170..190`
/// longitude lands on `170..-170`), or coincide (`-180..180`), crosses the
/// wrap line: one corner is moved a world to the side that keeps the
/// interval centre in the first world copy, so the result may extend past
/// `[0, world)`.
pub fn to_global_pixel_bounds(geo: &Bounds, projection: &dyn Projection, zoom: u32) -> Bounds {
    let lower = projection.to_global_pixels(geo.lower(), zoom);
    let upper = projection.to_global_pixels(geo.upper(), zoom);
    let cycled = projection.is_cycled();
    let direction = projection.pixel_direction();
    let world_size = world_size_at_zoom(zoom);
    let mut result = [[0.0; 2]; 2];

    for axis in 0..2 {
        let a = lower[axis].min(upper[axis]);
        let b = lower[axis].max(upper[axis]);
        let wraps = cycled[axis] && (upper[axis] - lower[axis]) * direction[axis] <= 0.0;

        let (lo, hi) = if !wraps {
            (a, b)
        } else if (a + b) / 2.0 < world_size / 2.0 {
            (b, a + world_size)
        } else {
            (b - world_size, a)
        };
        result[0][axis] = lo;
        result[1][axis] = hi;
    }

    Bounds(result)
}

/// Convert global pixel bounds at `zoom` back to geographic bounds.
///
/// A cyclic span of a whole world or more collapses to one world centred on
/// the span. Non-cyclic axes come back ordered lower-to-upper in geographic
/// coordinates.
pub fn from_global_pixel_bounds(pixel: &Bounds, projection: &dyn Projection, zoom: u32) -> Bounds {
    let world_size = world_size_at_zoom(zoom);
    let cycled = projection.is_cycled();
    let mut lower = [0.0; 2];
    let mut upper = [0.0; 2];

    for axis in 0..2 {
        let a = pixel.lower()[axis];
        let b = pixel.upper()[axis];

        if cycled[axis] && (b - a).abs() >= world_size {
            let center = 0.5 * (a + b);
            lower[axis] = center - 0.5 * world_size + WORLD_EPSILON;
            upper[axis] = center + 0.5 * world_size - WORLD_EPSILON;
        } else {
            lower[axis] = a.min(b);
            upper[axis] = a.max(b);
        }
    }

    let mut result = [
        projection.from_global_pixels(lower, zoom),
        projection.from_global_pixels(upper, zoom),
    ];

    let order = projection.coord_order();
    for (axis, &is_cycled) in cycled.iter().enumerate() {
        if is_cycled {
            continue;
        }
        let index = order.geo_index(axis);
        let (lo, hi) = (result[0][index], result[1][index]);
        result[0][index] = lo.min(hi);
        result[1][index] = lo.max(hi);
    }

    Bounds(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MercatorProjection;
    use tiler_common::CoordOrder;

    #[test]
    fn test_bounds_contain_themselves() {
        let bounds = Bounds::new([10496.0, 6400.0], [10752.0, 6144.0]);
        assert!(contains(&bounds, bounds, None));
    }

    #[test]
    fn test_contains_point_without_projection() {
        let bounds = Bounds::new([0.0, 0.0], [10.0, 10.0]);
        assert!(contains(&bounds, [5.0, 5.0], None));
        assert!(!contains(&bounds, [15.0, 5.0], None));
    }

    #[test]
    fn test_inverted_latitude_is_swapped() {
        let proj = MercatorProjection::spherical(CoordOrder::LongLat);
        let geo = Bounds::new([-10.0, -10.0], [10.0, 10.0]);
        let pixel = to_global_pixel_bounds(&geo, &proj, 0);

        // Northern edge has the smaller pixel y.
        assert!(pixel.lower()[1] < pixel.upper()[1]);
        assert!(pixel.lower()[0] < pixel.upper()[0]);
    }

    #[test]
    fn test_full_longitude_range_spans_world() {
        let proj = MercatorProjection::spherical(CoordOrder::LongLat);
        let geo = Bounds::new([-180.0, -60.0], [180.0, 60.0]);
        let pixel = to_global_pixel_bounds(&geo, &proj, 2);

        assert_eq!(pixel.lower()[0], 0.0);
        assert_eq!(pixel.upper()[0], 1024.0);
    }

    #[test]
    fn test_antimeridian_extends_right() {
        let proj = MercatorProjection::spherical(CoordOrder::LongLat);
        let geo = Bounds::new([160.0, -10.0], [-170.0, 10.0]);
        let pixel = to_global_pixel_bounds(&geo, &proj, 0);

        // Centre sits left of the world middle: upper corner moves right.
        assert!(pixel.lower()[0] > 0.0);
        assert!(pixel.upper()[0] > 256.0);
        assert!((pixel.span(0) - 256.0 * 30.0 / 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_extends_left() {
        let proj = MercatorProjection::spherical(CoordOrder::LongLat);
        let geo = Bounds::new([170.0, -10.0], [-160.0, 10.0]);
        let pixel = to_global_pixel_bounds(&geo, &proj, 0);

        assert!(pixel.lower()[0] < 0.0);
        assert!(pixel.upper()[0] < 256.0);
        assert!((pixel.span(0) - 256.0 * 30.0 / 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_longitude_past_antimeridian_wraps() {
        let proj = MercatorProjection::spherical(CoordOrder::LongLat);
        let pixel = to_global_pixel_bounds(&Bounds::new([170.0, -10.0], [190.0, 10.0]), &proj, 0);

        assert!((pixel.span(0) - 256.0 * 20.0 / 360.0).abs() < 1e-9);

        let past = to_global_pixel_bounds(&Bounds::new([170.0, -10.0], [200.0, 10.0]), &proj, 0);
        let crossing =
            to_global_pixel_bounds(&Bounds::new([170.0, -10.0], [-160.0, 10.0]), &proj, 0);
        assert!((past.lower()[0] - crossing.lower()[0]).abs() < 1e-9);
        assert!((past.upper()[0] - crossing.upper()[0]).abs() < 1e-9);
    }
}
