//! Planar coordinate system.
//!
//! Geometry of a flat, optionally anisotropically scaled plane. Used as the
//! coordinate system of the Cartesian projection, where geodesic problems
//! reduce to straight segments.

use nalgebra::Vector2;
use tiler_common::Point;

/// Flat plane with a per-axis unit scale.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSystem {
    scale: Vector2<f64>,
}

/// A point on a solved path together with the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub point: Point,
    pub direction: Point,
}

/// Result of a direct or inverse problem on the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct GeodesicSolution {
    pub start_point: Point,
    pub start_direction: Point,
    pub end_point: Point,
    pub end_direction: Point,
    /// Length of the segment in scaled units.
    pub distance: f64,
    delta: Vector2<f64>,
}

impl GeodesicSolution {
    /// Point at fraction `t` (`0.0` is the start, `1.0` the end).
    pub fn point_at(&self, t: f64) -> PathPoint {
        let start = Vector2::new(self.start_point[0], self.start_point[1]);
        let point = start + self.delta * t;
        PathPoint {
            point: [point.x, point.y],
            direction: self.start_direction,
        }
    }

    /// Reusable parametric path function.
    pub fn path_function(&self) -> impl Fn(f64) -> PathPoint + '_ {
        move |t| self.point_at(t)
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self::new([1.0, 1.0])
    }
}

impl CoordinateSystem {
    /// Create a plane with separate x and y scales.
    pub fn new(scale: [f64; 2]) -> Self {
        Self {
            scale: Vector2::new(scale[0], scale[1]),
        }
    }

    /// Create a plane with the same scale on both axes.
    pub fn uniform(scale: f64) -> Self {
        Self::new([scale, scale])
    }

    pub fn scale(&self) -> [f64; 2] {
        [self.scale.x, self.scale.y]
    }

    /// Walk `distance` scaled units from `start` along `direction`.
    ///
    /// `direction` is normalised first and must not be the zero vector.
    pub fn solve_direct_problem(
        &self,
        start: Point,
        direction: Point,
        distance: f64,
    ) -> GeodesicSolution {
        let unit = Vector2::new(direction[0], direction[1]).normalize();
        let delta = unit.component_div(&self.scale) * distance;
        let end = Vector2::new(start[0], start[1]) + delta;

        GeodesicSolution {
            start_point: start,
            start_direction: [unit.x, unit.y],
            end_point: [end.x, end.y],
            end_direction: [unit.x, unit.y],
            distance,
            delta,
        }
    }

    /// Find the direction and distance between two points.
    ///
    /// Returns `None` when the points coincide, since the direction is
    /// undefined.
    pub fn solve_inverse_problem(&self, start: Point, end: Point) -> Option<GeodesicSolution> {
        let delta = Vector2::new(end[0] - start[0], end[1] - start[1]);
        let unit = delta.try_normalize(0.0)?;

        Some(GeodesicSolution {
            start_point: start,
            start_direction: [unit.x, unit.y],
            end_point: end,
            end_direction: [unit.x, unit.y],
            distance: self.distance(start, end),
            delta,
        })
    }

    /// Euclidean distance with the per-axis scale applied.
    pub fn distance(&self, p1: Point, p2: Point) -> f64 {
        Vector2::new(p2[0] - p1[0], p2[1] - p1[1])
            .component_mul(&self.scale)
            .norm()
    }
}
