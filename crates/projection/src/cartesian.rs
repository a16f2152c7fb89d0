//! Cartesian projection onto a rectangular region.
//!
//! Maps a user-declared rectangle of plane coordinates linearly onto global
//! pixel space. The y axis is flipped: plane y grows upward, pixel y grows
//! downward.

use tiler_common::tile::world_size_at_zoom;
use tiler_common::{Bounds, CoordOrder, Point, TilerError, TilerResult};

use crate::coord_system::CoordinateSystem;
use crate::{cycle_restrict, Projection, ProjectionKind};

#[derive(Debug, Clone)]
pub struct CartesianProjection {
    /// Normalised bounds in planar `[x, y]` order.
    bounds: Bounds,
    range: [f64; 2],
    cycled: [bool; 2],
    coord_order: CoordOrder,
    coord_system: CoordinateSystem,
}

impl CartesianProjection {
    /// Create a projection of `bounds` (given in `coord_order`).
    ///
    /// `cycled` flags are in planar `[x, y]` order.
    pub fn new(
        bounds: Bounds,
        scale: [f64; 2],
        cycled: [bool; 2],
        coord_order: CoordOrder,
    ) -> TilerResult<Self> {
        if !bounds.is_finite() {
            return Err(TilerError::invalid_config(
                "bounds",
                "cartesian bounds must be finite numbers",
            ));
        }

        let planar = Bounds::new(
            coord_order.to_planar(bounds.lower()),
            coord_order.to_planar(bounds.upper()),
        )
        .normalized();
        let range = [planar.span(0), planar.span(1)];

        if range[0] <= 0.0 || range[1] <= 0.0 {
            return Err(TilerError::invalid_config(
                "bounds",
                format!("cartesian bounds must have a non-zero extent, got {:?}", bounds.0),
            ));
        }

        Ok(Self {
            bounds: planar,
            range,
            cycled,
            coord_order,
            coord_system: CoordinateSystem::new(scale),
        })
    }

    /// The projected rectangle in planar `[x, y]` order.
    pub fn planar_bounds(&self) -> Bounds {
        self.bounds
    }

    fn fixed_point(&self, point: Point) -> Point {
        let lower = self.bounds.lower();
        let upper = self.bounds.upper();
        let mut fixed = point;
        for axis in 0..2 {
            if self.cycled[axis] {
                fixed[axis] = cycle_restrict(point[axis], lower[axis], upper[axis]);
            }
        }
        fixed
    }
}

impl Projection for CartesianProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Cartesian
    }

    fn to_global_pixels(&self, point: Point, zoom: u32) -> Point {
        let world_size = world_size_at_zoom(zoom);
        let [x, y] = self.coord_order.to_planar(point);

        [
            (x - self.bounds.lower()[0]) / self.range[0] * world_size,
            (self.bounds.upper()[1] - y) / self.range[1] * world_size,
        ]
    }

    fn from_global_pixels(&self, point: Point, zoom: u32) -> Point {
        let world_size = world_size_at_zoom(zoom);
        let planar = [
            point[0] * self.range[0] / world_size + self.bounds.lower()[0],
            self.bounds.upper()[1] - self.range[1] * point[1] / world_size,
        ];

        self.coord_order.from_planar(self.fixed_point(planar))
    }

    fn is_cycled(&self) -> [bool; 2] {
        self.cycled
    }

    fn coord_order(&self) -> CoordOrder {
        self.coord_order
    }

    fn coord_system(&self) -> Option<&CoordinateSystem> {
        Some(&self.coord_system)
    }
}
