//! Map projections onto global pixel space.
//!
//! A projection maps geographic (or planar) points onto a zoom-dependent
//! pixel plane whose side is `2^(zoom + 8)` pixels, and back. Downstream
//! code never special-cases a projection: wraparound is handled generically
//! through [`Projection::is_cycled`].
//!
//! Implements the projections from scratch without external geodesy crates.

pub mod bounds;
pub mod cartesian;
pub mod coord_system;
pub mod factory;
pub mod mercator;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tiler_common::{CoordOrder, Point, TilerError};

pub use cartesian::CartesianProjection;
pub use coord_system::{CoordinateSystem, GeodesicSolution, PathPoint};
pub use factory::{ProjectionFactory, ProjectionOptions};
pub use mercator::MercatorProjection;

/// Bidirectional mapping between geographic points and global pixels.
pub trait Projection: fmt::Debug + Send + Sync {
    /// Which member of the projection family this is.
    fn kind(&self) -> ProjectionKind;

    /// Convert a geographic point to global pixels at `zoom`.
    fn to_global_pixels(&self, point: Point, zoom: u32) -> Point;

    /// Convert global pixels at `zoom` back to a geographic point.
    fn from_global_pixels(&self, point: Point, zoom: u32) -> Point;

    /// Per pixel axis (`[x, y]`) flag telling whether the axis wraps.
    fn is_cycled(&self) -> [bool; 2];

    /// Axis order of geographic points accepted and returned.
    fn coord_order(&self) -> CoordOrder;

    /// Sign of the pixel change for a growing planar coordinate, per pixel
    /// axis. Pixel y grows downward, so north-up projections keep the default.
    fn pixel_direction(&self) -> [f64; 2] {
        [1.0, -1.0]
    }

    /// Planar geometry backing the projection, if any.
    fn coord_system(&self) -> Option<&CoordinateSystem> {
        None
    }
}

/// The closed family of supported projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionKind {
    #[serde(rename = "cartesian")]
    Cartesian,
    #[serde(rename = "sphericalMercator")]
    SphericalMercator,
    #[serde(rename = "wgs84Mercator")]
    Wgs84Mercator,
}

impl ProjectionKind {
    /// Canonical configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            ProjectionKind::Cartesian => "cartesian",
            ProjectionKind::SphericalMercator => "sphericalMercator",
            ProjectionKind::Wgs84Mercator => "wgs84Mercator",
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionKind {
    type Err = TilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cartesian" | "Cartesian" => Ok(ProjectionKind::Cartesian),
            "sphericalMercator" | "spherical-mercator" | "spherical_mercator" => {
                Ok(ProjectionKind::SphericalMercator)
            }
            "wgs84Mercator" | "wgs84-mercator" | "wgs84_mercator" => {
                Ok(ProjectionKind::Wgs84Mercator)
            }
            _ => Err(TilerError::UnknownProjection(s.to_string())),
        }
    }
}

/// Wrap `value` into the half-open interval `[min, max)`.
pub fn cycle_restrict(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    value - ((value - min) / range).floor() * range
}
