//! Points and axis ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A pair of coordinates.
///
/// Geographic points follow the configured [`CoordOrder`]; global pixel
/// points are always `[x, y]` with `y` growing downward.
pub type Point = [f64; 2];

/// Axis order of geographic points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CoordOrder {
    /// `[latitude, longitude]` (`[y, x]` on the plane)
    #[default]
    #[serde(rename = "latlong")]
    LatLong,
    /// `[longitude, latitude]` (`[x, y]` on the plane)
    #[serde(rename = "longlat")]
    LongLat,
}

impl CoordOrder {
    /// Whether geographic points store the planar axes swapped.
    pub fn is_inverse(&self) -> bool {
        matches!(self, CoordOrder::LatLong)
    }

    /// Reorder a geographic point into planar `[x, y]`.
    pub fn to_planar(&self, point: Point) -> Point {
        if self.is_inverse() {
            [point[1], point[0]]
        } else {
            point
        }
    }

    /// Reorder a planar `[x, y]` point into this coordinate order.
    pub fn from_planar(&self, point: Point) -> Point {
        // Swapping is its own inverse.
        self.to_planar(point)
    }

    /// Index within a geographic point that holds the given planar axis.
    pub fn geo_index(&self, planar_axis: usize) -> usize {
        if self.is_inverse() {
            1 - planar_axis
        } else {
            planar_axis
        }
    }
}

impl fmt::Display for CoordOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordOrder::LatLong => write!(f, "latlong"),
            CoordOrder::LongLat => write!(f, "longlat"),
        }
    }
}

impl FromStr for CoordOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latlong" | "latlon" => Ok(CoordOrder::LatLong),
            "longlat" | "lonlat" => Ok(CoordOrder::LongLat),
            _ => Err(format!(
                "unknown coordinate order '{}', expected 'latlong' or 'longlat'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_reorder() {
        assert_eq!(CoordOrder::LatLong.to_planar([55.7, 37.5]), [37.5, 55.7]);
        assert_eq!(CoordOrder::LongLat.to_planar([37.5, 55.7]), [37.5, 55.7]);
        assert_eq!(CoordOrder::LatLong.from_planar([37.5, 55.7]), [55.7, 37.5]);
    }

    #[test]
    fn test_geo_index() {
        assert_eq!(CoordOrder::LatLong.geo_index(0), 1);
        assert_eq!(CoordOrder::LatLong.geo_index(1), 0);
        assert_eq!(CoordOrder::LongLat.geo_index(0), 0);
    }

    #[test]
    fn test_parse_coord_order() {
        assert_eq!("latlong".parse::<CoordOrder>().unwrap(), CoordOrder::LatLong);
        assert_eq!("LONGLAT".parse::<CoordOrder>().unwrap(), CoordOrder::LongLat);
        assert!("xy".parse::<CoordOrder>().is_err());
    }
}
