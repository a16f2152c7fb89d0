//! Bounds types and operations.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::geo::Point;

/// A `[lower, upper]` pair of corners.
///
/// The same type carries geographic bounds (corners in the configured
/// coordinate order) and global pixel bounds (`[x, y]` corners). On a cyclic
/// axis the pair may describe a directed interval that runs past the world
/// edge, so corners are not reordered on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bounds(pub [Point; 2]);

impl Bounds {
    /// Create bounds from two corners.
    pub fn new(lower: Point, upper: Point) -> Self {
        Self([lower, upper])
    }

    /// Parse a comma separated `"a,b,c,d"` string: lower corner, then upper corner.
    pub fn from_corner_string(s: &str) -> Result<Self, BoundsParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BoundsParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| BoundsParseError::InvalidNumber(part.to_string()))?;
        }

        Ok(Self([[values[0], values[1]], [values[2], values[3]]]))
    }

    pub fn lower(&self) -> Point {
        self.0[0]
    }

    pub fn upper(&self) -> Point {
        self.0[1]
    }

    /// Signed extent along an axis (`upper - lower`).
    pub fn span(&self, axis: usize) -> f64 {
        self.0[1][axis] - self.0[0][axis]
    }

    /// Midpoint between the two corners.
    pub fn center(&self) -> Point {
        [
            0.5 * (self.0[0][0] + self.0[1][0]),
            0.5 * (self.0[0][1] + self.0[1][1]),
        ]
    }

    /// Bounds with `lower <= upper` on both axes.
    pub fn normalized(&self) -> Self {
        let [a, b] = self.0;
        Self([
            [a[0].min(b[0]), a[1].min(b[1])],
            [a[0].max(b[0]), a[1].max(b[1])],
        ])
    }

    /// Check if a point lies inside the (normalized) bounds, edges included.
    pub fn contains_point(&self, point: Point) -> bool {
        let n = self.normalized();
        point[0] >= n.0[0][0] && point[0] <= n.0[1][0] && point[1] >= n.0[0][1] && point[1] <= n.0[1][1]
    }

    /// All four coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|v| v.is_finite())
    }
}

impl FromStr for Bounds {
    type Err = BoundsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_corner_string(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoundsParseError {
    #[error("Invalid bounds format: {0}. Expected 'a,b,c,d' (lower corner, upper corner)")]
    InvalidFormat(String),

    #[error("Invalid number in bounds: {0}")]
    InvalidNumber(String),
}
