//! Mercator projections (spherical and WGS84 ellipsoidal).
//!
//! Both variants share one implementation parameterised by the eccentricity
//! of the reference ellipsoid. With `e = 0` the formulas reduce to the
//! spherical ("Web") Mercator used by most slippy-map viewers.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use tiler_common::tile::world_size_at_zoom;
use tiler_common::{CoordOrder, Point};

use crate::{cycle_restrict, Projection, ProjectionKind};

/// Semi-major axis of the WGS84 ellipsoid in metres.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// First eccentricity of the WGS84 ellipsoid.
pub const WGS84_ECCENTRICITY: f64 = 0.0818191908426;

/// Latitudes are clamped this far away from the poles, where the forward
/// transform diverges.
const POLE_EPSILON_DEG: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct MercatorProjection {
    kind: ProjectionKind,
    eccentricity: f64,
    coord_order: CoordOrder,
    /// Coefficients of the conformal latitude series used by the inverse.
    series: [f64; 4],
}

impl MercatorProjection {
    /// Mercator on a sphere of radius [`EARTH_RADIUS`].
    pub fn spherical(coord_order: CoordOrder) -> Self {
        Self::build(ProjectionKind::SphericalMercator, 0.0, coord_order)
    }

    /// Mercator on the WGS84 ellipsoid.
    pub fn wgs84(coord_order: CoordOrder) -> Self {
        Self::build(ProjectionKind::Wgs84Mercator, WGS84_ECCENTRICITY, coord_order)
    }

    /// Mercator with a custom eccentricity. Zero yields the spherical kind.
    pub fn with_eccentricity(eccentricity: f64, coord_order: CoordOrder) -> Self {
        let kind = if eccentricity == 0.0 {
            ProjectionKind::SphericalMercator
        } else {
            ProjectionKind::Wgs84Mercator
        };
        Self::build(kind, eccentricity, coord_order)
    }

    fn build(kind: ProjectionKind, eccentricity: f64, coord_order: CoordOrder) -> Self {
        let e2 = eccentricity * eccentricity;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let e8 = e4 * e4;

        let series = [
            e2 / 2.0 + 5.0 * e4 / 24.0 + e6 / 12.0 + 13.0 * e8 / 360.0,
            7.0 * e4 / 48.0 + 29.0 * e6 / 240.0 + 811.0 * e8 / 11520.0,
            7.0 * e6 / 120.0 + 81.0 * e8 / 1120.0,
            4279.0 * e8 / 161280.0,
        ];

        Self {
            kind,
            eccentricity,
            coord_order,
            series,
        }
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Pixels per projected metre at `zoom`.
    fn pixels_per_metre(zoom: u32) -> f64 {
        world_size_at_zoom(zoom) / (2.0 * PI * EARTH_RADIUS)
    }

    fn longitude_to_x(&self, lon_deg: f64) -> f64 {
        let lon = cycle_restrict(lon_deg.to_radians(), -PI, PI);
        EARTH_RADIUS * lon
    }

    fn latitude_to_y(&self, lat_deg: f64) -> f64 {
        let limit = 90.0 - POLE_EPSILON_DEG;
        let phi = lat_deg.clamp(-limit, limit).to_radians();
        let e = self.eccentricity;
        let con = e * phi.sin();
        let ratio = ((1.0 - con) / (1.0 + con)).powf(e / 2.0);

        EARTH_RADIUS * ((FRAC_PI_4 + phi / 2.0).tan() * ratio).ln()
    }

    fn x_to_longitude(&self, x: f64) -> f64 {
        cycle_restrict(x / EARTH_RADIUS, -PI, PI).to_degrees()
    }

    fn y_to_latitude(&self, y: f64) -> f64 {
        let xphi = FRAC_PI_2 - 2.0 * (-y / EARTH_RADIUS).exp().atan();
        let [ab, bb, cb, db] = self.series;

        let phi = xphi
            + ab * (2.0 * xphi).sin()
            + bb * (4.0 * xphi).sin()
            + cb * (6.0 * xphi).sin()
            + db * (8.0 * xphi).sin();

        phi.to_degrees()
    }
}

impl Projection for MercatorProjection {
    fn kind(&self) -> ProjectionKind {
        self.kind
    }

    fn to_global_pixels(&self, point: Point, zoom: u32) -> Point {
        let [lon, lat] = self.coord_order.to_planar(point);
        let k = Self::pixels_per_metre(zoom);
        let half_equator = PI * EARTH_RADIUS;

        [
            (self.longitude_to_x(lon) + half_equator) * k,
            (half_equator - self.latitude_to_y(lat)) * k,
        ]
    }

    fn from_global_pixels(&self, point: Point, zoom: u32) -> Point {
        let k = Self::pixels_per_metre(zoom);
        let half_equator = PI * EARTH_RADIUS;
        let mx = point[0] / k - half_equator;
        let my = half_equator - point[1] / k;

        self.coord_order
            .from_planar([self.x_to_longitude(mx), self.y_to_latitude(my)])
    }

    fn is_cycled(&self) -> [bool; 2] {
        [true, false]
    }

    fn coord_order(&self) -> CoordOrder {
        self.coord_order
    }
}
