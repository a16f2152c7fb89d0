//! Common test fixtures for layer-tiler tests.
//!
//! Bounds are `[lower, upper]` corner pairs. Geographic fixtures are listed
//! in both coordinate orders where tests need them.

/// Geographic bounds in `latlong` order.
pub mod latlong {
    /// Whole Mercator world (latitudes stop short of the poles).
    pub const WORLD: [[f64; 2]; 2] = [[-85.0, -180.0], [85.0, 180.0]];

    /// Moscow region.
    pub const MOSCOW: [[f64; 2]; 2] = [[55.0, 37.0], [56.5, 38.5]];

    /// Crosses the antimeridian (lower longitude east of upper).
    pub const PACIFIC: [[f64; 2]; 2] = [[-50.0, 160.0], [50.0, -140.0]];
}

/// Geographic bounds in `longlat` order.
pub mod longlat {
    /// Whole Mercator world (latitudes stop short of the poles).
    pub const WORLD: [[f64; 2]; 2] = [[-180.0, -85.0], [180.0, 85.0]];

    /// Crosses the antimeridian (lower longitude east of upper).
    pub const PACIFIC: [[f64; 2]; 2] = [[160.0, -50.0], [-140.0, 50.0]];
}

/// Planar bounds for the Cartesian projection.
pub mod cartesian {
    /// Symmetric unit square around the origin.
    pub const UNIT_SQUARE: [[f64; 2]; 2] = [[-1.0, -1.0], [1.0, 1.0]];

    /// A floor plan in metres.
    pub const FLOOR_PLAN: [[f64; 2]; 2] = [[0.0, 0.0], [40.0, 20.0]];
}

/// Global pixel bounds of the tile (41, 24) at zoom 6, written bottom-left
/// first.
pub const PIXEL_TILE: [[f64; 2]; 2] = [[10496.0, 6400.0], [10752.0, 6144.0]];

/// Literal projection vectors. Geographic points are in `latlong` order.
pub mod vectors {
    /// Zoom used by every vector below.
    pub const ZOOM: u32 = 10;

    /// Pixel point fed to `from_global_pixels`.
    pub const PIXEL: [f64; 2] = [100.0, 100.0];

    /// Geographic point fed to `to_global_pixels`.
    pub const GEO: [f64; 2] = [55.7, 37.5];

    pub const WGS84_FROM: [f64; 2] = [85.07227610506499, -179.8626708984375];
    pub const WGS84_TO: [f64; 2] = [158378.66666666666, 82250.12460366159];

    pub const SPHERICAL_FROM: [f64; 2] = [85.03926769025156, -179.8626708984375];
    pub const SPHERICAL_TO: [f64; 2] = [158378.66666666666, 82019.04329898844];

    /// Cartesian unit square, `latlong` order.
    pub const CARTESIAN_TO_INPUT: [f64; 2] = [0.0, 0.0];
    pub const CARTESIAN_TO: [f64; 2] = [131072.0, 131072.0];
    pub const CARTESIAN_FROM_INPUT: [f64; 2] = [157696.0, 81920.0];
    pub const CARTESIAN_FROM: [f64; 2] = [0.375, 0.203125];

    /// Tolerance for comparing against the vectors.
    pub const EPSILON: f64 = 1e-6;
}

/// Source raster sizes for pyramid tests.
pub mod sizes {
    /// Exactly one tile at the default tile size.
    pub const ONE_TILE: (u32, u32) = (256, 256);

    /// Wide panorama: four tiles across, one down at native resolution.
    pub const PANORAMA: (u32, u32) = (1000, 250);

    /// Portrait image.
    pub const PORTRAIT: (u32, u32) = (300, 600);

    /// Smaller than a single tile.
    pub const THUMBNAIL: (u32, u32) = (100, 60);
}
