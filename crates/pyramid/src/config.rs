//! Job configuration.
//!
//! Keys use camelCase so that YAML job files read naturally:
//!
//! ```yaml
//! output: ./out
//! projection: wgs84Mercator
//! coordOrder: latlong
//! bounds: [[55.0, 37.0], [56.5, 38.5]]
//! maxZoom: auto
//! tileType: jpeg
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use projection::{ProjectionKind, ProjectionOptions};
use renderer::{TileFormat, DEFAULT_JPEG_QUALITY};
use serde::{Deserialize, Serialize};
use tiler_common::{Bounds, CoordOrder, TilerError, TilerResult, DEFAULT_TILE_SIZE, MAX_ZOOM};

use crate::template::{TileUrlTemplate, DEFAULT_TILE_URL_TEMPLATE};

/// Upper limit for the tile side; larger tiles are almost certainly a typo.
const MAX_TILE_SIZE: u32 = 4096;

/// Highest zoom to render: fixed, or derived from the source resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "MaxZoomRepr", into = "MaxZoomRepr")]
pub enum MaxZoom {
    #[default]
    Auto,
    Level(u32),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum MaxZoomRepr {
    Level(u32),
    Name(String),
}

impl TryFrom<MaxZoomRepr> for MaxZoom {
    type Error = String;

    fn try_from(repr: MaxZoomRepr) -> Result<Self, Self::Error> {
        match repr {
            MaxZoomRepr::Level(level) => Ok(MaxZoom::Level(level)),
            MaxZoomRepr::Name(name) => name.parse(),
        }
    }
}

impl From<MaxZoom> for MaxZoomRepr {
    fn from(value: MaxZoom) -> Self {
        match value {
            MaxZoom::Auto => MaxZoomRepr::Name("auto".to_string()),
            MaxZoom::Level(level) => MaxZoomRepr::Level(level),
        }
    }
}

impl FromStr for MaxZoom {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(MaxZoom::Auto);
        }
        s.parse::<u32>()
            .map(MaxZoom::Level)
            .map_err(|_| format!("invalid max zoom '{}', expected 'auto' or a number", s))
    }
}

impl fmt::Display for MaxZoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxZoom::Auto => write!(f, "auto"),
            MaxZoom::Level(level) => write!(f, "{}", level),
        }
    }
}

/// Cartesian coordinate system scale: one number for both axes or a pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    Uniform(f64),
    PerAxis([f64; 2]),
}

impl Scale {
    pub fn to_pair(self) -> [f64; 2] {
        match self {
            Scale::Uniform(s) => [s, s],
            Scale::PerAxis(pair) => pair,
        }
    }
}

impl FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let parse = |p: &str| {
            p.parse::<f64>()
                .map_err(|_| format!("invalid scale '{}', expected 'k' or 'kx,ky'", s))
        };
        match parts.as_slice() {
            [k] => Ok(Scale::Uniform(parse(k)?)),
            [kx, ky] => Ok(Scale::PerAxis([parse(kx)?, parse(ky)?])),
            _ => Err(format!("invalid scale '{}', expected 'k' or 'kx,ky'", s)),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from(".")
}

fn default_projection() -> String {
    ProjectionKind::SphericalMercator.name().to_string()
}

fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}

fn default_tile_url_template() -> String {
    DEFAULT_TILE_URL_TEMPLATE.to_string()
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_true() -> bool {
    true
}

/// Everything a tiling job needs besides the source image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TilerConfig {
    /// Directory receiving tiles and the preview page.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Projection name (`cartesian`, `sphericalMercator`, `wgs84Mercator`).
    #[serde(default = "default_projection")]
    pub projection: String,

    #[serde(default)]
    pub coord_order: CoordOrder,

    /// Geographic extent of the source image. Without bounds the image is
    /// centred in the world and tiled at its native resolution.
    #[serde(default)]
    pub bounds: Option<Bounds>,

    /// Cartesian only: extent of the projected plane. Defaults to `bounds`.
    #[serde(default)]
    pub projection_bounds: Option<Bounds>,

    /// Cartesian only.
    #[serde(default)]
    pub scale: Option<Scale>,

    /// Cartesian only: per planar axis wrap flags.
    #[serde(default)]
    pub cycled: Option<[bool; 2]>,

    #[serde(default = "default_tile_size")]
    pub tile_size: u32,

    #[serde(default)]
    pub tile_type: TileFormat,

    #[serde(default = "default_tile_url_template")]
    pub tile_url_template: String,

    #[serde(default)]
    pub min_zoom: u32,

    #[serde(default)]
    pub max_zoom: MaxZoom,

    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Write `index.html` next to the tiles.
    #[serde(default = "default_true")]
    pub preview_page: bool,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            projection: default_projection(),
            coord_order: CoordOrder::default(),
            bounds: None,
            projection_bounds: None,
            scale: None,
            cycled: None,
            tile_size: default_tile_size(),
            tile_type: TileFormat::default(),
            tile_url_template: default_tile_url_template(),
            min_zoom: 0,
            max_zoom: MaxZoom::default(),
            jpeg_quality: default_jpeg_quality(),
            preview_page: true,
        }
    }
}

impl TilerConfig {
    /// Check every value that can be checked without the source image.
    pub fn validate(&self) -> TilerResult<()> {
        self.projection_kind()?;
        self.template()?;

        if self.tile_size == 0 || self.tile_size > MAX_TILE_SIZE {
            return Err(TilerError::invalid_config(
                "tileSize",
                format!("must be in 1..={}, got {}", MAX_TILE_SIZE, self.tile_size),
            ));
        }

        if self.min_zoom > MAX_ZOOM {
            return Err(TilerError::invalid_config(
                "minZoom",
                format!("must be at most {}, got {}", MAX_ZOOM, self.min_zoom),
            ));
        }

        if let MaxZoom::Level(max) = self.max_zoom {
            if max > MAX_ZOOM {
                return Err(TilerError::invalid_config(
                    "maxZoom",
                    format!("must be at most {}, got {}", MAX_ZOOM, max),
                ));
            }
            if max < self.min_zoom {
                return Err(TilerError::invalid_config(
                    "maxZoom",
                    format!("{} is below minZoom {}", max, self.min_zoom),
                ));
            }
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(TilerError::invalid_config(
                "jpegQuality",
                format!("must be in 1..=100, got {}", self.jpeg_quality),
            ));
        }

        for (param, bounds) in [
            ("bounds", self.bounds),
            ("projectionBounds", self.projection_bounds),
        ] {
            if let Some(bounds) = bounds {
                validate_bounds(param, &bounds)?;
            }
        }

        if let Some(scale) = self.scale {
            let [kx, ky] = scale.to_pair();
            if !(kx.is_finite() && ky.is_finite() && kx > 0.0 && ky > 0.0) {
                return Err(TilerError::invalid_config(
                    "scale",
                    format!("must be positive, got {:?}", scale.to_pair()),
                ));
            }
        }

        Ok(())
    }

    pub fn projection_kind(&self) -> TilerResult<ProjectionKind> {
        self.projection.parse()
    }

    pub fn template(&self) -> TilerResult<TileUrlTemplate> {
        TileUrlTemplate::parse(&self.tile_url_template)
    }

    /// Options handed to the projection factory.
    pub fn projection_options(&self) -> ProjectionOptions {
        ProjectionOptions {
            coord_order: Some(self.coord_order),
            bounds: self.projection_bounds.or(self.bounds),
            scale: self.scale.map(Scale::to_pair),
            cycled: self.cycled,
            eccentricity: None,
        }
    }
}

fn validate_bounds(param: &str, bounds: &Bounds) -> TilerResult<()> {
    if !bounds.is_finite() {
        return Err(TilerError::invalid_config(param, "corners must be finite numbers"));
    }
    let degenerate = (0..2).any(|axis| bounds.span(axis) == 0.0);
    if degenerate {
        return Err(TilerError::invalid_config(
            param,
            format!("corners {:?} must differ on both axes", bounds.0),
        ));
    }
    Ok(())
}
