//! Job configuration loading and command line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use pyramid::{MaxZoom, Scale, TilerConfig};
use renderer::TileFormat;
use tiler_common::{Bounds, CoordOrder};
use tracing::info;

/// Load a YAML job file, or the defaults when no file is given.
pub fn load(path: Option<&Path>) -> Result<TilerConfig> {
    let Some(path) = path else {
        return Ok(TilerConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    let config: TilerConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {:?}", path))?;

    info!(path = %path.display(), "Loaded job configuration");
    Ok(config)
}

/// Settings that take precedence over the job file.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Output directory
    #[arg(short, long, env = "LAYER_TILER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Projection: cartesian, sphericalMercator or wgs84Mercator
    #[arg(short, long)]
    pub projection: Option<String>,

    /// Coordinate order of bounds: latlong or longlat
    #[arg(long)]
    pub coord_order: Option<CoordOrder>,

    /// Source bounds as "a,b,c,d" (lower corner, then upper corner)
    #[arg(long, allow_hyphen_values = true)]
    pub bounds: Option<Bounds>,

    /// Cartesian scale as "k" or "kx,ky"
    #[arg(long)]
    pub scale: Option<Scale>,

    /// Tile edge in pixels
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Tile format: png or jpeg
    #[arg(long)]
    pub tile_type: Option<TileFormat>,

    /// Tile path template with %z, %x and %y
    #[arg(long)]
    pub tile_url_template: Option<String>,

    #[arg(long)]
    pub min_zoom: Option<u32>,

    /// Highest zoom, or "auto"
    #[arg(long)]
    pub max_zoom: Option<MaxZoom>,

    #[arg(long)]
    pub jpeg_quality: Option<u8>,

    /// Do not write index.html
    #[arg(long)]
    pub no_preview: bool,
}

impl ConfigOverrides {
    pub fn apply(self, mut config: TilerConfig) -> TilerConfig {
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(projection) = self.projection {
            config.projection = projection;
        }
        if let Some(coord_order) = self.coord_order {
            config.coord_order = coord_order;
        }
        if let Some(bounds) = self.bounds {
            config.bounds = Some(bounds);
        }
        if let Some(scale) = self.scale {
            config.scale = Some(scale);
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(tile_type) = self.tile_type {
            config.tile_type = tile_type;
        }
        if let Some(template) = self.tile_url_template {
            config.tile_url_template = template;
        }
        if let Some(min_zoom) = self.min_zoom {
            config.min_zoom = min_zoom;
        }
        if let Some(max_zoom) = self.max_zoom {
            config.max_zoom = max_zoom;
        }
        if let Some(quality) = self.jpeg_quality {
            config.jpeg_quality = quality;
        }
        if self.no_preview {
            config.preview_page = false;
        }
        config
    }
}
