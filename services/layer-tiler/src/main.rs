//! Layer tiler command line tool.
//!
//! Cuts one large image into a pyramid of map tiles plus a preview page:
//! - YAML job file with command line overrides
//! - KML ground overlay as source image and bounds
//! - Geographic (Mercator) or planar (Cartesian) placement
//! - PNG or JPEG tiles

mod config;
mod kml;
mod progress;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use pyramid::{RenderSummary, Tiler, TilerConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::ConfigOverrides;
use progress::ProgressReporter;

#[derive(Parser, Debug)]
#[command(name = "layer-tiler")]
#[command(about = "Cut a large image into a map tile pyramid")]
struct Args {
    /// Source image (defaults to the KML overlay's image)
    #[arg(required_unless_present = "kml")]
    source: Option<PathBuf>,

    /// KML file whose first GroundOverlay gives the image and bounds
    #[arg(long)]
    kml: Option<PathBuf>,

    /// YAML job file
    #[arg(short, long, env = "LAYER_TILER_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr; stdout carries the summary.
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let explicit_bounds = args.overrides.bounds.is_some();
    let mut config = args.overrides.apply(config::load(args.config.as_deref())?);
    let source = resolve_source(&mut config, args.source, args.kml.as_deref(), explicit_bounds)?;

    info!(
        source = %source.display(),
        output = %config.output.display(),
        projection = %config.projection,
        max_zoom = %config.max_zoom,
        "Starting layer tiler"
    );

    let summary = tokio::task::spawn_blocking(move || run_job(config, &source))
        .await
        .context("Render task panicked")??;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Source image of the job. A KML overlay supplies the image when none is
/// given and the bounds unless `--bounds` was passed.
fn resolve_source(
    config: &mut TilerConfig,
    source: Option<PathBuf>,
    kml_path: Option<&Path>,
    explicit_bounds: bool,
) -> Result<PathBuf> {
    let Some(kml_path) = kml_path else {
        return source.context("No source image given");
    };

    let overlay = kml::load(kml_path)?;
    if !explicit_bounds {
        config.bounds = Some(overlay.bounds(config.coord_order));
    }
    Ok(source.unwrap_or_else(|| overlay.image_path(kml_path)))
}

fn run_job(config: TilerConfig, source: &Path) -> Result<RenderSummary> {
    let mut tiler = Tiler::new(config).context("Invalid job configuration")?;
    tiler.add_observer(ProgressReporter::new());
    tiler
        .open_source(source)
        .with_context(|| format!("Failed to open source image {:?}", source))?;

    let summary = tiler.render().context("Rendering failed")?;
    Ok(summary)
}
