//! The tile pyramid engine.
//!
//! A [`Tiler`] owns one job: its configuration, the layout derived from it
//! and the source raster. Rendering walks the zoom levels from the most
//! detailed one down, shrinking the source between levels, and writes every
//! tile of a level before moving on.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use projection::{ProjectionFactory, ProjectionKind};
use renderer::{CropWindow, ImageSource, PageData, PageRenderer, RasterError, SourceImage, Tile};
use serde::Serialize;
use tiler_common::{TileCoord, TilerError, TilerResult};
use tracing::{debug, info, warn};

use crate::config::{MaxZoom, TilerConfig};
use crate::events::RenderObserver;
use crate::layout::{BoundedLayout, CenteredLayout, TileLayout};
use crate::tasks::TaskChain;
use crate::template::TileUrlTemplate;

/// Name of the preview page written next to the tiles.
pub const PREVIEW_PAGE: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TilerState {
    Idle,
    SourceOpened,
    Rendering(u32),
    Done,
    Failed(String),
}

/// What a finished job produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSummary {
    pub min_zoom: u32,
    pub max_zoom: u32,
    pub tiles_written: u64,
    pub tiles_per_zoom: BTreeMap<u32, u64>,
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_page: Option<PathBuf>,
}

pub struct Tiler {
    config: TilerConfig,
    projection_kind: ProjectionKind,
    layout: Box<dyn TileLayout>,
    template: TileUrlTemplate,
    source: Option<Box<dyn SourceImage + Send>>,
    state: TilerState,
    observers: Vec<Box<dyn RenderObserver>>,
    tiles_per_zoom: BTreeMap<u32, u64>,
}

impl std::fmt::Debug for Tiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tiler")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .field("state", &self.state)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl Tiler {
    /// Validate `config` and set up the projection and layout.
    pub fn new(config: TilerConfig) -> TilerResult<Self> {
        config.validate()?;

        let projection_kind = config.projection_kind()?;
        let template = config.template()?;
        let projection = ProjectionFactory::default()
            .create_kind(projection_kind, &config.projection_options())?;

        let layout: Box<dyn TileLayout> = match config.bounds {
            Some(bounds) => Box::new(BoundedLayout::new(bounds, projection, config.tile_size)),
            None => Box::new(CenteredLayout::new(config.tile_size)),
        };

        info!(
            projection = %projection_kind,
            bounded = config.bounds.is_some(),
            tile_size = config.tile_size,
            output = %config.output.display(),
            "Tiler configured"
        );

        Ok(Self {
            config,
            projection_kind,
            layout,
            template,
            source: None,
            state: TilerState::Idle,
            observers: Vec::new(),
            tiles_per_zoom: BTreeMap::new(),
        })
    }

    pub fn config(&self) -> &TilerConfig {
        &self.config
    }

    pub fn state(&self) -> &TilerState {
        &self.state
    }

    pub fn layout(&self) -> &dyn TileLayout {
        self.layout.as_ref()
    }

    /// Register a progress observer.
    pub fn add_observer(&mut self, observer: impl RenderObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn with_observer(mut self, observer: impl RenderObserver + 'static) -> Self {
        self.add_observer(observer);
        self
    }

    /// Decode the source image at `path`.
    pub fn open_source(&mut self, path: impl AsRef<Path>) -> TilerResult<()> {
        let path = path.as_ref();
        let source = ImageSource::open(path).map_err(|e| match e {
            RasterError::Decode { path, message } => TilerError::Decode { path, message },
            other => TilerError::decode(path, other),
        })?;
        self.attach_source(source);
        Ok(())
    }

    /// Use an already decoded source.
    pub fn attach_source(&mut self, source: impl SourceImage + Send + 'static) {
        debug!(
            width = source.width(),
            height = source.height(),
            "Source attached"
        );
        self.source = Some(Box::new(source));
        self.state = TilerState::SourceOpened;
    }

    /// Current source size.
    pub fn source_size(&self) -> TilerResult<(u32, u32)> {
        self.source
            .as_deref()
            .map(|source| (source.width(), source.height()))
            .ok_or(TilerError::NoSource)
    }

    /// Highest zoom level to render for the current source.
    pub fn max_zoom(&self) -> TilerResult<u32> {
        match self.config.max_zoom {
            MaxZoom::Level(level) => Ok(level),
            MaxZoom::Auto => {
                let (width, height) = self.source_size()?;
                let auto = self.layout.auto_max_zoom(width, height);
                Ok(auto.max(self.config.min_zoom))
            }
        }
    }

    /// Tiles that `render` would write at `zoom` for the current source size.
    pub fn tiles_at_zoom(&self, zoom: u32) -> TilerResult<Vec<TileCoord>> {
        let (width, height) = self.source_size()?;
        Ok(self.layout.tiles_at_zoom(zoom, width, height))
    }

    /// Crop windows for `coord` against the current source size.
    pub fn crop_windows(&self, coord: TileCoord) -> TilerResult<Vec<CropWindow>> {
        let (width, height) = self.source_size()?;
        Ok(self.layout.crop_windows(coord, width, height))
    }

    /// Render the whole pyramid.
    ///
    /// The source is resampled in place while rendering and released at the
    /// end, whether or not the job succeeds; open it again to render twice.
    pub fn render(&mut self) -> TilerResult<RenderSummary> {
        let max_zoom = self.max_zoom()?;
        let min_zoom = self.config.min_zoom;
        self.tiles_per_zoom.clear();

        let mut chain: TaskChain<Tiler> = TaskChain::new();
        for zoom in (min_zoom..=max_zoom).rev() {
            chain
                .push(format!("create directory for zoom {}", zoom), move |tiler: &mut Tiler| {
                    tiler.create_zoom_dir(zoom)
                })
                .push(format!("render zoom {}", zoom), move |tiler: &mut Tiler| {
                    tiler.render_zoom(zoom)
                });
        }
        if self.config.preview_page {
            chain.push("write preview page", move |tiler: &mut Tiler| {
                tiler.write_preview(min_zoom, max_zoom)
            });
        }

        info!(min_zoom, max_zoom, steps = chain.len(), "Rendering pyramid");
        let outcome = chain.run(self);
        self.source = None;

        match outcome.into_result() {
            Ok(_) => {
                let summary = RenderSummary {
                    min_zoom,
                    max_zoom,
                    tiles_written: self.tiles_per_zoom.values().sum(),
                    tiles_per_zoom: self.tiles_per_zoom.clone(),
                    output: self.config.output.clone(),
                    preview_page: self
                        .config
                        .preview_page
                        .then(|| self.config.output.join(PREVIEW_PAGE)),
                };
                self.state = TilerState::Done;
                for observer in self.observers.iter_mut() {
                    observer.job_finished(&summary);
                }
                info!(tiles = summary.tiles_written, "Pyramid complete");
                Ok(summary)
            }
            Err(e) => {
                self.state = TilerState::Failed(e.to_string());
                for observer in self.observers.iter_mut() {
                    observer.job_failed(&e);
                }
                warn!(error = %e, "Pyramid rendering aborted");
                Err(e)
            }
        }
    }

    fn create_zoom_dir(&mut self, zoom: u32) -> TilerResult<()> {
        let dir = self.template.zoom_dir(&self.config.output, zoom);
        create_dir(&dir)?;
        debug!(zoom, path = %dir.display(), "Created zoom directory");
        Ok(())
    }

    fn render_zoom(&mut self, zoom: u32) -> TilerResult<()> {
        self.state = TilerState::Rendering(zoom);

        let source = self.source.as_deref_mut().ok_or(TilerError::NoSource)?;
        if let Some((width, height)) =
            self.layout
                .resize_for_zoom(zoom, source.width(), source.height())
        {
            source.resize(width, height).map_err(|e| TilerError::Crop {
                coord: TileCoord::new(zoom, 0, 0),
                message: format!("resizing source to {}x{}: {}", width, height, e),
            })?;
        }

        let source = self.source.as_deref().ok_or(TilerError::NoSource)?;
        let (width, height) = (source.width(), source.height());
        let tiles = self.layout.tiles_at_zoom(zoom, width, height);

        info!(zoom, tiles = tiles.len(), width, height, "Rendering zoom level");
        for observer in self.observers.iter_mut() {
            observer.zoom_started(zoom, tiles.len());
        }

        for &coord in &tiles {
            let path = self.write_tile(source, coord)?;
            for observer in self.observers.iter_mut() {
                observer.tile_rendered(coord, &path);
            }
        }

        self.tiles_per_zoom.insert(zoom, tiles.len() as u64);
        for observer in self.observers.iter_mut() {
            observer.zoom_finished(zoom, tiles.len());
        }
        Ok(())
    }

    fn write_tile(&self, source: &(dyn SourceImage + Send), coord: TileCoord) -> TilerResult<PathBuf> {
        let mut tile = Tile::new(self.config.tile_size);
        let windows = self
            .layout
            .crop_windows(coord, source.width(), source.height());

        for window in &windows {
            source
                .crop_into(&mut tile, window)
                .map_err(|e| TilerError::Crop {
                    coord,
                    message: e.to_string(),
                })?;
        }

        let path = self.template.tile_path(
            &self.config.output,
            coord,
            self.config.tile_type.extension(),
        );
        if self.template.has_tile_dirs() {
            if let Some(parent) = path.parent() {
                create_dir(parent)?;
            }
        }

        tile.save(&path, self.config.tile_type, self.config.jpeg_quality)
            .map_err(|e| match e {
                RasterError::Io { path, source } => TilerError::Write { path, source },
                other => TilerError::Encode {
                    coord,
                    message: other.to_string(),
                },
            })?;

        debug!(
            zoom = coord.z,
            x = coord.x,
            y = coord.y,
            windows = windows.len(),
            path = %path.display(),
            "Wrote tile"
        );
        Ok(path)
    }

    fn write_preview(&mut self, min_zoom: u32, max_zoom: u32) -> TilerResult<()> {
        let data = PageData {
            min_zoom,
            max_zoom,
            tile_url_template: self.template.viewer_url(),
            tile_type: self.config.tile_type.extension().to_string(),
            projection: self.projection_kind.name().to_string(),
        };
        let path = self.config.output.join(PREVIEW_PAGE);

        PageRenderer::default()
            .save(&path, &data)
            .map_err(|e| match e {
                RasterError::Io { path, source } => TilerError::Write { path, source },
                other => TilerError::Write {
                    path: path.clone(),
                    source: io::Error::new(io::ErrorKind::Other, other.to_string()),
                },
            })
    }
}

fn create_dir(path: &Path) -> TilerResult<()> {
    fs::create_dir_all(path).map_err(|source| TilerError::Directory {
        path: path.to_path_buf(),
        source,
    })
}
