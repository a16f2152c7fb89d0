//! Tile pyramid engine.
//!
//! Turns one decoded source raster into a pyramid of fixed-size tiles, one
//! zoom level at a time from the most detailed level down:
//! - [`config`]: job configuration and validation
//! - [`layout`]: which tiles exist at a zoom and where their pixels come from
//! - [`template`]: tile file naming
//! - [`tasks`]: the sequential step runner driving a job
//! - [`events`]: progress hooks
//! - [`tiler`]: the engine tying it together

pub mod config;
pub mod events;
pub mod layout;
pub mod tasks;
pub mod template;
pub mod tiler;

pub use config::{MaxZoom, Scale, TilerConfig};
pub use events::{EventLog, RenderEvent, RenderObserver};
pub use layout::{BoundedLayout, CenteredLayout, TileLayout};
pub use renderer::CropWindow;
pub use tasks::{ChainOutcome, StepFailure, TaskChain};
pub use template::TileUrlTemplate;
pub use tiler::{RenderSummary, Tiler, TilerState};
