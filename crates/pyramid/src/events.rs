//! Render progress hooks.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tiler_common::{TileCoord, TilerError};

use crate::tiler::RenderSummary;

/// Receives progress notifications from a running job. All hooks default to
/// doing nothing.
pub trait RenderObserver: Send {
    fn zoom_started(&mut self, _zoom: u32, _tiles: usize) {}

    fn tile_rendered(&mut self, _coord: TileCoord, _path: &Path) {}

    fn zoom_finished(&mut self, _zoom: u32, _tiles: usize) {}

    fn job_finished(&mut self, _summary: &RenderSummary) {}

    fn job_failed(&mut self, _error: &TilerError) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    ZoomStarted { zoom: u32, tiles: usize },
    TileRendered { coord: TileCoord, path: PathBuf },
    ZoomFinished { zoom: u32, tiles: usize },
    JobFinished { tiles_written: u64 },
    JobFailed { message: String },
}

/// Observer recording every event. Clones share the same log, so one copy
/// can be handed to the engine and the other inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn record(&self, event: RenderEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl RenderObserver for EventLog {
    fn zoom_started(&mut self, zoom: u32, tiles: usize) {
        self.record(RenderEvent::ZoomStarted { zoom, tiles });
    }

    fn tile_rendered(&mut self, coord: TileCoord, path: &Path) {
        self.record(RenderEvent::TileRendered {
            coord,
            path: path.to_path_buf(),
        });
    }

    fn zoom_finished(&mut self, zoom: u32, tiles: usize) {
        self.record(RenderEvent::ZoomFinished { zoom, tiles });
    }

    fn job_finished(&mut self, summary: &RenderSummary) {
        self.record(RenderEvent::JobFinished {
            tiles_written: summary.tiles_written,
        });
    }

    fn job_failed(&mut self, error: &TilerError) {
        self.record(RenderEvent::JobFailed {
            message: error.to_string(),
        });
    }
}
