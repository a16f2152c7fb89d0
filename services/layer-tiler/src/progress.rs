//! Log-based progress reporting.

use std::path::Path;
use std::time::Instant;

use pyramid::{RenderObserver, RenderSummary};
use tiler_common::{TileCoord, TilerError};
use tracing::{error, info};

/// Tiles between two progress lines within a zoom level.
const REPORT_EVERY: usize = 500;

#[derive(Debug)]
pub struct ProgressReporter {
    started: Instant,
    zoom_started: Instant,
    zoom_total: usize,
    zoom_done: usize,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            zoom_started: Instant::now(),
            zoom_total: 0,
            zoom_done: 0,
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderObserver for ProgressReporter {
    fn zoom_started(&mut self, _zoom: u32, tiles: usize) {
        self.zoom_started = Instant::now();
        self.zoom_total = tiles;
        self.zoom_done = 0;
    }

    fn tile_rendered(&mut self, coord: TileCoord, _path: &Path) {
        self.zoom_done += 1;
        if self.zoom_done % REPORT_EVERY == 0 {
            info!(
                zoom = coord.z,
                done = self.zoom_done,
                total = self.zoom_total,
                percent = self.zoom_done * 100 / self.zoom_total.max(1),
                "Progress"
            );
        }
    }

    fn zoom_finished(&mut self, zoom: u32, tiles: usize) {
        info!(
            zoom,
            tiles,
            elapsed_ms = self.zoom_started.elapsed().as_millis() as u64,
            "Zoom level done"
        );
    }

    fn job_finished(&mut self, summary: &RenderSummary) {
        info!(
            tiles = summary.tiles_written,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Job finished"
        );
    }

    fn job_failed(&mut self, e: &TilerError) {
        error!(
            error = %e,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Job failed"
        );
    }
}
