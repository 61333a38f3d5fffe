//! JSON output for tool integration
//!
//! When --json-progress flag is enabled, all progress and status information
//! is emitted as JSON lines to stdout, suppressing all other output.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::image_processing::batch::ProcessingStats;
use crate::image_processing::{FileOutcome, ProcessingResult, Region};

/// Last progress emission timestamp (milliseconds since epoch)
/// Used for throttling progress updates to ~25 FPS (40ms between updates)
static LAST_PROGRESS_MS: AtomicU64 = AtomicU64::new(0);

/// Crop rectangle as `[x_min, y_min, x_max, y_max]`
pub type Bounds = [u32; 4];

fn bounds(region: &Region) -> Bounds {
    [region.x_min, region.y_min, region.x_max, region.y_max]
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// Progress update
    Progress {
        current: usize,
        total: usize,
        message: String,
    },
    /// File processing completed
    FileCompleted {
        input_path: String,
        output_path: String,
        /// False for dry runs and skipped files
        written: bool,
        faces: usize,
        head_region: Option<Bounds>,
        crop: Option<Bounds>,
        processing_time_ms: u128,
    },
    /// File processing failed
    FileFailed { input_path: String, error: String },
    /// Processing summary
    Summary {
        total_files: usize,
        processed: usize,
        skipped: usize,
        failed: usize,
        with_faces: usize,
        center_cropped: usize,
        duration_secs: f64,
    },
    /// Input directory held no matching files
    NoInput { input_dir: String },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Create and emit progress message (throttled to ~25 FPS)
    ///
    /// The final progress (current == total) is always emitted.
    pub fn progress(current: usize, total: usize, message: impl Into<String>) {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let last_ms = LAST_PROGRESS_MS.load(Ordering::Relaxed);

        if now_ms.saturating_sub(last_ms) >= 40 || current == total {
            LAST_PROGRESS_MS.store(now_ms, Ordering::Relaxed);
            Self::Progress {
                current,
                total,
                message: message.into(),
            }
            .emit();
        }
    }

    pub fn completed(result: &ProcessingResult) -> Self {
        let decision = result.decision();
        Self::FileCompleted {
            input_path: result.input_path.display().to_string(),
            output_path: result.output_path.display().to_string(),
            written: matches!(result.outcome, FileOutcome::Written(_)),
            faces: decision.map_or(0, |d| d.face_count()),
            head_region: decision.and_then(|d| d.head_region.as_ref()).map(bounds),
            crop: decision.map(|d| bounds(&d.crop)),
            processing_time_ms: result.processing_time.as_millis(),
        }
    }

    pub fn failed(input_path: &Path, error: &anyhow::Error) -> Self {
        Self::FileFailed {
            input_path: input_path.display().to_string(),
            error: format!("{:#}", error),
        }
    }

    pub fn summary(stats: &ProcessingStats) -> Self {
        Self::Summary {
            total_files: stats.total_files,
            processed: stats.successful,
            skipped: stats.skipped,
            failed: stats.failed,
            with_faces: stats.with_faces,
            center_cropped: stats.center_cropped,
            duration_secs: stats.total_duration.as_secs_f64(),
        }
    }

    pub fn no_input(input_dir: &Path) -> Self {
        Self::NoInput {
            input_dir: input_dir.display().to_string(),
        }
    }
}
