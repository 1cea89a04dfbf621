//! The tracker contract and its variants.
//!
//! A tracker crops each frame to its ROI, runs one algorithm on the crop and
//! names the raw numbers it produced. Eye and tail trackers hold a stateless
//! strategy object; the free-swim tracker composes both with background
//! subtraction.

pub mod config;
pub mod eye;
pub mod free_swim;
pub mod none;
pub mod orchestrator;
pub mod pose;
pub mod registry;
pub mod shapes;
pub mod tail;

use ndarray::Array2;
use tracing::debug;

use crate::error::Result;
use crate::frame::{Frame, FrameSource};
use crate::params::{ParamMap, ParameterSet};
use crate::roi::{crop_to_roi, Roi};

pub use config::{TrackerConfig, TrackingConfig};
pub use eye::EyeTracker;
pub use free_swim::FreeSwimTracker;
pub use none::NoneTracker;
pub use orchestrator::track_video;
pub use pose::{PoseRecord, PoseTable};
pub use registry::TrackerKind;
pub use shapes::{Geometry, Shape};
pub use tail::TailTracker;

/// Stage of a tracking run, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingStage {
    Background,
    Tracking,
}

impl std::fmt::Display for TrackingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Background => write!(f, "Computing background"),
            Self::Tracking => write!(f, "Tracking frames"),
        }
    }
}

/// Thread-safe progress reporting for tracking runs.
///
/// Several groups may report at once when they run in parallel. All
/// methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A group entered a new stage. `total_items` is the number of frames
    /// in this stage, if known.
    fn begin_stage(&self, _group: &str, _stage: TrackingStage, _total_items: Option<usize>) {}

    /// `items_done` frames of the current stage have completed.
    fn advance(&self, _group: &str, _items_done: usize) {}

    /// The group is done with its current stage.
    fn finish_stage(&self, _group: &str) {}
}

pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// A configurable per-frame pose tracker.
pub trait Tracker: Send {
    /// Identifier stored in saved configurations.
    fn name(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    fn parameters(&self) -> &ParameterSet;

    fn parameters_mut(&mut self) -> &mut ParameterSet;

    /// Apply saved parameter values. Unknown names are skipped; an invalid
    /// value leaves every parameter unchanged.
    fn configure(&mut self, map: &ParamMap) -> Result<()> {
        self.parameters_mut().apply_map(map)
    }

    fn roi(&self) -> Option<Roi>;

    fn set_roi(&mut self, roi: Option<Roi>);

    /// Column names of the records this tracker produces with its current
    /// parameters.
    fn columns(&self) -> Vec<String>;

    /// Track one full frame. Coordinates in the record are full-frame.
    fn track_frame(&self, frame: &Frame) -> Result<PoseRecord>;

    /// Overlays for the last annotated record.
    fn shapes(&self) -> &[Shape];

    /// Rebuild the overlays from a stored record without re-tracking.
    fn annotate(&mut self, record: &PoseRecord);

    /// Per-video setup run once before the first frame.
    fn prepare(&mut self, _source: &dyn FrameSource) -> Result<()> {
        Ok(())
    }

    /// Track every frame of `source` in order.
    fn track_frames(&mut self, source: &dyn FrameSource) -> Result<PoseTable> {
        self.track_frames_reported(source, "", &NoOpReporter)
    }

    /// Track every frame, reporting progress under `group`.
    ///
    /// Frames that fail with a tracking error are recorded as NaN rows;
    /// any other error stops the run.
    fn track_frames_reported(
        &mut self,
        source: &dyn FrameSource,
        group: &str,
        reporter: &dyn ProgressReporter,
    ) -> Result<PoseTable> {
        reporter.begin_stage(group, TrackingStage::Background, None);
        self.prepare(source)?;
        reporter.finish_stage(group);

        let columns = self.columns();
        let mut table = PoseTable::new(columns.clone());
        reporter.begin_stage(group, TrackingStage::Tracking, Some(source.len()));
        for index in 0..source.len() {
            let frame = source.frame(index)?;
            let record = match self.track_frame(&frame) {
                Ok(record) => record,
                Err(e) if e.is_tracking() => {
                    debug!(frame = index, tracker = self.name(), error = %e, "Frame not tracked");
                    PoseRecord::missing(columns.clone())
                }
                Err(e) => return Err(e),
            };
            table.push(record)?;
            reporter.advance(group, index + 1);
        }
        reporter.finish_stage(group);
        Ok(table)
    }
}

/// Grayscale crop of a frame to an optional ROI.
pub(crate) fn frame_region(frame: &Frame, roi: Option<&Roi>) -> Array2<u8> {
    crop_to_roi(&frame.to_gray(), roi)
}

/// Column names `<prefix>_<field>` in order.
pub(crate) fn prefixed(prefix: &str, fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| format!("{prefix}_{f}")).collect()
}
