use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::frame::FrameSource;

use super::{PoseTable, ProgressReporter, Tracker};

/// Run every tracker group over the same video, one rayon task per group.
///
/// Each tracker prepares itself (background) and tracks all frames in
/// order. The first non-tracking error of any group is returned.
pub fn track_video(
    source: &dyn FrameSource,
    trackers: &mut [(String, Box<dyn Tracker>)],
    reporter: &dyn ProgressReporter,
) -> Result<BTreeMap<String, PoseTable>> {
    info!(
        groups = trackers.len(),
        frames = source.len(),
        "Tracking video"
    );

    let tables = trackers
        .par_iter_mut()
        .map(|(group, tracker)| {
            let table = tracker.track_frames_reported(source, group, reporter)?;
            info!(
                group = %group,
                tracker = tracker.name(),
                missing = table.missing_count(),
                "Group done"
            );
            Ok((group.clone(), table))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(tables.into_iter().collect())
}
