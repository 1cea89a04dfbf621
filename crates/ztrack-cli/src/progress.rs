use std::collections::HashMap;
use std::sync::Mutex;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use ztrack_core::tracking::{ProgressReporter, TrackingStage};

/// One progress bar per tracker group.
pub struct GroupProgress {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl GroupProgress {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    /// Mark every bar as done.
    pub fn finish(&self) {
        if let Ok(bars) = self.bars.lock() {
            for pb in bars.values() {
                pb.finish_with_message("Done");
            }
        }
    }

    fn with_bar(&self, group: &str, f: impl FnOnce(&ProgressBar)) {
        let Ok(bars) = self.bars.lock() else {
            return;
        };
        if let Some(pb) = bars.get(group) {
            f(pb);
        }
    }
}

impl ProgressReporter for GroupProgress {
    fn begin_stage(&self, group: &str, stage: TrackingStage, total_items: Option<usize>) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };
        let pb = bars
            .entry(group.to_string())
            .or_insert_with(|| self.multi.add(ProgressBar::new(0)));

        match total_items {
            Some(total) => {
                pb.set_length(total as u64);
                pb.set_position(0);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{prefix:10} {msg:20} [{bar:40}] {pos}/{len} frames")
                {
                    pb.set_style(style.progress_chars("=> "));
                }
            }
            None => {
                if let Ok(style) =
                    ProgressStyle::default_spinner().template("{prefix:10} {spinner} {msg}")
                {
                    pb.set_style(style);
                }
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
            }
        }
        pb.set_prefix(group.to_string());
        pb.set_message(stage.to_string());
    }

    fn advance(&self, group: &str, items_done: usize) {
        self.with_bar(group, |pb| pb.set_position(items_done as u64));
    }

    fn finish_stage(&self, group: &str) {
        self.with_bar(group, |pb| {
            pb.disable_steady_tick();
            pb.tick();
        });
    }
}
