use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::info;
use ztrack_core::io::open_video;
use ztrack_core::tracking::{track_video, PoseTable, TrackingConfig};

use super::config::{load_config, save_config};
use crate::progress::GroupProgress;
use crate::summary::{print_results, print_run_summary};

#[derive(Args)]
pub struct TrackArgs {
    /// Input SER file or image directory
    pub file: PathBuf,

    /// Tracking config file (.json or .toml); defaults to eye and tail
    /// trackers with default parameters
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file for the pose tables (default: <input>.pose.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the effective configuration to this file
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

/// Everything written for one tracked video.
#[derive(Serialize)]
struct TrackingOutput<'a> {
    video: &'a Path,
    frames: usize,
    fps: Option<f64>,
    config: &'a TrackingConfig,
    tables: &'a BTreeMap<String, PoseTable>,
}

pub fn run(args: &TrackArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => TrackingConfig::default_for(&["eye", "tail"])?,
    };
    // Fails on unknown methods or bad parameters before any frame is read.
    let mut trackers = config.build_trackers().context("Invalid tracking config")?;

    let video = open_video(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.file.with_extension("pose.json"));

    print_run_summary(&args.file, video.as_ref(), &trackers);

    let progress = GroupProgress::new();
    let tables = track_video(video.as_ref(), &mut trackers, &progress)?;
    progress.finish();

    let effective =
        TrackingConfig::from_trackers(trackers.iter().map(|(g, t)| (g.as_str(), t.as_ref())));
    if let Some(ref path) = args.save_config {
        save_config(&effective, path)?;
        info!(path = %path.display(), "Saved effective config");
    }

    let result = TrackingOutput {
        video: &args.file,
        frames: video.len(),
        fps: video.fps(),
        config: &effective,
        tables: &tables,
    };
    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &result)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_results(&tables);
    println!("\nPose tables saved to {}", output.display());
    Ok(())
}
