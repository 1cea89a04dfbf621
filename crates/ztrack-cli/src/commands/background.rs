use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ztrack_core::background::{cache_path, load_or_compute, BackgroundSubtraction};
use ztrack_core::consts::DEFAULT_BACKGROUND_SAMPLES;
use ztrack_core::io::open_video;

#[derive(Args)]
pub struct BackgroundArgs {
    /// Input SER file or image directory
    pub file: PathBuf,

    /// Number of frames sampled for the median
    #[arg(long, default_value_t = DEFAULT_BACKGROUND_SAMPLES)]
    pub samples: usize,

    /// Delete the cached background and compute it again
    #[arg(long)]
    pub recompute: bool,

    /// Only delete the cached background
    #[arg(long, conflicts_with = "recompute")]
    pub delete: bool,
}

pub fn run(args: &BackgroundArgs) -> Result<()> {
    let cache = cache_path(&args.file);

    if args.delete || args.recompute {
        BackgroundSubtraction::new().invalidate(Some(&args.file))?;
        if args.delete {
            println!("Deleted {}", cache.display());
            return Ok(());
        }
    }

    let video = open_video(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let model = load_or_compute(video.as_ref(), args.samples)
        .context("Background estimation failed")?;

    let (h, w) = model.background.dim();
    println!("Background:  {}", cache.display());
    println!("Dimensions:  {w}x{h}");
    println!(
        "Subject:     {}",
        if model.subject_darker {
            "darker than background"
        } else {
            "brighter than background"
        }
    );
    Ok(())
}
