use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ztrack_core::background::cache_path;
use ztrack_core::io::open_video;

#[derive(Args)]
pub struct InfoArgs {
    /// Input SER file or image directory
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let video = open_video(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    println!("File:        {}", args.file.display());
    println!("Frames:      {}", video.len());
    if !video.is_empty() {
        let first = video.frame(0)?;
        println!("Dimensions:  {}x{}", first.width(), first.height());
    }
    match video.fps() {
        Some(fps) => println!("Frame rate:  {fps:.2} fps"),
        None => println!("Frame rate:  unknown"),
    }

    let background = cache_path(&args.file);
    if background.is_file() {
        println!("Background:  {}", background.display());
    } else {
        println!("Background:  not computed");
    }

    Ok(())
}
