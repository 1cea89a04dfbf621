use std::path::{Path, PathBuf};

use crate::error::{Result, ZtrackError};
use crate::frame::{Frame, FrameSource};

use super::image_io::load_frame;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "tif", "tiff", "bmp", "jpg"];

/// A directory of still images played back as a video, ordered by file name.
pub struct ImageSequence {
    dir: PathBuf,
    files: Vec<PathBuf>,
    fps: Option<f64>,
}

impl ImageSequence {
    pub fn open(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if path.is_file() && is_image {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(ZtrackError::EmptySequence);
        }
        files.sort();

        Ok(Self {
            dir: dir.to_path_buf(),
            files,
            fps: None,
        })
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }
}

impl FrameSource for ImageSequence {
    fn len(&self) -> usize {
        self.files.len()
    }

    fn frame(&self, index: usize) -> Result<Frame> {
        let path = self
            .files
            .get(index)
            .ok_or(ZtrackError::FrameIndexOutOfRange {
                index,
                total: self.files.len(),
            })?;
        load_frame(path)
    }

    fn fps(&self) -> Option<f64> {
        self.fps
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.dir)
    }
}
