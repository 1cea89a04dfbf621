use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3, Axis};

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{Result, ZtrackError};

/// A single video frame, 8 bits per channel.
///
/// Gray frames are `(height, width)`, RGB frames `(height, width, 3)`.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Gray(Array2<u8>),
    Rgb(Array3<u8>),
}

impl Frame {
    pub fn width(&self) -> usize {
        match self {
            Self::Gray(data) => data.ncols(),
            Self::Rgb(data) => data.len_of(Axis(1)),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Gray(data) => data.nrows(),
            Self::Rgb(data) => data.len_of(Axis(0)),
        }
    }

    /// Grayscale view of the frame. Gray frames are returned as a copy.
    pub fn to_gray(&self) -> Array2<u8> {
        match self {
            Self::Gray(data) => data.clone(),
            Self::Rgb(data) => rgb_to_gray(data),
        }
    }
}

impl From<Array2<u8>> for Frame {
    fn from(data: Array2<u8>) -> Self {
        Self::Gray(data)
    }
}

/// BT.601 luminance of an interleaved RGB array, rounded to the nearest level.
pub fn rgb_to_gray(rgb: &Array3<u8>) -> Array2<u8> {
    let (h, w, _) = rgb.dim();
    Array2::from_shape_fn((h, w), |(row, col)| {
        let r = rgb[[row, col, 0]] as f32;
        let g = rgb[[row, col, 1]] as f32;
        let b = rgb[[row, col, 2]] as f32;
        (LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b)
            .round()
            .clamp(0.0, 255.0) as u8
    })
}

/// Indexable sequence of frames (a decoded video).
///
/// The engine needs random access, the frame count and, for background
/// caching, the path the frames came from.
pub trait FrameSource: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn frame(&self, index: usize) -> Result<Frame>;

    /// Average frame rate hint, if the container records one.
    fn fps(&self) -> Option<f64> {
        None
    }

    /// Location of the underlying video on disk, if any.
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// Frames held in memory. Mostly useful for tests and for callers that
/// decode video themselves.
#[derive(Clone, Debug, Default)]
pub struct MemoryVideo {
    frames: Vec<Frame>,
    fps: Option<f64>,
    path: Option<PathBuf>,
}

impl MemoryVideo {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            fps: None,
            path: None,
        }
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Associate a path so the background model can be cached next to it.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }
}

impl FrameSource for MemoryVideo {
    fn len(&self) -> usize {
        self.frames.len()
    }

    fn frame(&self, index: usize) -> Result<Frame> {
        self.frames
            .get(index)
            .cloned()
            .ok_or(ZtrackError::FrameIndexOutOfRange {
                index,
                total: self.frames.len(),
            })
    }

    fn fps(&self) -> Option<f64> {
        self.fps
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
