//! Static background estimation and subtraction.
//!
//! The background of a video is the per-pixel median of frames sampled
//! uniformly over its length. It is cached as a PNG next to the video and
//! reused on later runs.

pub mod median;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::Array2;
use tracing::{debug, info, warn};

use crate::consts::{BACKGROUND_EXTENSION, DEFAULT_BACKGROUND_SAMPLES, MID_GREY};
use crate::error::{Result, ZtrackError};
use crate::filters::{mean_intensity, saturating_sub};
use crate::frame::FrameSource;
use crate::io::image_io::{load_gray, save_gray_png};
use crate::roi::Roi;

pub use median::median_image;

/// A static background image and the polarity of the subject against it.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundModel {
    pub background: Array2<u8>,
    /// True when the subject is darker than the background (bright field).
    pub subject_darker: bool,
}

impl BackgroundModel {
    pub fn new(background: Array2<u8>) -> Self {
        let subject_darker = mean_intensity(&background) > MID_GREY;
        Self {
            background,
            subject_darker,
        }
    }

    /// Remove the background from a full frame, leaving a bright subject on
    /// a dark field whatever the original polarity.
    pub fn subtract(&self, frame: &Array2<u8>) -> Result<Array2<u8>> {
        self.subtract_region(frame, None)
    }

    /// As [`subtract`](Self::subtract), for an image already cropped to `roi`.
    pub fn subtract_region(&self, image: &Array2<u8>, roi: Option<&Roi>) -> Result<Array2<u8>> {
        let bg = match roi {
            Some(roi) => roi.crop(&self.background).to_owned(),
            None => self.background.clone(),
        };
        if bg.dim() != image.dim() {
            return Err(ZtrackError::InvalidDimensions {
                width: image.ncols(),
                height: image.nrows(),
            });
        }
        Ok(if self.subject_darker {
            saturating_sub(&bg, image)
        } else {
            saturating_sub(image, &bg)
        })
    }
}

/// Where the background of `video` is cached: same path, `.png` extension.
pub fn cache_path(video: &Path) -> PathBuf {
    video.with_extension(BACKGROUND_EXTENSION)
}

/// Indices of up to `sample_count` frames spread evenly over `len` frames,
/// first and last included.
pub fn sample_indices(len: usize, sample_count: usize) -> Vec<usize> {
    let k = sample_count.min(len);
    match k {
        0 => Vec::new(),
        1 => vec![0],
        _ => (0..k).map(|i| i * (len - 1) / (k - 1)).collect(),
    }
}

/// Median background over up to `sample_count` frames of `source`.
pub fn compute_background(source: &dyn FrameSource, sample_count: usize) -> Result<BackgroundModel> {
    if source.is_empty() {
        return Err(ZtrackError::EmptySequence);
    }
    let indices = sample_indices(source.len(), sample_count.max(1));
    info!(samples = indices.len(), total_frames = source.len(), "Computing background");

    let frames = indices
        .iter()
        .map(|&i| source.frame(i).map(|f| f.to_gray()))
        .collect::<Result<Vec<_>>>()?;
    let background = median_image(&frames)?;
    Ok(BackgroundModel::new(background))
}

/// Load the cached background of `source`, or compute and cache it.
///
/// A cached image whose size differs from the video's frames is discarded.
/// Sources without a path are never cached.
pub fn load_or_compute(source: &dyn FrameSource, sample_count: usize) -> Result<BackgroundModel> {
    let Some(path) = source.path().map(cache_path) else {
        return compute_background(source, sample_count);
    };

    if path.is_file() {
        let cached = load_gray(&path)?;
        let first = source.frame(0)?;
        if cached.dim() == (first.height(), first.width()) {
            info!(path = %path.display(), "Using cached background");
            return Ok(BackgroundModel::new(cached));
        }
        warn!(
            path = %path.display(),
            cached = ?cached.dim(),
            video = ?(first.height(), first.width()),
            "Cached background does not match video size, recomputing"
        );
    }

    let model = compute_background(source, sample_count)?;
    save_gray_png(&model.background, &path)?;
    info!(path = %path.display(), "Saved background");
    Ok(model)
}

/// Where a held background model came from.
#[derive(Clone, Debug, PartialEq, Eq)]
enum ModelOrigin {
    /// Installed by the caller; kept until replaced.
    Fixed,
    /// Computed or loaded for the video at this path.
    Video(PathBuf),
    /// Computed for a source without a path, which cannot be recognised
    /// again.
    Unnamed,
}

/// Background subtraction capability held by trackers that need it.
///
/// The model is computed or loaded once per video and shared read-only
/// afterwards. Preparing for a different video replaces it.
#[derive(Clone, Debug)]
pub struct BackgroundSubtraction {
    sample_count: usize,
    model: Option<(Arc<BackgroundModel>, ModelOrigin)>,
}

impl Default for BackgroundSubtraction {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundSubtraction {
    pub fn new() -> Self {
        Self {
            sample_count: DEFAULT_BACKGROUND_SAMPLES,
            model: None,
        }
    }

    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn model(&self) -> Option<&Arc<BackgroundModel>> {
        self.model.as_ref().map(|(model, _)| model)
    }

    /// Use a known background for every video until replaced.
    pub fn set_model(&mut self, model: Option<Arc<BackgroundModel>>) {
        self.model = model.map(|m| (m, ModelOrigin::Fixed));
    }

    /// Make the background of `source` available.
    ///
    /// A model installed with [`set_model`](Self::set_model), or one already
    /// prepared for the same video path, is kept. Anything else is replaced
    /// by the background of `source`.
    pub fn prepare(&mut self, source: &dyn FrameSource) -> Result<()> {
        let reusable = match &self.model {
            Some((_, ModelOrigin::Fixed)) => true,
            Some((_, ModelOrigin::Video(path))) => source.path() == Some(path.as_path()),
            _ => false,
        };
        if reusable {
            return Ok(());
        }
        if self.model.is_some() {
            debug!("Video changed, dropping background model");
        }

        let model = Arc::new(load_or_compute(source, self.sample_count)?);
        let origin = match source.path() {
            Some(path) => ModelOrigin::Video(path.to_path_buf()),
            None => ModelOrigin::Unnamed,
        };
        self.model = Some((model, origin));
        Ok(())
    }

    /// Drop the held model and delete the cached image of `video`, if any.
    pub fn invalidate(&mut self, video: Option<&Path>) -> Result<()> {
        self.model = None;
        if let Some(path) = video.map(cache_path) {
            if path.is_file() {
                fs::remove_file(&path)?;
                info!(path = %path.display(), "Deleted cached background");
            }
        }
        Ok(())
    }

    /// Subtract the background from an ROI-cropped image. Fails if no model
    /// has been prepared or set.
    pub fn subtract(&self, image: &Array2<u8>, roi: Option<&Roi>) -> Result<Array2<u8>> {
        match self.model() {
            Some(model) => model.subtract_region(image, roi),
            None => Err(ZtrackError::Configuration("background not prepared".into())),
        }
    }
}
