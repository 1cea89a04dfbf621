use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZtrackError {
    #[error("Value {value} out of range [{minimum}, {maximum}]")]
    OutOfRange {
        value: f64,
        minimum: f64,
        maximum: f64,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Tracking failed: {0}")]
    Tracking(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown tracker: {0}")]
    UnknownTracker(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Empty frame sequence")]
    EmptySequence,
}

impl ZtrackError {
    /// Shorthand for a frame-local tracking failure.
    pub fn tracking(msg: impl Into<String>) -> Self {
        Self::Tracking(msg.into())
    }

    /// Parameter errors rejected at the configuration boundary.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange { .. }
                | Self::InvalidValue(_)
                | Self::TypeMismatch { .. }
                | Self::UnknownParameter(_)
        )
    }

    /// Frame-local failures that a batch run records as a missing pose.
    pub fn is_tracking(&self) -> bool {
        matches!(self, Self::Tracking(_))
    }
}

pub type Result<T> = std::result::Result<T, ZtrackError>;
