/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Mid-grey level separating bright from dark scenes (8-bit).
pub const MID_GREY: f64 = 127.0;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Default number of frames sampled for the background median.
pub const DEFAULT_BACKGROUND_SAMPLES: usize = 300;

/// File extension of the cached background image, stored next to the video.
pub const BACKGROUND_EXTENSION: &str = "png";

/// Minimum number of points the least-squares ellipse fit accepts.
pub const ELLIPSE_MIN_POINTS: usize = 5;

/// Right-hand side of the first-stage conic fit (any non-zero constant works;
/// a large one keeps the coefficients well scaled for pixel coordinates).
pub const CONIC_FIT_SCALE: f64 = 10_000.0;

/// Singular-value cutoff for the least-squares solves in the ellipse fit.
pub const FIT_EPSILON: f64 = 1e-12;

/// Gaussian kernels are truncated at this many sigmas (8-bit images).
pub const GAUSSIAN_TRUNCATE_U8: f32 = 3.0;

/// 1-D profile smoothing truncates at this many sigmas.
pub const GAUSSIAN_TRUNCATE_PROFILE: f64 = 4.0;

/// Number of values an eye tracker emits per frame: 3 ellipses x 5 fields.
pub const EYE_RAW_LEN: usize = 15;

/// Fields per ellipse: cx, cy, semi-major, semi-minor, theta.
pub const ELLIPSE_FIELDS: usize = 5;
