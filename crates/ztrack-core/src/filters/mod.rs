pub mod gaussian_blur;
pub mod intensity;

pub use gaussian_blur::{gaussian_blur, gaussian_smooth_1d};
pub use intensity::{invert, mean_intensity, normalize_polarity, preprocess, saturating_sub};
