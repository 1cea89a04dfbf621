use ndarray::{Array2, Zip};

use crate::consts::MID_GREY;

use super::gaussian_blur::gaussian_blur;

/// Mean grey level of an image (0 for an empty image).
pub fn mean_intensity(image: &Array2<u8>) -> f64 {
    if image.is_empty() {
        return 0.0;
    }
    image.iter().map(|&v| v as f64).sum::<f64>() / image.len() as f64
}

pub fn invert(image: &Array2<u8>) -> Array2<u8> {
    image.mapv(|v| 255 - v)
}

/// Make the subject bright on a dark field: a frame whose mean is above mid
/// grey is assumed to show a dark subject on a bright background and is
/// inverted.
pub fn normalize_polarity(image: &Array2<u8>) -> Array2<u8> {
    if mean_intensity(image) > MID_GREY {
        invert(image)
    } else {
        image.clone()
    }
}

/// Polarity normalisation followed by an optional blur, the common
/// preprocessing of every eye and tail tracker.
pub fn preprocess(image: &Array2<u8>, sigma: f64, normalize: bool) -> Array2<u8> {
    let img = if normalize {
        normalize_polarity(image)
    } else {
        image.clone()
    };
    gaussian_blur(&img, sigma)
}

/// Per-pixel `a - b`, clamped at zero.
pub fn saturating_sub(a: &Array2<u8>, b: &Array2<u8>) -> Array2<u8> {
    let mut out = Array2::<u8>::zeros(a.dim());
    Zip::from(&mut out)
        .and(a)
        .and(b)
        .for_each(|o, &x, &y| *o = x.saturating_sub(y));
    out
}
