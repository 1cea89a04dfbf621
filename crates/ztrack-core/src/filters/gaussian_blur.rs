use ndarray::{Array2, Axis, Zip};

use crate::consts::{GAUSSIAN_TRUNCATE_PROFILE, GAUSSIAN_TRUNCATE_U8, PARALLEL_PIXEL_THRESHOLD};

/// Gaussian blur of an 8-bit image using separable 1-D convolution with
/// replicated borders. `sigma <= 0` returns an unmodified copy.
pub fn gaussian_blur(image: &Array2<u8>, sigma: f64) -> Array2<u8> {
    if sigma <= 0.0 {
        return image.clone();
    }
    let kernel = make_gaussian_kernel(sigma, GAUSSIAN_TRUNCATE_U8 as f64);
    let data = image.mapv(|v| v as f32);
    let row_pass = convolve_axis(&data, &kernel, Axis(1));
    let col_pass = convolve_axis(&row_pass, &kernel, Axis(0));
    col_pass.mapv(|v| v.round().clamp(0.0, 255.0) as u8)
}

/// Smooth a 1-D intensity profile; samples beyond the ends repeat the
/// nearest edge value.
pub fn gaussian_smooth_1d(profile: &[f64], sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 || profile.is_empty() {
        return profile.to_vec();
    }
    let kernel = make_gaussian_kernel(sigma, GAUSSIAN_TRUNCATE_PROFILE);
    let radius = (kernel.len() / 2) as isize;
    let last = profile.len() as isize - 1;

    (0..profile.len())
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, &weight)| {
                    let src = (i as isize + k as isize - radius).clamp(0, last) as usize;
                    profile[src] * weight as f64
                })
                .sum()
        })
        .collect()
}

fn make_gaussian_kernel(sigma: f64, truncate: f64) -> Vec<f32> {
    let radius = (truncate * sigma + 0.5) as usize;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-x * x / s2).exp() as f32
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

fn convolve_axis(data: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = (kernel.len() / 2) as isize;
    let len = data.len_of(axis) as isize;

    let sample = |(row, col): (usize, usize)| -> f32 {
        kernel
            .iter()
            .enumerate()
            .map(|(ki, &kv)| {
                let offset = ki as isize - radius;
                let (r, c) = if axis == Axis(0) {
                    ((row as isize + offset).clamp(0, len - 1) as usize, col)
                } else {
                    (row, (col as isize + offset).clamp(0, len - 1) as usize)
                };
                data[[r, c]] * kv
            })
            .sum()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        Zip::indexed(&mut result).par_for_each(|idx, out| *out = sample(idx));
    } else {
        Zip::indexed(&mut result).for_each(|idx, out| *out = sample(idx));
    }
    result
}
