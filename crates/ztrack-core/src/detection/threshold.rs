use ndarray::{Array2, Zip};

/// Binary threshold: pixels strictly above `threshold` become 255, the rest 0.
pub fn binary_threshold(image: &Array2<u8>, threshold: u8) -> Array2<u8> {
    image.mapv(|v| if v > threshold { 255 } else { 0 })
}

/// Local mean threshold.
///
/// A pixel becomes 255 when it is brighter than the mean of its
/// `block_size` x `block_size` neighbourhood minus `c`. Borders replicate the
/// edge pixels. The local mean is rounded to the nearest grey level.
pub fn adaptive_threshold(image: &Array2<u8>, block_size: usize, c: i64) -> Array2<u8> {
    let means = box_mean(image, block_size.max(1));
    let mut out = Array2::<u8>::zeros(image.dim());
    Zip::from(&mut out)
        .and(image)
        .and(&means)
        .for_each(|o, &v, &m| {
            *o = if (v as i64) - (m as i64) > -c { 255 } else { 0 };
        });
    out
}

/// Rounded mean over a square window, computed as separable window sums
/// (rows, then columns).
fn box_mean(image: &Array2<u8>, size: usize) -> Array2<u8> {
    let (h, w) = image.dim();
    if h == 0 || w == 0 {
        return image.clone();
    }
    let radius = (size / 2) as isize;

    let mut row_sums = Array2::<u32>::zeros((h, w));
    for row in 0..h {
        for col in 0..w {
            let mut sum = 0u32;
            for k in -radius..=radius {
                let c = (col as isize + k).clamp(0, w as isize - 1) as usize;
                sum += image[[row, c]] as u32;
            }
            row_sums[[row, col]] = sum;
        }
    }

    let area = (size * size) as f64;
    let mut means = Array2::<u8>::zeros((h, w));
    for row in 0..h {
        for col in 0..w {
            let mut sum = 0u32;
            for k in -radius..=radius {
                let r = (row as isize + k).clamp(0, h as isize - 1) as usize;
                sum += row_sums[[r, col]];
            }
            means[[row, col]] = (sum as f64 / area).round().min(255.0) as u8;
        }
    }
    means
}
