use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{Result, ZtrackError};

/// Per-pixel median of equally sized grayscale images.
///
/// Uses `select_nth_unstable` for O(n) median without full sort.
/// Parallelizes at the row level for images >= 256x256.
pub fn median_image(images: &[Array2<u8>]) -> Result<Array2<u8>> {
    let first = images.first().ok_or(ZtrackError::EmptySequence)?;
    let (h, w) = first.dim();
    if let Some(bad) = images.iter().find(|img| img.dim() != (h, w)) {
        return Err(ZtrackError::InvalidDimensions {
            width: bad.ncols(),
            height: bad.nrows(),
        });
    }
    let n = images.len();

    let median_row = |row: usize| {
        let mut pixel_values = vec![0u8; n];
        let mut row_result = vec![0u8; w];
        for (col, result) in row_result.iter_mut().enumerate() {
            for (i, img) in images.iter().enumerate() {
                pixel_values[i] = img[[row, col]];
            }
            *result = compute_median(&mut pixel_values);
        }
        row_result
    };

    let rows: Vec<Vec<u8>> = if h * w >= PARALLEL_PIXEL_THRESHOLD && n > 1 {
        (0..h).into_par_iter().map(median_row).collect()
    } else {
        (0..h).map(median_row).collect()
    };

    let data: Vec<u8> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((h, w), data).map_err(|_| ZtrackError::InvalidDimensions {
        width: w,
        height: h,
    })
}

/// Median of the values, truncated to an integer level for even counts.
fn compute_median(pixel_values: &mut [u8]) -> u8 {
    let n = pixel_values.len();
    let mid = n / 2;
    if n % 2 == 1 {
        *pixel_values.select_nth_unstable(mid).1
    } else {
        pixel_values.select_nth_unstable(mid);
        let upper = pixel_values[mid];
        let lower = *pixel_values[..mid].select_nth_unstable(mid - 1).1;
        ((lower as u16 + upper as u16) / 2) as u8
    }
}
