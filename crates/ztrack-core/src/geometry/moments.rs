use crate::error::{Result, ZtrackError};

/// Area enclosed by a closed polygon (shoelace formula, always >= 0).
///
/// A contour traced around a one-pixel-wide blob encloses no area.
pub fn contour_area(points: &[[f64; 2]]) -> f64 {
    signed_area(points).abs()
}

fn signed_area(points: &[[f64; 2]]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let [x0, y0] = points[i];
        let [x1, y1] = points[(i + 1) % n];
        sum += x0 * y1 - x1 * y0;
    }
    sum / 2.0
}

/// Centroid of the region enclosed by a closed polygon, from its spatial
/// moments (m10/m00, m01/m00).
///
/// Fails for degenerate polygons with zero area.
pub fn contour_center(points: &[[f64; 2]]) -> Result<[f64; 2]> {
    let n = points.len();
    let area = signed_area(points);
    if area.abs() < f64::EPSILON {
        return Err(ZtrackError::tracking("contour encloses no area"));
    }
    let (mut sx, mut sy) = (0.0, 0.0);
    for i in 0..n {
        let [x0, y0] = points[i];
        let [x1, y1] = points[(i + 1) % n];
        let a = x0 * y1 - x1 * y0;
        sx += (x0 + x1) * a;
        sy += (y0 + y1) * a;
    }
    Ok([sx / (6.0 * area), sy / (6.0 * area)])
}
