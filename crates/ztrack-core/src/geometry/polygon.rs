use crate::detection::Contour;

use super::hull::convex_hull;

/// Signed distance from `point` to a closed polygon: positive inside,
/// negative outside, zero on the boundary.
pub fn signed_distance(polygon: &[[f64; 2]], point: [f64; 2]) -> f64 {
    let n = polygon.len();
    if n == 0 {
        return f64::NEG_INFINITY;
    }
    if n == 1 {
        return -distance(polygon[0], point);
    }

    let mut min_dist = f64::INFINITY;
    let mut inside = false;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        min_dist = min_dist.min(segment_distance(a, b, point));

        // Crossing test on a horizontal ray towards +x.
        if (a[1] > point[1]) != (b[1] > point[1]) {
            let x = a[0] + (point[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if point[0] < x {
                inside = !inside;
            }
        }
    }

    if min_dist == 0.0 {
        0.0
    } else if inside && n >= 3 {
        min_dist
    } else {
        -min_dist
    }
}

/// The contour whose convex hull lies "most around" `point`: the largest
/// signed distance, so a contour containing the point deeply wins, and
/// otherwise the closest one. Returns `None` for an empty list.
pub fn nearest_contour(contours: &[Contour], point: [f64; 2]) -> Option<&Contour> {
    contours
        .iter()
        .map(|c| (c, signed_distance(&convex_hull(&c.points), point)))
        .fold(None, |best: Option<(&Contour, f64)>, (c, d)| match best {
            Some((_, bd)) if bd >= d => best,
            _ => Some((c, d)),
        })
        .map(|(c, _)| c)
}

pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

fn segment_distance(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> f64 {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return distance(a, p);
    }
    let t = (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len2).clamp(0.0, 1.0);
    distance([a[0] + t * dx, a[1] + t * dy], p)
}
