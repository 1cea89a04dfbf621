use crate::error::{Result, ZtrackError};

use super::ellipse::Ellipse;
use super::hull::cross;
use super::polygon::distance;

/// Indices of the three landmarks of a larva seen from above.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Landmarks {
    pub left_eye: usize,
    pub right_eye: usize,
    pub swim_bladder: usize,
}

/// Tell the eyes from the swim bladder given three blob centres.
///
/// The eyes are the closest pair; the remaining blob is the swim bladder.
/// Left and right follow image-space handedness: with the fish pointing up
/// on screen the left eye has the smaller x.
pub fn identify_landmarks(centers: &[[f64; 2]]) -> Result<Landmarks> {
    if centers.len() != 3 {
        return Err(ZtrackError::tracking(format!(
            "expected 3 landmarks, found {}",
            centers.len()
        )));
    }

    let pair_gap = |i: usize| {
        let (j, k) = others(i);
        distance(centers[j], centers[k])
    };
    let swim_bladder = (1..3).fold(0, |best, i| {
        if pair_gap(i) < pair_gap(best) {
            i
        } else {
            best
        }
    });

    let (e0, e1) = others(swim_bladder);
    let (left_eye, right_eye) = if cross(centers[swim_bladder], centers[e0], centers[e1]) > 0.0 {
        (e0, e1)
    } else {
        (e1, e0)
    };

    Ok(Landmarks {
        left_eye,
        right_eye,
        swim_bladder,
    })
}

fn others(i: usize) -> (usize, usize) {
    match i {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

/// Heading in degrees: from the swim bladder towards the midpoint of the eyes.
pub fn heading(left_eye: [f64; 2], right_eye: [f64; 2], swim_bladder: [f64; 2]) -> f64 {
    let mid = [
        (left_eye[0] + right_eye[0]) / 2.0,
        (left_eye[1] + right_eye[1]) / 2.0,
    ];
    (mid[1] - swim_bladder[1])
        .atan2(mid[0] - swim_bladder[0])
        .to_degrees()
}

/// Wrap degrees into `[-180, 180)`.
pub fn wrap_degrees(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Flip each ellipse's axis so it points along the heading rather than
/// against it. Ellipse orientation is only defined modulo 180 degrees.
pub fn correct_orientation(ellipses: &mut [Ellipse], heading_deg: f64) {
    for e in ellipses.iter_mut() {
        if wrap_degrees(heading_deg - e.theta).abs() > 90.0 {
            e.theta = wrap_degrees(e.theta - 180.0);
        }
    }
}

/// Eye angle relative to the heading, in `[-180, 180)`.
pub fn relative_angle(theta: f64, heading_deg: f64) -> f64 {
    wrap_degrees(theta - heading_deg)
}
