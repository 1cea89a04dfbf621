mod common;

use approx::assert_abs_diff_eq;

use common::{draw_blobs, Blob};
use ztrack_core::detection::{find_contours, Contour};
use ztrack_core::geometry::{
    circle_perimeter, contour_area, contour_center, convex_hull, correct_orientation,
    fit_ellipse, heading, identify_landmarks, nearest_contour, resample_curve, signed_distance,
    split_length, wrap_degrees, Ellipse,
};

fn blob_contour(blob: Blob) -> Contour {
    let img = draw_blobs(100, 100, 0, 255, &[blob]);
    let mut contours = find_contours(&img);
    assert_eq!(contours.len(), 1);
    contours.remove(0)
}

/// Orientation difference modulo 180 degrees.
fn axis_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(180.0);
    d.min(180.0 - d)
}

// ---------------------------------------------------------------------------
// Ellipse fitting
// ---------------------------------------------------------------------------

#[test]
fn test_fit_axis_aligned_ellipse() {
    let blob = Blob {
        cx: 50.0,
        cy: 40.0,
        semi_major: 12.0,
        semi_minor: 6.0,
        theta: 0.0,
    };
    let e = fit_ellipse(&blob_contour(blob).points).unwrap();
    assert_abs_diff_eq!(e.cx, 50.0, epsilon = 0.5);
    assert_abs_diff_eq!(e.cy, 40.0, epsilon = 0.5);
    assert_abs_diff_eq!(e.semi_major, 12.0, epsilon = 1.0);
    assert_abs_diff_eq!(e.semi_minor, 6.0, epsilon = 1.0);
    assert!(axis_diff(e.theta, 0.0) < 2.0, "theta = {}", e.theta);
    assert!(e.semi_major >= e.semi_minor);
}

#[test]
fn test_fit_rotated_ellipse() {
    for theta in [30.0, 75.0, -45.0, 120.0] {
        let blob = Blob {
            cx: 48.0,
            cy: 52.0,
            semi_major: 12.0,
            semi_minor: 6.0,
            theta,
        };
        let e = fit_ellipse(&blob_contour(blob).points).unwrap();
        assert_abs_diff_eq!(e.cx, 48.0, epsilon = 0.5);
        assert_abs_diff_eq!(e.cy, 52.0, epsilon = 0.5);
        assert_abs_diff_eq!(e.semi_major, 12.0, epsilon = 1.0);
        assert_abs_diff_eq!(e.semi_minor, 6.0, epsilon = 1.0);
        assert!(axis_diff(e.theta, theta) < 2.0, "{theta}: got {}", e.theta);
    }
}

#[test]
fn test_fit_theta_range() {
    // Reported orientation is the rotated-box angle minus 90 degrees.
    let blob = Blob {
        cx: 50.0,
        cy: 50.0,
        semi_major: 10.0,
        semi_minor: 5.0,
        theta: 60.0,
    };
    let e = fit_ellipse(&blob_contour(blob).points).unwrap();
    assert!(e.theta >= -90.0 && e.theta < 90.0);
}

#[test]
fn test_fit_needs_five_points() {
    let pts = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    let err = fit_ellipse(&pts).unwrap_err();
    assert!(err.is_tracking());
}

// ---------------------------------------------------------------------------
// Hull, moments, distance
// ---------------------------------------------------------------------------

#[test]
fn test_convex_hull_drops_interior_and_collinear() {
    let pts = [
        [0.0, 0.0],
        [2.0, 0.0],
        [4.0, 0.0],
        [4.0, 4.0],
        [0.0, 4.0],
        [2.0, 2.0],
        [1.0, 3.0],
    ];
    let hull = convex_hull(&pts);
    assert_eq!(hull.len(), 4);
    for corner in [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]] {
        assert!(hull.contains(&corner));
    }
}

#[test]
fn test_contour_center_and_area() {
    let square = [[2.0, 2.0], [6.0, 2.0], [6.0, 6.0], [2.0, 6.0]];
    assert_abs_diff_eq!(contour_area(&square), 16.0);
    let c = contour_center(&square).unwrap();
    assert_abs_diff_eq!(c[0], 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(c[1], 4.0, epsilon = 1e-12);
}

#[test]
fn test_contour_center_degenerate() {
    let line = [[0.0, 0.0], [3.0, 0.0]];
    assert!(contour_center(&line).unwrap_err().is_tracking());
}

#[test]
fn test_signed_distance() {
    let square = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
    assert_abs_diff_eq!(signed_distance(&square, [5.0, 5.0]), 5.0);
    assert_abs_diff_eq!(signed_distance(&square, [2.0, 5.0]), 2.0);
    assert_abs_diff_eq!(signed_distance(&square, [13.0, 5.0]), -3.0);
    assert_abs_diff_eq!(signed_distance(&square, [10.0, 5.0]), 0.0);
}

#[test]
fn test_nearest_contour_prefers_containing() {
    let img = draw_blobs(
        100,
        60,
        0,
        255,
        &[Blob::circle(20.0, 30.0, 8.0), Blob::circle(60.0, 30.0, 15.0)],
    );
    let contours = find_contours(&img);
    let near_small = nearest_contour(&contours, [22.0, 30.0]).unwrap();
    assert!(near_small.points.iter().all(|p| p[0] < 40.0));
    // Outside both: the closer one wins.
    let near_big = nearest_contour(&contours, [80.0, 30.0]).unwrap();
    assert!(near_big.points.iter().all(|p| p[0] > 40.0));
    assert!(nearest_contour(&[], [0.0, 0.0]).is_none());
}

// ---------------------------------------------------------------------------
// Landmarks
// ---------------------------------------------------------------------------

#[test]
fn test_identify_landmarks_facing_up() {
    // Eyes close together, swim bladder behind.
    let centers = [[60.0, 75.0], [50.0, 50.0], [70.0, 50.0]];
    let lm = identify_landmarks(&centers).unwrap();
    assert_eq!(lm.swim_bladder, 0);
    assert_eq!(lm.left_eye, 1);
    assert_eq!(lm.right_eye, 2);
}

#[test]
fn test_identify_landmarks_mirrored() {
    // Same layout reflected about the vertical axis: the eye listed first
    // is now on the right of the image.
    let centers = [[60.0, 75.0], [70.0, 50.0], [50.0, 50.0]];
    let lm = identify_landmarks(&centers).unwrap();
    assert_eq!(lm.swim_bladder, 0);
    assert_eq!(lm.left_eye, 2);
    assert_eq!(lm.right_eye, 1);
}

#[test]
fn test_identify_landmarks_rotated() {
    // Facing +x (right on screen); the eye with smaller y is on the left.
    let centers = [[40.0, 45.0], [40.0, 55.0], [15.0, 50.0]];
    let lm = identify_landmarks(&centers).unwrap();
    assert_eq!(lm.swim_bladder, 2);
    assert_eq!(lm.left_eye, 0);
    assert_eq!(lm.right_eye, 1);

    // And mirrored top-to-bottom.
    let centers = [[40.0, 55.0], [40.0, 45.0], [15.0, 50.0]];
    let lm = identify_landmarks(&centers).unwrap();
    assert_eq!(lm.left_eye, 1);
    assert_eq!(lm.right_eye, 0);
}

#[test]
fn test_identify_obtuse_triangle() {
    // Obtuse at the first eye; the swim bladder is off to one side.
    let centers = [[30.0, 40.0], [36.0, 40.0], [20.0, 58.0]];
    let lm = identify_landmarks(&centers).unwrap();
    assert_eq!(lm.swim_bladder, 2);
    assert_eq!(lm.left_eye, 0);
    assert_eq!(lm.right_eye, 1);
}

#[test]
fn test_identify_wrong_count() {
    assert!(identify_landmarks(&[[0.0, 0.0], [1.0, 1.0]])
        .unwrap_err()
        .is_tracking());
}

#[test]
fn test_heading_points_from_bladder_to_eyes() {
    assert_abs_diff_eq!(heading([50.0, 50.0], [70.0, 50.0], [60.0, 75.0]), -90.0);
    assert_abs_diff_eq!(heading([40.0, 45.0], [40.0, 55.0], [15.0, 50.0]), 0.0);
}

#[test]
fn test_correct_orientation_flips_backwards_axes() {
    let mut ellipses = [
        Ellipse {
            theta: 80.0,
            ..Ellipse::default()
        },
        Ellipse {
            theta: -80.0,
            ..Ellipse::default()
        },
    ];
    correct_orientation(&mut ellipses, -90.0);
    assert_abs_diff_eq!(ellipses[0].theta, -100.0);
    assert_abs_diff_eq!(ellipses[1].theta, -80.0);
}

#[test]
fn test_correct_orientation_is_idempotent() {
    for heading_deg in [-170.0, -90.0, 0.0, 45.0, 135.0] {
        let mut once: Vec<Ellipse> = [-85.0, -10.0, 0.0, 30.0, 89.0]
            .iter()
            .map(|&theta| Ellipse {
                theta,
                ..Ellipse::default()
            })
            .collect();
        correct_orientation(&mut once, heading_deg);
        let mut twice = once.clone();
        correct_orientation(&mut twice, heading_deg);
        assert_eq!(once, twice);
        for e in &once {
            assert!(wrap_degrees(heading_deg - e.theta).abs() <= 90.0);
        }
    }
}

// ---------------------------------------------------------------------------
// Curves
// ---------------------------------------------------------------------------

#[test]
fn test_split_length() {
    assert_eq!(split_length(10, 3), vec![4, 3, 3]);
    assert_eq!(split_length(200, 10), vec![20; 10]);
    assert_eq!(split_length(2, 4), vec![1, 1, 0, 0]);
    assert_eq!(split_length(91, 20).iter().sum::<i64>(), 91);
}

#[test]
fn test_circle_perimeter() {
    let pts = circle_perimeter(5);
    assert!(pts.contains(&(5, 0)));
    assert!(pts.contains(&(0, -5)));
    assert!(pts.contains(&(-5, 0)));
    for &(x, y) in &pts {
        let r = ((x * x + y * y) as f64).sqrt();
        assert!((r - 5.0).abs() < 1.0, "({x}, {y})");
    }
    let mut sorted = pts.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), pts.len());
}

#[test]
fn test_resample_straight_line() {
    let pts = [[0.0, 0.0], [3.0, 0.0], [10.0, 0.0]];
    let out = resample_curve(&pts, 6);
    assert_eq!(out.len(), 6);
    for (i, p) in out.iter().enumerate() {
        assert_abs_diff_eq!(p[0], 2.0 * i as f64, epsilon = 1e-9);
        assert_abs_diff_eq!(p[1], 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_resample_keeps_endpoints() {
    let pts = [[0.0, 0.0], [5.0, 3.0], [10.0, 4.0], [15.0, 3.0], [20.0, 0.0]];
    let out = resample_curve(&pts, 51);
    assert_eq!(out.len(), 51);
    assert_abs_diff_eq!(out[0][0], 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(out[50][0], 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(out[50][1], 0.0, epsilon = 1e-9);
    // Passes near the apex.
    assert!(out.iter().any(|p| (p[0] - 10.0).abs() < 0.5 && (p[1] - 4.0).abs() < 0.2));
}

#[test]
fn test_resample_zero_points_is_identity() {
    let pts = [[0.0, 0.0], [1.0, 2.0]];
    assert_eq!(resample_curve(&pts, 0), pts.to_vec());
}
