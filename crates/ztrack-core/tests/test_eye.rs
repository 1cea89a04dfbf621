mod common;

use approx::assert_abs_diff_eq;

use common::{draw_blobs, larva_blobs, larva_frame, static_video, Blob};
use ztrack_core::frame::Frame;
use ztrack_core::roi::Roi;
use ztrack_core::tracking::eye::eye_columns;
use ztrack_core::tracking::{EyeTracker, Geometry, PoseRecord, Tracker};

fn binary_tracker() -> EyeTracker {
    let mut tracker = EyeTracker::binary().unwrap();
    tracker.parameters_mut().set("sigma", 0.0).unwrap();
    tracker
}

fn assert_larva_record(record: &PoseRecord, tol_px: f64, tol_deg: f64) {
    let [left, right, sb] = larva_blobs();
    for (prefix, blob) in [("left_eye", left), ("right_eye", right), ("swim_bladder", sb)] {
        let get = |field: &str| record.get(&format!("{prefix}_{field}")).unwrap();
        assert_abs_diff_eq!(get("x"), blob.cx, epsilon = tol_px);
        assert_abs_diff_eq!(get("y"), blob.cy, epsilon = tol_px);
        assert_abs_diff_eq!(get("semi_major"), blob.semi_major, epsilon = 1.0);
        assert_abs_diff_eq!(get("semi_minor"), blob.semi_minor, epsilon = 1.0);
        assert_abs_diff_eq!(get("theta"), blob.theta, epsilon = tol_deg);
    }
    assert_abs_diff_eq!(record.get("heading").unwrap(), -90.0, epsilon = tol_deg);
    assert_abs_diff_eq!(record.get("left_eye_angle").unwrap(), -10.0, epsilon = tol_deg);
    assert_abs_diff_eq!(record.get("right_eye_angle").unwrap(), 10.0, epsilon = tol_deg);
}

// ---------------------------------------------------------------------------
// Binary threshold
// ---------------------------------------------------------------------------

#[test]
fn test_binary_columns() {
    let tracker = binary_tracker();
    let columns = tracker.columns();
    assert_eq!(columns.len(), 18);
    assert_eq!(columns[0], "left_eye_x");
    assert_eq!(columns[14], "swim_bladder_theta");
    assert_eq!(columns[15], "heading");
    assert_eq!(columns, eye_columns());
}

#[test]
fn test_binary_single_frame() {
    let tracker = binary_tracker();
    let record = tracker.track_frame(&Frame::Gray(larva_frame())).unwrap();
    assert_larva_record(&record, 0.5, 2.0);
}

#[test]
fn test_binary_end_to_end_static_video() {
    let mut tracker = binary_tracker();
    let video = static_video(&larva_frame(), 10);
    let table = tracker.track_frames(&video).unwrap();
    assert_eq!(table.len(), 10);
    assert_eq!(table.missing_count(), 0);

    let first = table.record(0).unwrap();
    assert_larva_record(&first, 0.5, 1.0);
    for i in 1..10 {
        assert!(table.record(i).unwrap().bit_eq(&first));
    }
}

#[test]
fn test_binary_with_default_blur() {
    let tracker = EyeTracker::binary().unwrap();
    let record = tracker.track_frame(&Frame::Gray(larva_frame())).unwrap();
    assert_abs_diff_eq!(record.get("left_eye_x").unwrap(), 50.0, epsilon = 1.0);
    assert_abs_diff_eq!(record.get("right_eye_x").unwrap(), 70.0, epsilon = 1.0);
    assert_abs_diff_eq!(record.get("swim_bladder_y").unwrap(), 75.0, epsilon = 1.0);
}

#[test]
fn test_roi_coordinates_are_full_frame() {
    let mut tracker = binary_tracker();
    tracker.set_roi(Some(Roi::normalized(30, 30, 60, 60)));
    let record = tracker.track_frame(&Frame::Gray(larva_frame())).unwrap();
    assert_larva_record(&record, 0.5, 2.0);
}

#[test]
fn test_two_blobs_is_tracking_error() {
    let img = draw_blobs(
        100,
        100,
        230,
        20,
        &[Blob::circle(30.0, 50.0, 6.0), Blob::circle(70.0, 50.0, 6.0)],
    );
    let tracker = binary_tracker();
    let err = tracker.track_frame(&Frame::Gray(img)).unwrap_err();
    assert!(err.is_tracking());
}

#[test]
fn test_failed_frames_become_nan_rows() {
    let good = larva_frame();
    let bad = draw_blobs(120, 120, 230, 20, &[Blob::circle(60.0, 60.0, 6.0)]);
    let mut video = static_video(&good, 2);
    video.push(Frame::Gray(bad));
    video.push(Frame::Gray(good));

    let mut tracker = binary_tracker();
    let table = tracker.track_frames(&video).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.missing_count(), 1);
    assert!(table.record(2).unwrap().is_missing());
    assert!(!table.record(3).unwrap().is_missing());
}

#[test]
fn test_bright_subject_is_not_inverted() {
    // Bright blobs on a dark field track the same as dark on bright.
    let img = draw_blobs(120, 120, 20, 230, &larva_blobs());
    let record = binary_tracker().track_frame(&Frame::Gray(img)).unwrap();
    assert_larva_record(&record, 0.5, 2.0);
}

// ---------------------------------------------------------------------------
// Multi-threshold and adaptive
// ---------------------------------------------------------------------------

#[test]
fn test_multithreshold_matches_binary() {
    let tracker = EyeTracker::multithreshold().unwrap();
    let record = tracker.track_frame(&Frame::Gray(larva_frame())).unwrap();
    assert_larva_record(&record, 0.5, 2.0);
}

#[test]
fn test_multithreshold_per_landmark_threshold() {
    // Eyes darker than the swim bladder: a strict eye threshold still
    // finds them while segmentation uses a looser one.
    let [left, right, sb] = larva_blobs();
    let mut img = draw_blobs(120, 120, 230, 90, &[sb]);
    let eyes = draw_blobs(120, 120, 230, 10, &[left, right]);
    ndarray::Zip::from(&mut img).and(&eyes).for_each(|a, &b| *a = (*a).min(b));

    let mut tracker = EyeTracker::multithreshold().unwrap();
    let params = tracker.parameters_mut();
    params.set("threshold_segmentation", 100i64).unwrap();
    params.set("threshold_left_eye", 200i64).unwrap();
    params.set("threshold_right_eye", 200i64).unwrap();
    params.set("threshold_swim_bladder", 100i64).unwrap();

    let record = tracker.track_frame(&Frame::Gray(img)).unwrap();
    assert_abs_diff_eq!(record.get("left_eye_x").unwrap(), 50.0, epsilon = 0.5);
    assert_abs_diff_eq!(record.get("right_eye_x").unwrap(), 70.0, epsilon = 0.5);
    assert_abs_diff_eq!(record.get("swim_bladder_semi_major").unwrap(), 10.0, epsilon = 1.0);
}

#[test]
fn test_adaptive_finds_landmarks() {
    let mut tracker = EyeTracker::adaptive().unwrap();
    tracker.parameters_mut().set("block_size", 31i64).unwrap();
    let record = tracker.track_frame(&Frame::Gray(larva_frame())).unwrap();
    assert_abs_diff_eq!(record.get("left_eye_x").unwrap(), 50.0, epsilon = 1.0);
    assert_abs_diff_eq!(record.get("left_eye_y").unwrap(), 50.0, epsilon = 1.0);
    assert_abs_diff_eq!(record.get("right_eye_x").unwrap(), 70.0, epsilon = 1.0);
    assert_abs_diff_eq!(record.get("swim_bladder_y").unwrap(), 75.0, epsilon = 1.0);
    assert_abs_diff_eq!(record.get("heading").unwrap(), -90.0, epsilon = 2.0);
}

#[test]
fn test_adaptive_rejects_even_block_size() {
    let mut tracker = EyeTracker::adaptive().unwrap();
    assert!(tracker.parameters_mut().set("block_size", 10i64).is_err());
}

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

#[test]
fn test_annotate_from_record() {
    let mut tracker = binary_tracker();
    assert!(tracker.shapes().iter().all(|s| !s.visible));

    let record = tracker.track_frame(&Frame::Gray(larva_frame())).unwrap();
    tracker.annotate(&record);
    let shapes = tracker.shapes();
    assert_eq!(shapes.len(), 3);
    assert!(shapes.iter().all(|s| s.visible));
    match &shapes[2].geometry {
        Geometry::Ellipse(e) => assert_abs_diff_eq!(e.cy, 75.0, epsilon = 0.5),
        other => panic!("unexpected geometry {other:?}"),
    }

    tracker.annotate(&PoseRecord::missing(eye_columns()));
    assert!(tracker.shapes().iter().all(|s| !s.visible));
}
