mod common;

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use common::{draw_blobs, larva_blobs, Blob};
use ztrack_core::background::{
    cache_path, compute_background, load_or_compute, median_image, sample_indices,
    BackgroundModel, BackgroundSubtraction,
};
use ztrack_core::error::ZtrackError;
use ztrack_core::frame::{Frame, MemoryVideo};
use ztrack_core::io::image_io::{load_gray, save_gray_png};
use ztrack_core::roi::Roi;
use ztrack_core::tracking::{FreeSwimTracker, Geometry, Tracker};

/// `n` identical frames of one grey level.
fn uniform_video(level: u8, n: usize) -> MemoryVideo {
    common::static_video(&Array2::from_elem((20, 40), level), n)
}

/// A small dark square at a different place in every frame.
fn moving_square_video(n: usize) -> MemoryVideo {
    let frames = (0..n)
        .map(|i| {
            let mut img = Array2::<u8>::from_elem((20, 40), 100);
            for row in 8..11 {
                for col in 4 * i..4 * i + 3 {
                    img[[row, col]] = 0;
                }
            }
            Frame::Gray(img)
        })
        .collect();
    MemoryVideo::new(frames)
}

// ---------------------------------------------------------------------------
// Median background
// ---------------------------------------------------------------------------

#[test]
fn test_sample_indices() {
    assert_eq!(sample_indices(10, 4), vec![0, 3, 6, 9]);
    assert_eq!(sample_indices(5, 300), vec![0, 1, 2, 3, 4]);
    assert_eq!(sample_indices(7, 1), vec![0]);
    assert!(sample_indices(0, 3).is_empty());
}

#[test]
fn test_median_removes_moving_subject() {
    let video = moving_square_video(7);
    let model = compute_background(&video, 300).unwrap();
    assert!(model.background.iter().all(|&v| v == 100));
    assert!(!model.subject_darker);
}

#[test]
fn test_median_even_count_truncates() {
    let a = Array2::from_elem((2, 2), 10u8);
    let b = Array2::from_elem((2, 2), 13u8);
    let median = median_image(&[a, b]).unwrap();
    assert!(median.iter().all(|&v| v == 11));
}

#[test]
fn test_median_rejects_mixed_sizes() {
    let a = Array2::<u8>::zeros((2, 2));
    let b = Array2::<u8>::zeros((3, 2));
    assert!(median_image(&[a, b]).is_err());
}

#[test]
fn test_empty_video_has_no_background() {
    let video = MemoryVideo::new(Vec::new());
    assert!(compute_background(&video, 10).is_err());
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[test]
fn test_cache_written_and_reused() {
    let dir = tempfile::tempdir().unwrap();
    let video_path = dir.path().join("larva.avi");
    let video = moving_square_video(5).with_path(&video_path);

    let first = load_or_compute(&video, 300).unwrap();
    let cached = cache_path(&video_path);
    assert_eq!(cached, dir.path().join("larva.png"));
    assert!(cached.is_file());

    // A different video at the same path reuses the cached image.
    let other = MemoryVideo::new(vec![Frame::Gray(Array2::from_elem((20, 40), 7u8))])
        .with_path(&video_path);
    let second = load_or_compute(&other, 300).unwrap();
    assert_eq!(second.background, first.background);
}

#[test]
fn test_cache_with_wrong_size_is_recomputed() {
    let dir = tempfile::tempdir().unwrap();
    let video_path = dir.path().join("larva.avi");
    save_gray_png(&Array2::from_elem((5, 5), 1u8), &cache_path(&video_path)).unwrap();

    let video = moving_square_video(5).with_path(&video_path);
    let model = load_or_compute(&video, 300).unwrap();
    assert_eq!(model.background.dim(), (20, 40));
    assert_eq!(load_gray(&cache_path(&video_path)).unwrap().dim(), (20, 40));
}

#[test]
fn test_invalidate_deletes_cache() {
    let dir = tempfile::tempdir().unwrap();
    let video_path = dir.path().join("larva.avi");
    let video = moving_square_video(3).with_path(&video_path);

    let mut subtraction = BackgroundSubtraction::new().with_sample_count(3);
    subtraction.prepare(&video).unwrap();
    assert!(subtraction.model().is_some());
    assert!(cache_path(&video_path).is_file());

    subtraction.invalidate(Some(&video_path)).unwrap();
    assert!(subtraction.model().is_none());
    assert!(!cache_path(&video_path).exists());
}

#[test]
fn test_prepare_keeps_fixed_model() {
    let model = Arc::new(BackgroundModel::new(Array2::from_elem((20, 40), 42u8)));
    let mut subtraction = BackgroundSubtraction::default();
    subtraction.set_model(Some(model.clone()));
    subtraction.prepare(&moving_square_video(3)).unwrap();
    subtraction.prepare(&uniform_video(10, 2)).unwrap();
    assert!(Arc::ptr_eq(subtraction.model().unwrap(), &model));
}

#[test]
fn test_prepare_reuses_model_for_same_video() {
    let dir = tempfile::tempdir().unwrap();
    let video = moving_square_video(3).with_path(dir.path().join("larva.avi"));

    let mut subtraction = BackgroundSubtraction::new();
    subtraction.prepare(&video).unwrap();
    let first = subtraction.model().unwrap().clone();
    subtraction.prepare(&video).unwrap();
    assert!(Arc::ptr_eq(subtraction.model().unwrap(), &first));
}

#[test]
fn test_prepare_replaces_model_for_new_video() {
    let dir = tempfile::tempdir().unwrap();
    let a = uniform_video(230, 3).with_path(dir.path().join("a.avi"));
    let b = uniform_video(40, 3).with_path(dir.path().join("b.avi"));

    let mut subtraction = BackgroundSubtraction::new();
    subtraction.prepare(&a).unwrap();
    assert_eq!(subtraction.model().unwrap().background[[0, 0]], 230);
    subtraction.prepare(&b).unwrap();
    let model = subtraction.model().unwrap();
    assert_eq!(model.background[[0, 0]], 40);
    assert!(!model.subject_darker);
}

#[test]
fn test_free_swim_background_follows_video() {
    let mut tracker = FreeSwimTracker::new().unwrap();

    tracker.track_frames(&uniform_video(230, 2)).unwrap();
    let first = tracker.background().model().unwrap();
    assert_eq!(first.background[[0, 0]], 230);
    assert!(first.subject_darker);

    tracker.track_frames(&uniform_video(40, 2)).unwrap();
    let second = tracker.background().model().unwrap();
    assert_eq!(second.background[[0, 0]], 40);
    assert!(!second.subject_darker);
}

// ---------------------------------------------------------------------------
// Subtraction
// ---------------------------------------------------------------------------

#[test]
fn test_subtract_dark_subject() {
    let model = BackgroundModel::new(Array2::from_elem((10, 10), 200u8));
    assert!(model.subject_darker);
    let mut frame = Array2::from_elem((10, 10), 200u8);
    frame[[4, 4]] = 50;
    let out = model.subtract(&frame).unwrap();
    assert_eq!(out[[4, 4]], 150);
    assert_eq!(out[[0, 0]], 0);
}

#[test]
fn test_subtract_bright_subject() {
    let model = BackgroundModel::new(Array2::from_elem((10, 10), 10u8));
    assert!(!model.subject_darker);
    let mut frame = Array2::from_elem((10, 10), 10u8);
    frame[[4, 4]] = 210;
    let out = model.subtract(&frame).unwrap();
    assert_eq!(out[[4, 4]], 200);
    assert_eq!(out[[9, 9]], 0);
}

#[test]
fn test_subtract_region() {
    let mut bg = Array2::from_elem((10, 10), 200u8);
    bg[[5, 5]] = 100;
    let model = BackgroundModel::new(bg);
    let roi = Roi::normalized(4, 4, 3, 3);
    let crop = Array2::from_elem((3, 3), 100u8);
    let out = model.subtract_region(&crop, Some(&roi)).unwrap();
    assert_eq!(out[[1, 1]], 0);
    assert_eq!(out[[0, 0]], 100);

    assert!(model.subtract_region(&crop, None).is_err());
}

#[test]
fn test_subtract_without_model_fails() {
    let subtraction = BackgroundSubtraction::new();
    let err = subtraction
        .subtract(&Array2::from_elem((4, 4), 230u8), None)
        .unwrap_err();
    assert!(matches!(err, ZtrackError::Configuration(_)));
}

// ---------------------------------------------------------------------------
// Free-swimming tracker
// ---------------------------------------------------------------------------

const FIELD: u8 = 230;

/// A 120x200 larva facing up with a faint tail running down from the swim
/// bladder, and the matching empty background.
fn free_swim_scene() -> (Array2<u8>, Array2<u8>) {
    let mut img = draw_blobs(120, 200, FIELD, 20, &larva_blobs());
    for row in 86..190 {
        for col in 59..=61 {
            img[[row, col]] = 180;
        }
    }
    (img, Array2::from_elem((200, 120), FIELD))
}

fn free_swim_tracker(background: Array2<u8>) -> FreeSwimTracker {
    let mut tracker = FreeSwimTracker::new().unwrap();
    tracker.set_background(BackgroundModel::new(background));
    tracker
}

#[test]
fn test_free_swim_columns() {
    let tracker = FreeSwimTracker::new().unwrap();
    let columns = tracker.columns();
    assert_eq!(columns.len(), 18 + 2 * 51);
    assert_eq!(columns[14], "swim_bladder_theta");
    assert_eq!(columns[17], "right_eye_angle");
    assert_eq!(columns[18], "tail_0_x");
}

#[test]
fn test_free_swim_eyes_and_tail() {
    let (img, bg) = free_swim_scene();
    let tracker = free_swim_tracker(bg);
    let record = tracker.track_frame(&Frame::Gray(img)).unwrap();

    assert_abs_diff_eq!(record.get("left_eye_x").unwrap(), 50.0, epsilon = 0.5);
    assert_abs_diff_eq!(record.get("right_eye_x").unwrap(), 70.0, epsilon = 0.5);
    assert_abs_diff_eq!(record.get("swim_bladder_y").unwrap(), 75.0, epsilon = 0.5);

    let base_x = record.get("tail_0_x").unwrap();
    let base_y = record.get("tail_0_y").unwrap();
    assert!((59.0..=61.0).contains(&base_x), "base x = {base_x}");
    assert!((84.0..=86.0).contains(&base_y), "base y = {base_y}");

    for i in 0..51 {
        let x = record.get(&format!("tail_{i}_x")).unwrap();
        assert!((58.5..=61.5).contains(&x), "tail_{i}_x = {x}");
    }
    let tip = record.get("tail_50_y").unwrap();
    assert!((165.0..=180.0).contains(&tip), "tip y = {tip}");
}

#[test]
fn test_free_swim_is_deterministic() {
    let (img, bg) = free_swim_scene();
    let tracker = free_swim_tracker(bg);
    let frame = Frame::Gray(img);
    let a = tracker.track_frame(&frame).unwrap();
    let b = tracker.track_frame(&frame).unwrap();
    assert!(a.bit_eq(&b));
}

#[test]
fn test_free_swim_tail_failure_keeps_eyes() {
    // Swim bladder touching the bottom edge: no room to search for a tail.
    let blobs = [
        Blob {
            cy: 90.0,
            ..larva_blobs()[0]
        },
        Blob {
            cy: 90.0,
            ..larva_blobs()[1]
        },
        Blob {
            cx: 60.0,
            cy: 108.0,
            semi_major: 8.0,
            semi_minor: 5.0,
            theta: -90.0,
        },
    ];
    let img = draw_blobs(120, 120, FIELD, 20, &blobs);
    let tracker = free_swim_tracker(Array2::from_elem((120, 120), FIELD));
    let record = tracker.track_frame(&Frame::Gray(img)).unwrap();

    assert!(!record.get("left_eye_x").unwrap().is_nan());
    assert!(!record.get("swim_bladder_theta").unwrap().is_nan());
    assert!(record.get("tail_0_x").unwrap().is_nan());
    assert!(record.get("tail_50_y").unwrap().is_nan());
}

#[test]
fn test_free_swim_prepares_background_from_video() {
    let (img, _) = free_swim_scene();
    let video = common::static_video(&img, 4);
    let mut tracker = FreeSwimTracker::new().unwrap();
    let table = tracker.track_frames(&video).unwrap();
    assert!(tracker.background().model().is_some());
    // A static larva is part of its own median background.
    assert_eq!(table.missing_count(), 4);
}

#[test]
fn test_free_swim_needs_background() {
    let tracker = FreeSwimTracker::new().unwrap();
    let err = tracker
        .track_frame(&Frame::Gray(common::larva_frame()))
        .unwrap_err();
    assert!(!err.is_tracking());
    assert!(matches!(err, ZtrackError::Configuration(_)));
}

#[test]
fn test_free_swim_annotate() {
    let (img, bg) = free_swim_scene();
    let mut tracker = free_swim_tracker(bg);
    let record = tracker.track_frame(&Frame::Gray(img)).unwrap();
    tracker.annotate(&record);

    let shapes = tracker.shapes();
    assert_eq!(shapes.len(), 4);
    assert!(shapes.iter().all(|s| s.visible));
    match &shapes[3].geometry {
        Geometry::Points(points) => assert_eq!(points.len(), 51),
        other => panic!("unexpected geometry {other:?}"),
    }
}
