//! Eye trackers: segment two eyes and the swim bladder, fit an ellipse to
//! each and orient them along the fish's heading.

pub mod adaptive;
pub mod binary;
pub mod multithreshold;

use std::cmp::Ordering;

use ndarray::Array2;

use crate::consts::{ELLIPSE_FIELDS, EYE_RAW_LEN};
use crate::detection::Contour;
use crate::error::{Result, ZtrackError};
use crate::frame::Frame;
use crate::geometry::{
    contour_area, correct_orientation, fit_ellipse, heading, relative_angle, Ellipse, Landmarks,
};
use crate::params::ParameterSet;
use crate::roi::{roi_offset, Roi};

use super::{frame_region, prefixed, Geometry, PoseRecord, Shape, Tracker};

pub use adaptive::AdaptiveThreshold;
pub use binary::BinaryThreshold;
pub use multithreshold::MultiThreshold;

const ELLIPSE_COLUMNS: [&str; ELLIPSE_FIELDS] = ["x", "y", "semi_major", "semi_minor", "theta"];
const LANDMARKS: [&str; 3] = ["left_eye", "right_eye", "swim_bladder"];

/// Segmentation strategy of an eye tracker.
///
/// Strategies are stateless; the tracker owns their parameters.
pub trait EyeStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    /// Parameters with their default values.
    fn parameters(&self) -> Result<ParameterSet>;

    /// Ellipses of (left eye, right eye, swim bladder) in image coordinates,
    /// oriented along the heading.
    fn track_ellipses(&self, image: &Array2<u8>, params: &ParameterSet) -> Result<[Ellipse; 3]>;
}

/// Column names of an eye record: three ellipses, heading, eye angles.
pub fn eye_columns() -> Vec<String> {
    let mut columns: Vec<String> = LANDMARKS
        .iter()
        .flat_map(|l| prefixed(l, &ELLIPSE_COLUMNS))
        .collect();
    columns.extend(["heading", "left_eye_angle", "right_eye_angle"].map(String::from));
    columns
}

/// Named eye values from the three ellipses: the 15 raw fields followed by
/// heading and the eye angles relative to it, all in degrees.
pub fn eye_values(ellipses: &[Ellipse; 3]) -> Vec<f64> {
    let [left, right, sb] = ellipses;
    let head = heading(left.center(), right.center(), sb.center());
    let mut values: Vec<f64> = ellipses.iter().flat_map(|e| e.to_array()).collect();
    values.extend([
        head,
        relative_angle(left.theta, head),
        relative_angle(right.theta, head),
    ]);
    values
}

/// Ellipses back from the first 15 values of an eye record.
pub fn ellipses_from_values(values: &[f64]) -> Option<[Ellipse; 3]> {
    if values.len() < EYE_RAW_LEN || values[..EYE_RAW_LEN].iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut chunks = values[..EYE_RAW_LEN].chunks(ELLIPSE_FIELDS);
    let mut next = || chunks.next().and_then(Ellipse::from_slice);
    Some([next()?, next()?, next()?])
}

pub(crate) fn eye_shapes() -> Vec<Shape> {
    LANDMARKS.iter().map(|&l| Shape::ellipse(l)).collect()
}

/// Point the first three shapes at the ellipses in `values`, or hide them.
pub(crate) fn annotate_eyes(shapes: &mut [Shape], values: &[f64]) {
    match ellipses_from_values(values) {
        Some(ellipses) => {
            for (shape, e) in shapes.iter_mut().zip(ellipses) {
                shape.set(Geometry::Ellipse(e));
            }
        }
        None => shapes.iter_mut().take(3).for_each(Shape::hide),
    }
}

/// The three largest contours by enclosed area.
pub(crate) fn largest_three(mut contours: Vec<Contour>) -> Result<Vec<Contour>> {
    if contours.len() < 3 {
        return Err(ZtrackError::tracking(format!(
            "expected at least 3 blobs, found {}",
            contours.len()
        )));
    }
    contours.sort_by(|a, b| {
        contour_area(&b.points)
            .partial_cmp(&contour_area(&a.points))
            .unwrap_or(Ordering::Equal)
    });
    contours.truncate(3);
    Ok(contours)
}

pub(crate) fn fit_all(contours: &[Contour]) -> Result<Vec<Ellipse>> {
    contours.iter().map(|c| fit_ellipse(&c.points)).collect()
}

/// Put ellipses in (left, right, swim bladder) order and orient them along
/// the heading given by their centres.
pub(crate) fn order_and_orient(ellipses: &[Ellipse], landmarks: Landmarks) -> [Ellipse; 3] {
    let mut ordered = [
        ellipses[landmarks.left_eye],
        ellipses[landmarks.right_eye],
        ellipses[landmarks.swim_bladder],
    ];
    let head = heading(ordered[0].center(), ordered[1].center(), ordered[2].center());
    correct_orientation(&mut ordered, head);
    ordered
}

/// Tracker for the eyes and swim bladder of a head-restrained larva.
pub struct EyeTracker {
    strategy: Box<dyn EyeStrategy>,
    params: ParameterSet,
    roi: Option<Roi>,
    shapes: Vec<Shape>,
}

impl EyeTracker {
    pub fn new(strategy: Box<dyn EyeStrategy>) -> Result<Self> {
        let params = strategy.parameters()?;
        Ok(Self {
            strategy,
            params,
            roi: None,
            shapes: eye_shapes(),
        })
    }

    pub fn binary() -> Result<Self> {
        Self::new(Box::new(BinaryThreshold))
    }

    pub fn multithreshold() -> Result<Self> {
        Self::new(Box::new(MultiThreshold))
    }

    pub fn adaptive() -> Result<Self> {
        Self::new(Box::new(AdaptiveThreshold))
    }

    /// Ellipses in full-frame coordinates.
    pub fn track_ellipses(&self, frame: &Frame) -> Result<[Ellipse; 3]> {
        let image = frame_region(frame, self.roi.as_ref());
        let (dx, dy) = roi_offset(self.roi.as_ref());
        let ellipses = self.strategy.track_ellipses(&image, &self.params)?;
        Ok(ellipses.map(|e| e.translated(dx, dy)))
    }
}

impl Tracker for EyeTracker {
    fn name(&self) -> &'static str {
        self.strategy.name()
    }

    fn display_name(&self) -> &'static str {
        self.strategy.display_name()
    }

    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    fn roi(&self) -> Option<Roi> {
        self.roi
    }

    fn set_roi(&mut self, roi: Option<Roi>) {
        self.roi = roi;
    }

    fn columns(&self) -> Vec<String> {
        eye_columns()
    }

    fn track_frame(&self, frame: &Frame) -> Result<PoseRecord> {
        let ellipses = self.track_ellipses(frame)?;
        PoseRecord::new(eye_columns(), eye_values(&ellipses))
    }

    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn annotate(&mut self, record: &PoseRecord) {
        annotate_eyes(&mut self.shapes, &record.values);
    }
}
