use std::sync::Arc;

use ndarray::Array2;
use tracing::debug;

use crate::background::{BackgroundModel, BackgroundSubtraction};
use crate::consts::EYE_RAW_LEN;
use crate::error::{Result, ZtrackError};
use crate::filters::gaussian_blur;
use crate::frame::{Frame, FrameSource};
use crate::geometry::{resample_curve, split_length, Ellipse};
use crate::params::{ParameterSet, Variable};
use crate::roi::{roi_offset, Roi};

use super::eye::multithreshold::{multi_threshold_ellipses, threshold_parameters, Thresholds};
use super::eye::{annotate_eyes, ellipses_from_values, eye_columns, eye_shapes, eye_values};
use super::tail::sequential::sequential_search;
use super::tail::{points_from_values, tail_columns};
use super::{frame_region, Geometry, PoseRecord, Shape, Tracker};

/// Eyes, swim bladder and tail of a freely swimming larva, on a
/// background-subtracted image.
///
/// The tail starts at the posterior end of the swim bladder and heads away
/// from the eyes. If only the tail fails, the eye fields are kept and the
/// tail fields are NaN. Tracking needs a background from `prepare` or
/// `set_background` first.
pub struct FreeSwimTracker {
    params: ParameterSet,
    roi: Option<Roi>,
    background: BackgroundSubtraction,
    shapes: Vec<Shape>,
}

impl FreeSwimTracker {
    pub fn new() -> Result<Self> {
        let mut params = ParameterSet::new()
            .with("sigma_eye", Variable::float("Eye sigma (px)", 0.0, 0.0, 100.0, 0.1)?)
            .with("sigma_tail", Variable::float("Tail sigma (px)", 0.0, 0.0, 100.0, 0.1)?);
        params.extend(threshold_parameters(70)?);
        params.insert("n_steps", Variable::int("Number of steps", 20, 3, 20)?);
        params.insert("n_points", Variable::int("Number of points", 51, 0, 100)?);
        params.insert("length", Variable::int("Tail length (px)", 90, 0, 1000)?);
        params.insert("theta", Variable::angle360("Search angle (°)", 60.0)?);

        let mut shapes = eye_shapes();
        shapes.push(Shape::points("tail"));
        Ok(Self {
            params,
            roi: None,
            background: BackgroundSubtraction::new(),
            shapes,
        })
    }

    pub fn background(&self) -> &BackgroundSubtraction {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut BackgroundSubtraction {
        &mut self.background
    }

    /// Use a known background instead of computing one from the video.
    pub fn set_background(&mut self, model: BackgroundModel) {
        self.background.set_model(Some(Arc::new(model)));
    }

    fn tail_point_count(&self) -> Result<usize> {
        match self.params.int("n_points")? {
            0 => Ok(self.params.int("n_steps")? as usize + 1),
            n => Ok(n as usize),
        }
    }

    /// Tail behind the swim bladder, in image coordinates.
    fn track_tail(&self, img: &Array2<u8>, ellipses: &[Ellipse; 3]) -> Result<Vec<[f64; 2]>> {
        let [left, right, sb] = ellipses;
        let mid = [(left.cx + right.cx) / 2.0, (left.cy + right.cy) / 2.0];
        let away = (sb.cy - mid[1]).atan2(sb.cx - mid[0]);
        let (sin, cos) = sb.theta.to_radians().sin_cos();
        let posterior = [
            (sb.cx - sb.semi_major * cos).round(),
            (sb.cy - sb.semi_major * sin).round(),
        ];

        let tail_img = gaussian_blur(img, self.params.float("sigma_tail")?);
        let steps = split_length(self.params.int("length")?, self.params.int("n_steps")? as usize);
        let points = sequential_search(
            &tail_img,
            posterior,
            away,
            self.params.angle_rad("theta")? / 2.0,
            &steps,
        )?;
        Ok(resample_curve(&points, self.params.int("n_points")? as usize))
    }

    /// Raw output: 15 ellipse fields then `x, y` per tail point.
    fn track_raw(&self, frame: &Frame) -> Result<Vec<f64>> {
        let image = frame_region(frame, self.roi.as_ref());
        let img = self.background.subtract(&image, self.roi.as_ref())?;
        let (dx, dy) = roi_offset(self.roi.as_ref());

        let eye_img = gaussian_blur(&img, self.params.float("sigma_eye")?);
        let ellipses = multi_threshold_ellipses(&eye_img, Thresholds::from_params(&self.params)?)?;

        let tail = match self.track_tail(&img, &ellipses) {
            Ok(points) => points.iter().flat_map(|p| [p[0] + dx, p[1] + dy]).collect(),
            Err(e) if e.is_tracking() => {
                debug!(error = %e, "Tail not tracked");
                vec![f64::NAN; 2 * self.tail_point_count()?]
            }
            Err(e) => return Err(e),
        };

        let mut raw: Vec<f64> = ellipses
            .iter()
            .flat_map(|e| e.translated(dx, dy).to_array())
            .collect();
        raw.extend(tail);
        Ok(raw)
    }

    /// Name raw output, splitting it into eye and tail parts.
    fn name_raw(&self, raw: &[f64]) -> Result<PoseRecord> {
        let (eye, tail) = raw.split_at(EYE_RAW_LEN.min(raw.len()));
        let ellipses = ellipses_from_values(eye)
            .ok_or_else(|| ZtrackError::tracking("incomplete eye output"))?;
        let mut values = eye_values(&ellipses);
        values.extend_from_slice(tail);
        PoseRecord::new(self.columns(), values)
    }
}

impl Tracker for FreeSwimTracker {
    fn name(&self) -> &'static str {
        "freeswim"
    }

    fn display_name(&self) -> &'static str {
        "Free swimming"
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
        let mut columns = eye_columns();
        columns.extend(tail_columns(self.tail_point_count().unwrap_or(0), false));
        columns
    }

    fn track_frame(&self, frame: &Frame) -> Result<PoseRecord> {
        let raw = self.track_raw(frame)?;
        self.name_raw(&raw)
    }

    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn annotate(&mut self, record: &PoseRecord) {
        let split = eye_columns().len().min(record.values.len());
        let (eye, tail) = record.values.split_at(split);
        annotate_eyes(&mut self.shapes, eye);
        if let Some(shape) = self.shapes.get_mut(3) {
            match points_from_values(tail, 2) {
                Some(points) if !points.is_empty() => shape.set(Geometry::Points(points)),
                _ => shape.hide(),
            }
        }
    }

    fn prepare(&mut self, source: &dyn FrameSource) -> Result<()> {
        self.background.prepare(source)
    }
}
