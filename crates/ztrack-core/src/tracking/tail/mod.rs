//! Tail trackers: trace the tail midline from a base point outwards.

pub mod gradient;
pub mod sequential;

use ndarray::Array2;

use crate::error::Result;
use crate::frame::Frame;
use crate::params::ParameterSet;
use crate::roi::{roi_offset, Roi};

use super::{frame_region, Geometry, PoseRecord, Shape, Tracker};

pub use gradient::GradientSearch;
pub use sequential::SequentialSearch;

/// An ordered base-to-tip tail midline, optionally with the local heading
/// (degrees) at each point.
#[derive(Clone, Debug, PartialEq)]
pub struct Tail {
    pub points: Vec<[f64; 2]>,
    pub angles: Option<Vec<f64>>,
}

impl Tail {
    pub fn translated(mut self, dx: f64, dy: f64) -> Self {
        for p in &mut self.points {
            p[0] += dx;
            p[1] += dy;
        }
        self
    }

    /// Flattened `x, y[, angle]` per point.
    pub fn values(&self) -> Vec<f64> {
        self.points
            .iter()
            .enumerate()
            .flat_map(|(i, &[x, y])| {
                let angle = self.angles.as_ref().map(|a| a[i]);
                [Some(x), Some(y), angle].into_iter().flatten()
            })
            .collect()
    }
}

/// Tail column names for `n` points.
pub fn tail_columns(n: usize, with_angles: bool) -> Vec<String> {
    (0..n)
        .flat_map(|i| {
            let mut cols = vec![format!("tail_{i}_x"), format!("tail_{i}_y")];
            if with_angles {
                cols.push(format!("tail_{i}_angle"));
            }
            cols
        })
        .collect()
}

/// Tail points from flattened values with `stride` fields per point.
/// `None` if any coordinate is missing.
pub(crate) fn points_from_values(values: &[f64], stride: usize) -> Option<Vec<[f64; 2]>> {
    values
        .chunks_exact(stride)
        .map(|c| (!c[0].is_nan() && !c[1].is_nan()).then_some([c[0], c[1]]))
        .collect()
}

/// Search strategy of a tail tracker.
pub trait TailStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    /// Parameters with their default values.
    fn parameters(&self) -> Result<ParameterSet>;

    /// Whether each tail point carries a heading.
    fn has_angles(&self) -> bool {
        false
    }

    /// Number of points produced with `params`.
    fn point_count(&self, params: &ParameterSet) -> Result<usize>;

    /// Trace the tail in image coordinates. `base` is already local to the
    /// image.
    fn track_tail(&self, image: &Array2<u8>, base: [f64; 2], params: &ParameterSet)
        -> Result<Tail>;

    fn shapes(&self) -> Vec<Shape> {
        vec![Shape::points("tail")]
    }

    /// Rebuild overlays from flattened tail values in full-frame coordinates.
    fn annotate(&self, shapes: &mut [Shape], values: &[f64], _params: &ParameterSet) {
        let stride = if self.has_angles() { 3 } else { 2 };
        match (shapes.first_mut(), points_from_values(values, stride)) {
            (Some(shape), Some(points)) if !points.is_empty() => {
                shape.set(Geometry::Points(points))
            }
            (Some(shape), _) => shape.hide(),
            _ => {}
        }
    }
}

/// Tracker for the tail of a head-restrained larva, starting at a fixed
/// base point.
pub struct TailTracker {
    strategy: Box<dyn TailStrategy>,
    params: ParameterSet,
    roi: Option<Roi>,
    shapes: Vec<Shape>,
}

impl TailTracker {
    pub fn new(strategy: Box<dyn TailStrategy>) -> Result<Self> {
        let params = strategy.parameters()?;
        let shapes = strategy.shapes();
        Ok(Self {
            strategy,
            params,
            roi: None,
            shapes,
        })
    }

    pub fn sequential() -> Result<Self> {
        Self::new(Box::new(SequentialSearch))
    }

    pub fn gradient() -> Result<Self> {
        Self::new(Box::new(GradientSearch))
    }

    /// The tail in full-frame coordinates.
    pub fn track_tail(&self, frame: &Frame) -> Result<Tail> {
        let image = frame_region(frame, self.roi.as_ref());
        let (dx, dy) = roi_offset(self.roi.as_ref());
        let (bx, by) = self.params.point("tail_base")?;
        let base = [bx as f64 - dx, by as f64 - dy];
        let tail = self.strategy.track_tail(&image, base, &self.params)?;
        Ok(tail.translated(dx, dy))
    }
}

impl Tracker for TailTracker {
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
        let n = self.strategy.point_count(&self.params).unwrap_or(0);
        tail_columns(n, self.strategy.has_angles())
    }

    fn track_frame(&self, frame: &Frame) -> Result<PoseRecord> {
        let tail = self.track_tail(frame)?;
        PoseRecord::new(self.columns(), tail.values())
    }

    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn annotate(&mut self, record: &PoseRecord) {
        self.strategy
            .annotate(&mut self.shapes, &record.values, &self.params);
    }
}
