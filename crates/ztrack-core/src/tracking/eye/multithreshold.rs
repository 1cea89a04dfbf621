use ndarray::Array2;

use crate::detection::{binary_threshold, find_contours};
use crate::error::{Result, ZtrackError};
use crate::filters::preprocess;
use crate::geometry::{
    correct_orientation, fit_ellipse, heading, identify_landmarks, nearest_contour, Ellipse,
};
use crate::params::{ParameterSet, Variable};

use super::{fit_all, largest_three, EyeStrategy};

/// A segmentation threshold to locate the landmarks, then one threshold per
/// landmark to outline each of them.
pub struct MultiThreshold;

/// Thresholds of a multi-threshold segmentation.
#[derive(Clone, Copy, Debug)]
pub struct Thresholds {
    pub segmentation: u8,
    pub left_eye: u8,
    pub right_eye: u8,
    pub swim_bladder: u8,
}

impl Thresholds {
    pub fn from_params(params: &ParameterSet) -> Result<Self> {
        Ok(Self {
            segmentation: params.uint8("threshold_segmentation")?,
            left_eye: params.uint8("threshold_left_eye")?,
            right_eye: params.uint8("threshold_right_eye")?,
            swim_bladder: params.uint8("threshold_swim_bladder")?,
        })
    }
}

/// Threshold parameters shared with the free-swim tracker.
pub(crate) fn threshold_parameters(default: i64) -> Result<ParameterSet> {
    Ok(ParameterSet::new()
        .with(
            "threshold_segmentation",
            Variable::uint8("Segmentation threshold", default)?,
        )
        .with("threshold_left_eye", Variable::uint8("Left eye threshold", default)?)
        .with("threshold_right_eye", Variable::uint8("Right eye threshold", default)?)
        .with(
            "threshold_swim_bladder",
            Variable::uint8("Swim bladder threshold", default)?,
        ))
}

/// Landmark ellipses of a bright-subject image, in (left, right, swim
/// bladder) order.
pub fn multi_threshold_ellipses(img: &Array2<u8>, thresholds: Thresholds) -> Result<[Ellipse; 3]> {
    let mask = binary_threshold(img, thresholds.segmentation);
    let contours = largest_three(find_contours(&mask))?;
    let first = fit_all(&contours)?;
    let centers: Vec<[f64; 2]> = first.iter().map(Ellipse::center).collect();
    let lm = identify_landmarks(&centers)?;

    let refit = |index: usize, threshold: u8| -> Result<Ellipse> {
        let candidates = find_contours(&binary_threshold(img, threshold));
        let contour = nearest_contour(&candidates, centers[index]).ok_or_else(|| {
            ZtrackError::tracking(format!("no blob at threshold {threshold}"))
        })?;
        fit_ellipse(&contour.points)
    };

    let mut ellipses = [
        refit(lm.left_eye, thresholds.left_eye)?,
        refit(lm.right_eye, thresholds.right_eye)?,
        refit(lm.swim_bladder, thresholds.swim_bladder)?,
    ];
    let head = heading(
        centers[lm.left_eye],
        centers[lm.right_eye],
        centers[lm.swim_bladder],
    );
    correct_orientation(&mut ellipses, head);
    Ok(ellipses)
}

impl EyeStrategy for MultiThreshold {
    fn name(&self) -> &'static str {
        "multithreshold"
    }

    fn display_name(&self) -> &'static str {
        "Multi-threshold"
    }

    fn parameters(&self) -> Result<ParameterSet> {
        let mut params = ParameterSet::new()
            .with("sigma", Variable::float("Sigma (px)", 0.0, 0.0, 100.0, 0.1)?);
        params.extend(threshold_parameters(127)?);
        Ok(params)
    }

    fn track_ellipses(&self, image: &Array2<u8>, params: &ParameterSet) -> Result<[Ellipse; 3]> {
        let img = preprocess(image, params.float("sigma")?, true);
        multi_threshold_ellipses(&img, Thresholds::from_params(params)?)
    }
}
