use ndarray::Array2;

use crate::detection::{adaptive_threshold, find_contours};
use crate::error::Result;
use crate::filters::preprocess;
use crate::geometry::{contour_center, identify_landmarks, Ellipse};
use crate::params::{ParameterSet, Variable};

use super::{fit_all, largest_three, order_and_orient, EyeStrategy};

/// Local mean threshold, robust to uneven illumination. Landmarks are told
/// apart by contour centroids before any ellipse is fitted.
pub struct AdaptiveThreshold;

impl EyeStrategy for AdaptiveThreshold {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn display_name(&self) -> &'static str {
        "Adaptive threshold"
    }

    fn parameters(&self) -> Result<ParameterSet> {
        Ok(ParameterSet::new()
            .with("sigma", Variable::float("Sigma (px)", 2.0, 0.0, 100.0, 0.1)?)
            .with("block_size", Variable::odd_int("Block size (px)", 11, 3, 99)?)
            .with("c", Variable::int("C", 0, -100, 100)?))
    }

    fn track_ellipses(&self, image: &Array2<u8>, params: &ParameterSet) -> Result<[Ellipse; 3]> {
        let img = preprocess(image, params.float("sigma")?, true);
        let mask = adaptive_threshold(&img, params.int("block_size")? as usize, params.int("c")?);
        let contours = largest_three(find_contours(&mask))?;
        let centers = contours
            .iter()
            .map(|c| contour_center(&c.points))
            .collect::<Result<Vec<_>>>()?;
        let landmarks = identify_landmarks(&centers)?;
        let ellipses = fit_all(&contours)?;
        Ok(order_and_orient(&ellipses, landmarks))
    }
}
