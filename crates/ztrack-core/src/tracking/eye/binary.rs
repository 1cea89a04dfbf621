use ndarray::Array2;

use crate::detection::{binary_threshold, find_contours};
use crate::error::Result;
use crate::filters::preprocess;
use crate::geometry::{identify_landmarks, Ellipse};
use crate::params::{ParameterSet, Variable};

use super::{fit_all, largest_three, order_and_orient, EyeStrategy};

/// One global threshold; the three largest blobs are the landmarks.
pub struct BinaryThreshold;

impl EyeStrategy for BinaryThreshold {
    fn name(&self) -> &'static str {
        "binary"
    }

    fn display_name(&self) -> &'static str {
        "Binary threshold"
    }

    fn parameters(&self) -> Result<ParameterSet> {
        Ok(ParameterSet::new()
            .with("sigma", Variable::float("Sigma (px)", 2.0, 0.0, 100.0, 0.1)?)
            .with("threshold", Variable::uint8("Threshold", 127)?))
    }

    fn track_ellipses(&self, image: &Array2<u8>, params: &ParameterSet) -> Result<[Ellipse; 3]> {
        let img = preprocess(image, params.float("sigma")?, true);
        let mask = binary_threshold(&img, params.uint8("threshold")?);
        let contours = largest_three(find_contours(&mask))?;
        let ellipses = fit_all(&contours)?;
        let centers: Vec<[f64; 2]> = ellipses.iter().map(Ellipse::center).collect();
        let landmarks = identify_landmarks(&centers)?;
        Ok(order_and_orient(&ellipses, landmarks))
    }
}
