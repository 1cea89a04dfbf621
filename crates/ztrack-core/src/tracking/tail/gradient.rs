use ndarray::Array2;

use crate::error::{Result, ZtrackError};
use crate::filters::{gaussian_smooth_1d, preprocess};
use crate::params::{ParameterSet, Variable};
use crate::tracking::{Geometry, Shape};

use super::{Tail, TailStrategy};

/// Walk down the tail, centring each step on the midpoint between the
/// rising and falling edge of a cross-section profile.
pub struct GradientSearch;

/// Corridor geometry of a gradient search.
#[derive(Clone, Copy, Debug)]
pub struct Corridor {
    pub n_segments: usize,
    pub segment_length: f64,
    /// Cross-section half-width at the base.
    pub base_half_width: f64,
    /// Cross-section half-width at the tip.
    pub tip_half_width: f64,
    /// Smoothing of each cross-section profile.
    pub sigma: f64,
}

/// Trace a tail from `base`, starting along `angle` (radians).
///
/// Returns `(x, y, heading)` per segment with the heading in radians. A
/// cross-section reaching outside the image fails the frame.
pub fn gradient_search(
    img: &Array2<u8>,
    base: [f64; 2],
    angle: f64,
    corridor: &Corridor,
) -> Result<Vec<[f64; 3]>> {
    let (h, w) = img.dim();
    let n = corridor.n_segments;
    let r = corridor.segment_length;
    let (mut x, mut y) = (base[0].round(), base[1].round());
    let mut heading = angle;
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        let half = if n > 1 {
            corridor.base_half_width
                + (corridor.tip_half_width - corridor.base_half_width) * i as f64 / (n - 1) as f64
        } else {
            corridor.base_half_width
        };
        let length = (2.0 * half) as usize;
        let (sin, cos) = heading.sin_cos();

        let x0 = x + r * cos - half * sin;
        let x1 = x + r * cos + half * sin;
        let y0 = y + r * sin + half * cos;
        let y1 = y + r * sin - half * cos;
        if x0.min(x1).min(y0).min(y1) < 0.0 || x0.max(x1) >= w as f64 || y0.max(y1) >= h as f64 {
            return Err(ZtrackError::tracking(format!(
                "tail cross-section {i} leaves the image"
            )));
        }
        if length < 2 {
            return Err(ZtrackError::tracking("tail cross-section too narrow"));
        }

        let samples: Vec<(usize, usize)> = (0..length)
            .map(|k| {
                let t = k as f64 / (length - 1) as f64;
                ((x0 + (x1 - x0) * t) as usize, (y0 + (y1 - y0) * t) as usize)
            })
            .collect();
        let profile: Vec<f64> = samples
            .iter()
            .map(|&(sx, sy)| img[[sy, sx]] as f64)
            .collect();
        let profile = gaussian_smooth_1d(&profile, corridor.sigma);

        let m = length / 2;
        let centre = (argmax(&profile[..m]) + m + argmin(&profile[m..])) / 2;
        let (cx, cy) = samples[centre];
        heading = (cy as f64 - y).atan2(cx as f64 - x);
        x += (r * heading.cos()).round();
        y += (r * heading.sin()).round();
        out.push([x, y, heading]);
    }
    Ok(out)
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

/// Index of the first minimum.
fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, &v)| if v < best.1 { (i, v) } else { best })
        .0
}

impl GradientSearch {
    fn corridor(params: &ParameterSet) -> Result<Corridor> {
        Ok(Corridor {
            n_segments: params.int("n_segments")? as usize,
            segment_length: params.int("segment_length")? as f64,
            base_half_width: params.int("w1")? as f64,
            tip_half_width: params.int("w2")? as f64,
            sigma: params.float("sigma_tail")?,
        })
    }
}

impl TailStrategy for GradientSearch {
    fn name(&self) -> &'static str {
        "gradient"
    }

    fn display_name(&self) -> &'static str {
        "Gradient"
    }

    fn parameters(&self) -> Result<ParameterSet> {
        Ok(ParameterSet::new()
            .with("sigma", Variable::float("Sigma (px)", 2.0, 0.0, 100.0, 0.1)?)
            .with("n_segments", Variable::int("Number of segments", 10, 3, 20)?)
            .with("segment_length", Variable::int("Segment length (px)", 10, 5, 50)?)
            .with("tail_base", Variable::point("Tail base (x, y)", (250, 120)))
            .with("angle", Variable::angle360("Initial angle (°)", 90.0)?)
            .with("w1", Variable::int("Tail base width (px)", 30, 5, 100)?)
            .with("w2", Variable::int("Tail end width (px)", 30, 5, 100)?)
            .with("sigma_tail", Variable::float("Profile sigma", 1.0, 0.0, 10.0, 0.1)?)
            .with("invert", Variable::flag("Invert", true)))
    }

    fn has_angles(&self) -> bool {
        true
    }

    fn point_count(&self, params: &ParameterSet) -> Result<usize> {
        Ok(params.int("n_segments")? as usize)
    }

    fn track_tail(
        &self,
        image: &Array2<u8>,
        base: [f64; 2],
        params: &ParameterSet,
    ) -> Result<Tail> {
        let img = preprocess(image, params.float("sigma")?, params.flag("invert")?);
        let segments = gradient_search(&img, base, params.angle_rad("angle")?, &Self::corridor(params)?)?;
        Ok(Tail {
            points: segments.iter().map(|s| [s[0], s[1]]).collect(),
            angles: Some(segments.iter().map(|s| s[2].to_degrees()).collect()),
        })
    }

    fn shapes(&self) -> Vec<Shape> {
        vec![
            Shape::points("tail"),
            Shape::line("base_width"),
            Shape::line("tip_width"),
        ]
    }

    /// Tail points plus the first and last cross-sections.
    fn annotate(&self, shapes: &mut [Shape], values: &[f64], params: &ParameterSet) {
        let segments: Vec<&[f64]> = values.chunks_exact(3).collect();
        let valid = !segments.is_empty() && values.iter().all(|v| !v.is_nan());
        if !valid {
            shapes.iter_mut().for_each(Shape::hide);
            return;
        }
        if let Some(points) = shapes.get_mut(0) {
            points.set(Geometry::Points(segments.iter().map(|s| [s[0], s[1]]).collect()));
        }
        let ends = [
            (segments[0], params.int("w1").unwrap_or(0) as f64),
            (segments[segments.len() - 1], params.int("w2").unwrap_or(0) as f64),
        ];
        for (shape, (seg, half)) in shapes.iter_mut().skip(1).zip(ends) {
            let normal = seg[2].to_radians() + std::f64::consts::FRAC_PI_2;
            let (dx, dy) = (half * normal.cos(), half * normal.sin());
            shape.set(Geometry::Line {
                from: [seg[0] - dx, seg[1] - dy],
                to: [seg[0] + dx, seg[1] + dy],
            });
        }
    }
}
