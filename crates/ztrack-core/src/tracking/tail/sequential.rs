use std::f64::consts::PI;

use ndarray::Array2;

use crate::error::{Result, ZtrackError};
use crate::filters::preprocess;
use crate::geometry::{circle_perimeter, resample_curve, split_length};
use crate::params::{ParameterSet, Variable};

use super::{Tail, TailStrategy};

/// Step along the tail, each time picking the brightest pixel on an arc
/// ahead of the current heading.
pub struct SequentialSearch;

/// Trace a bright tail from `base`, starting along `angle` (radians).
///
/// Each step looks at the pixels of a circle of radius `step_lengths[i]`
/// around the current point that lie inside the image and within
/// `half_angle` of the current heading, and moves to the brightest. Returns
/// `step_lengths.len() + 1` points, base first.
pub fn sequential_search(
    img: &Array2<u8>,
    base: [f64; 2],
    angle: f64,
    half_angle: f64,
    step_lengths: &[i64],
) -> Result<Vec<[f64; 2]>> {
    let (h, w) = img.dim();
    let mut point = (base[0].round() as i64, base[1].round() as i64);
    let mut heading = angle;
    let mut tail = Vec::with_capacity(step_lengths.len() + 1);
    tail.push([point.0 as f64, point.1 as f64]);

    for &radius in step_lengths {
        let best = circle_perimeter(radius)
            .into_iter()
            .filter_map(|(dx, dy)| {
                let (x, y) = (point.0 + dx, point.1 + dy);
                if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                    return None;
                }
                let a = (dy as f64).atan2(dx as f64);
                (angle_diff(a, heading) < half_angle).then_some((x, y, a))
            })
            .fold(None, |best: Option<(i64, i64, f64, u8)>, (x, y, a)| {
                let v = img[[y as usize, x as usize]];
                match best {
                    Some((.., bv)) if bv >= v => best,
                    _ => Some((x, y, a, v)),
                }
            });

        let (x, y, a, _) =
            best.ok_or_else(|| ZtrackError::tracking("no tail candidates on search arc"))?;
        point = (x, y);
        heading = a;
        tail.push([x as f64, y as f64]);
    }
    Ok(tail)
}

/// Absolute difference of two angles in radians, in `[0, pi]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    ((a - b + PI).rem_euclid(2.0 * PI) - PI).abs()
}

impl TailStrategy for SequentialSearch {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn display_name(&self) -> &'static str {
        "Sequential"
    }

    fn parameters(&self) -> Result<ParameterSet> {
        Ok(ParameterSet::new()
            .with("sigma", Variable::float("Sigma (px)", 2.0, 0.0, 100.0, 0.1)?)
            .with("n_steps", Variable::int("Number of steps", 10, 3, 20)?)
            .with("length", Variable::int("Tail length (px)", 200, 0, 1000)?)
            .with("tail_base", Variable::point("Tail base (x, y)", (250, 120)))
            .with("angle", Variable::angle360("Initial angle (°)", 90.0)?)
            .with("theta", Variable::angle360("Search angle (°)", 60.0)?)
            .with("n_points", Variable::int("Number of points", 51, 0, 100)?)
            .with("invert", Variable::flag("Invert", true)))
    }

    fn point_count(&self, params: &ParameterSet) -> Result<usize> {
        match params.int("n_points")? {
            0 => Ok(params.int("n_steps")? as usize + 1),
            n => Ok(n as usize),
        }
    }

    fn track_tail(
        &self,
        image: &Array2<u8>,
        base: [f64; 2],
        params: &ParameterSet,
    ) -> Result<Tail> {
        let img = preprocess(image, params.float("sigma")?, params.flag("invert")?);
        let steps = split_length(params.int("length")?, params.int("n_steps")? as usize);
        let points = sequential_search(
            &img,
            base,
            params.angle_rad("angle")?,
            params.angle_rad("theta")? / 2.0,
            &steps,
        )?;
        Ok(Tail {
            points: resample_curve(&points, params.int("n_points")? as usize),
            angles: None,
        })
    }
}
