use nalgebra::{DMatrix, DVector};

use crate::consts::{CONIC_FIT_SCALE, ELLIPSE_FIELDS, ELLIPSE_MIN_POINTS, FIT_EPSILON};
use crate::error::{Result, ZtrackError};

use super::hull::convex_hull;

/// An ellipse in pixel coordinates.
///
/// `theta` is the orientation of the major axis in degrees, measured from the
/// +x axis towards +y (clockwise on screen).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub semi_major: f64,
    pub semi_minor: f64,
    pub theta: f64,
}

impl Ellipse {
    pub fn center(&self) -> [f64; 2] {
        [self.cx, self.cy]
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            ..*self
        }
    }

    pub fn to_array(&self) -> [f64; ELLIPSE_FIELDS] {
        [self.cx, self.cy, self.semi_major, self.semi_minor, self.theta]
    }

    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match *values {
            [cx, cy, semi_major, semi_minor, theta, ..] => Some(Self {
                cx,
                cy,
                semi_major,
                semi_minor,
                theta,
            }),
            _ => None,
        }
    }
}

/// Least-squares ellipse through the convex hull of `points`.
///
/// Falls back to the raw points when the hull is too small. At least five
/// points are required.
pub fn fit_ellipse(points: &[[f64; 2]]) -> Result<Ellipse> {
    let hull = convex_hull(points);
    let pts = if hull.len() >= ELLIPSE_MIN_POINTS {
        hull
    } else {
        points.to_vec()
    };
    fit_ellipse_points(&pts)
}

/// Least-squares ellipse through exactly the given points.
pub fn fit_ellipse_points(points: &[[f64; 2]]) -> Result<Ellipse> {
    let n = points.len();
    if n < ELLIPSE_MIN_POINTS {
        return Err(ZtrackError::tracking(format!(
            "ellipse fit needs {ELLIPSE_MIN_POINTS} points, got {n}"
        )));
    }

    let mx = points.iter().map(|p| p[0]).sum::<f64>() / n as f64;
    let my = points.iter().map(|p| p[1]).sum::<f64>() / n as f64;

    // Stage 1: general conic, used only to locate the centre.
    let a = DMatrix::from_fn(n, 5, |i, j| {
        let x = points[i][0] - mx;
        let y = points[i][1] - my;
        match j {
            0 => -x * x,
            1 => -y * y,
            2 => -x * y,
            3 => x,
            _ => y,
        }
    });
    let b = DVector::from_element(n, CONIC_FIT_SCALE);
    let g = solve(a, b)?;

    let det = 4.0 * g[0] * g[1] - g[2] * g[2];
    if det.abs() < FIT_EPSILON {
        return Err(ZtrackError::tracking("degenerate conic, no centre"));
    }
    let x0 = (2.0 * g[1] * g[3] - g[2] * g[4]) / det;
    let y0 = (2.0 * g[0] * g[4] - g[2] * g[3]) / det;

    // Stage 2: centred quadratic form.
    let a = DMatrix::from_fn(n, 3, |i, j| {
        let x = points[i][0] - mx - x0;
        let y = points[i][1] - my - y0;
        match j {
            0 => x * x,
            1 => y * y,
            _ => x * y,
        }
    });
    let b = DVector::from_element(n, 1.0);
    let q = solve(a, b)?;
    let (qa, qb, qc) = (q[0], q[1], q[2]);

    let mean = (qa + qb) / 2.0;
    let r = (((qa - qb) / 2.0).powi(2) + (qc / 2.0).powi(2)).sqrt();
    let lambda_max = mean + r;
    let lambda_min = mean - r;
    if lambda_min <= 0.0 {
        return Err(ZtrackError::tracking("points do not describe an ellipse"));
    }

    // Direction of the eigenvector for lambda_max, i.e. the minor axis.
    let minor_dir = (0.5 * qc.atan2(qa - qb)).to_degrees().rem_euclid(180.0);

    Ok(Ellipse {
        cx: mx + x0,
        cy: my + y0,
        semi_major: 1.0 / lambda_min.sqrt(),
        semi_minor: 1.0 / lambda_max.sqrt(),
        theta: minor_dir - 90.0,
    })
}

fn solve(a: DMatrix<f64>, b: DVector<f64>) -> Result<DVector<f64>> {
    let svd = a.svd(true, true);
    svd.solve(&b, FIT_EPSILON)
        .map_err(|e| ZtrackError::tracking(format!("least-squares solve failed: {e}")))
}
