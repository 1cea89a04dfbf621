use super::polygon::distance;

/// Split an integer length into `n` nearly-equal integer steps that sum to
/// `total`. The first `total % n` steps are one longer.
pub fn split_length(total: i64, n: usize) -> Vec<i64> {
    if n == 0 {
        return Vec::new();
    }
    let n_i = n as i64;
    let (base, rem) = (total.div_euclid(n_i), total.rem_euclid(n_i));
    (0..n_i).map(|i| base + i64::from(i < rem)).collect()
}

/// Pixels on a circle of the given integer radius (midpoint algorithm),
/// relative to the centre. Each octant point is listed once.
pub fn circle_perimeter(radius: i64) -> Vec<(i64, i64)> {
    if radius <= 0 {
        return vec![(0, 0)];
    }
    let mut points = Vec::new();
    let (mut x, mut y) = (radius, 0i64);
    let mut err = 1 - radius;
    while x >= y {
        for (dx, dy) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            if !points.contains(&(dx, dy)) {
                points.push((dx, dy));
            }
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
    points
}

/// Resample a polyline to `n` points evenly spaced in chord-length
/// parameter, through a natural cubic spline per coordinate.
///
/// `n == 0` returns the input unchanged.
pub fn resample_curve(points: &[[f64; 2]], n: usize) -> Vec<[f64; 2]> {
    if n == 0 || points.is_empty() {
        return points.to_vec();
    }
    let mut pts: Vec<[f64; 2]> = Vec::with_capacity(points.len());
    for &p in points {
        if pts.last() != Some(&p) {
            pts.push(p);
        }
    }
    if pts.len() == 1 {
        return vec![pts[0]; n];
    }

    let mut t = Vec::with_capacity(pts.len());
    t.push(0.0);
    for w in pts.windows(2) {
        let prev = t[t.len() - 1];
        t.push(prev + distance(w[0], w[1]));
    }
    let xs: Vec<f64> = pts.iter().map(|p| p[0]).collect();
    let ys: Vec<f64> = pts.iter().map(|p| p[1]).collect();
    let sx = NaturalSpline::new(&t, &xs);
    let sy = NaturalSpline::new(&t, &ys);

    let end = t[t.len() - 1];
    (0..n)
        .map(|i| {
            let u = if n == 1 {
                0.0
            } else {
                end * i as f64 / (n - 1) as f64
            };
            [sx.eval(u), sy.eval(u)]
        })
        .collect()
}

struct NaturalSpline<'a> {
    t: &'a [f64],
    y: &'a [f64],
    m: Vec<f64>,
}

impl<'a> NaturalSpline<'a> {
    /// Second derivatives at the knots by the Thomas algorithm, with zero
    /// curvature at both ends.
    fn new(t: &'a [f64], y: &'a [f64]) -> Self {
        let n = t.len();
        let mut m = vec![0.0; n];
        if n > 2 {
            let h: Vec<f64> = t.windows(2).map(|w| w[1] - w[0]).collect();
            let k = n - 2;
            let mut diag = vec![0.0; k];
            let mut rhs = vec![0.0; k];
            for i in 0..k {
                diag[i] = 2.0 * (h[i] + h[i + 1]);
                rhs[i] = 6.0 * ((y[i + 2] - y[i + 1]) / h[i + 1] - (y[i + 1] - y[i]) / h[i]);
            }
            for i in 1..k {
                let w = h[i] / diag[i - 1];
                diag[i] -= w * h[i];
                rhs[i] -= w * rhs[i - 1];
            }
            m[k] = rhs[k - 1] / diag[k - 1];
            for i in (0..k - 1).rev() {
                m[i + 1] = (rhs[i] - h[i + 1] * m[i + 2]) / diag[i];
            }
        }
        Self { t, y, m }
    }

    fn eval(&self, u: f64) -> f64 {
        let n = self.t.len();
        let i = match self.t.iter().rposition(|&ti| ti <= u) {
            Some(i) if i >= n - 1 => n - 2,
            Some(i) => i,
            None => 0,
        };
        let h = self.t[i + 1] - self.t[i];
        let a = (self.t[i + 1] - u) / h;
        let b = (u - self.t[i]) / h;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a.powi(3) - a) * self.m[i] + (b.powi(3) - b) * self.m[i + 1]) * h * h / 6.0
    }
}
