use ndarray::Array2;

use super::components::{label_components, outer_background, NEIGHBOURS_8};

/// Outline of a blob: boundary pixel centres `[x, y]` in tracing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour {
    pub points: Vec<[f64; 2]>,
}

impl Contour {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shift every point, e.g. from ROI-local to frame coordinates.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            points: self.points.iter().map(|p| [p[0] + dx, p[1] + dy]).collect(),
        }
    }
}

/// External contours of the non-zero regions of a binary image.
///
/// Regions are 8-connected. Only outer borders are returned: holes are
/// ignored, and so is any region lying entirely inside another region's
/// hole. Contours are ordered by the raster position of their first pixel.
pub fn find_contours(binary: &Array2<u8>) -> Vec<Contour> {
    let mask = binary.mapv(|v| v > 0);
    let (h, w) = mask.dim();
    let (labels, count) = label_components(&mask);
    if count == 0 {
        return Vec::new();
    }
    let outside = outer_background(&mask);

    let mut start = vec![None; count + 1];
    let mut area = vec![0usize; count + 1];
    let mut external = vec![false; count + 1];

    for row in 0..h {
        for col in 0..w {
            let label = labels[[row, col]] as usize;
            if label == 0 {
                continue;
            }
            area[label] += 1;
            if start[label].is_none() {
                start[label] = Some((row, col));
            }
            if !external[label] && touches_outside(&outside, row, col) {
                external[label] = true;
            }
        }
    }

    (1..=count)
        .filter(|&label| external[label])
        .filter_map(|label| {
            let first = start[label]?;
            let pixels = trace_border(&labels, label as u32, first, 4 * area[label] + 4);
            Some(Contour::new(
                pixels
                    .into_iter()
                    .map(|(row, col)| [col as f64, row as f64])
                    .collect(),
            ))
        })
        .collect()
}

fn touches_outside(outside: &Array2<bool>, row: usize, col: usize) -> bool {
    let (h, w) = outside.dim();
    if row == 0 || col == 0 || row + 1 == h || col + 1 == w {
        return true;
    }
    outside[[row - 1, col]]
        || outside[[row + 1, col]]
        || outside[[row, col - 1]]
        || outside[[row, col + 1]]
}

/// Moore-neighbour tracing of one component's outer border, starting from
/// its first pixel in raster order (whose west neighbour is background).
///
/// Stops when the start pixel is about to be left in the same direction as
/// the first move, which also handles one-pixel-wide parts visited twice.
fn trace_border(
    labels: &Array2<u32>,
    label: u32,
    start: (usize, usize),
    max_len: usize,
) -> Vec<(usize, usize)> {
    let mut contour = vec![start];
    let west = 4;

    let Some((first_dir, mut next, mut backtrack)) = next_border_pixel(labels, label, start, west)
    else {
        return contour;
    };

    while contour.len() < max_len {
        let current = next;
        let Some((dir, following, following_back)) =
            next_border_pixel(labels, label, current, backtrack)
        else {
            break;
        };
        if current == start && dir == first_dir {
            break;
        }
        contour.push(current);
        next = following;
        backtrack = following_back;
    }

    contour
}

/// Scan clockwise around `pixel` starting after the `backtrack` direction.
/// Returns the direction taken, the next border pixel and the backtrack
/// direction to use from it.
fn next_border_pixel(
    labels: &Array2<u32>,
    label: u32,
    pixel: (usize, usize),
    backtrack: usize,
) -> Option<(usize, (usize, usize), usize)> {
    let (h, w) = labels.dim();
    let (row, col) = (pixel.0 as isize, pixel.1 as isize);

    for k in 1..=8 {
        let dir = (backtrack + k) % 8;
        let (dr, dc) = NEIGHBOURS_8[dir];
        let (r, c) = (row + dr, col + dc);
        if r < 0 || c < 0 || r >= h as isize || c >= w as isize {
            continue;
        }
        if labels[[r as usize, c as usize]] != label {
            continue;
        }
        // The last background position examined becomes the next backtrack.
        let (pr, pc) = NEIGHBOURS_8[(backtrack + k - 1) % 8];
        let back = direction_index(row + pr - r, col + pc - c)?;
        return Some((dir, (r as usize, c as usize), back));
    }
    None
}

fn direction_index(dr: isize, dc: isize) -> Option<usize> {
    NEIGHBOURS_8.iter().position(|&d| d == (dr, dc))
}
