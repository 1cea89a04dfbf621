use std::collections::VecDeque;

use ndarray::Array2;

/// 8-connected neighbourhood offsets `(drow, dcol)`, clockwise on screen
/// starting east.
pub(crate) const NEIGHBOURS_8: [(isize, isize); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Label the 8-connected foreground components of a mask using two-pass
/// labeling with union-find. Returns the label image (0 = background) and
/// the number of labels.
///
/// Labels are numbered in raster order of each component's first pixel.
pub fn label_components(mask: &Array2<bool>) -> (Array2<u32>, usize) {
    let (h, w) = mask.dim();
    let mut labels = Array2::<u32>::zeros((h, w));
    if h == 0 || w == 0 {
        return (labels, 0);
    }

    let mut parent: Vec<u32> = vec![0];

    // Pass 1: provisional labels from the already-visited neighbours
    // (west, north-west, north, north-east).
    for row in 0..h {
        for col in 0..w {
            if !mask[[row, col]] {
                continue;
            }
            let mut current = 0u32;
            for (dr, dc) in [(0isize, -1isize), (-1, -1), (-1, 0), (-1, 1)] {
                let r = row as isize + dr;
                let c = col as isize + dc;
                if r < 0 || c < 0 || c >= w as isize {
                    continue;
                }
                let neighbour = labels[[r as usize, c as usize]];
                if neighbour == 0 {
                    continue;
                }
                if current == 0 {
                    current = neighbour;
                } else if current != neighbour {
                    union(&mut parent, current, neighbour);
                    current = current.min(neighbour);
                }
            }
            if current == 0 {
                current = parent.len() as u32;
                parent.push(current);
            }
            labels[[row, col]] = current;
        }
    }

    // Pass 2: resolve to roots and renumber densely.
    let mut dense = vec![0u32; parent.len()];
    let mut count = 0u32;
    for label in labels.iter_mut() {
        if *label == 0 {
            continue;
        }
        let root = find(&parent, *label) as usize;
        if dense[root] == 0 {
            count += 1;
            dense[root] = count;
        }
        *label = dense[root];
    }

    (labels, count as usize)
}

/// Background pixels 4-connected to the image border.
///
/// With 8-connected foreground the background is 4-connected, so anything
/// not reached here is a hole inside some component.
pub fn outer_background(mask: &Array2<bool>) -> Array2<bool> {
    let (h, w) = mask.dim();
    let mut outside = Array2::from_elem((h, w), false);
    let mut queue = VecDeque::new();

    let mut seed = |row: usize, col: usize, outside: &mut Array2<bool>| {
        if !mask[[row, col]] && !outside[[row, col]] {
            outside[[row, col]] = true;
            queue.push_back((row, col));
        }
    };
    for col in 0..w {
        seed(0, col, &mut outside);
        seed(h - 1, col, &mut outside);
    }
    for row in 0..h {
        seed(row, 0, &mut outside);
        seed(row, w - 1, &mut outside);
    }

    while let Some((row, col)) = queue.pop_front() {
        for (dr, dc) in [(0isize, 1isize), (1, 0), (0, -1), (-1, 0)] {
            let r = row as isize + dr;
            let c = col as isize + dc;
            if r < 0 || c < 0 || r >= h as isize || c >= w as isize {
                continue;
            }
            let (r, c) = (r as usize, c as usize);
            if !mask[[r, c]] && !outside[[r, c]] {
                outside[[r, c]] = true;
                queue.push_back((r, c));
            }
        }
    }

    outside
}

fn find(parent: &[u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        x = parent[x as usize];
    }
    x
}

fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[big as usize] = small;
    }
}
