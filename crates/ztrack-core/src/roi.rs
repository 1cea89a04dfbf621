//! Region of interest: where inside a full frame a tracker operates.

use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in full-frame pixel coordinates.
///
/// Always stored in canonical form: non-negative origin and extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i64; 4]", into = "[i64; 4]")]
pub struct Roi {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Roi {
    /// Canonicalise an arbitrary `(x, y, w, h)` rectangle.
    ///
    /// Both edges are clamped to the non-negative quadrant and reordered, so
    /// a negative width or height describes the same rectangle extending the
    /// other way.
    pub fn normalized(x: i64, y: i64, width: i64, height: i64) -> Self {
        let (x0, x1) = ordered(x.max(0), x.saturating_add(width).max(0));
        let (y0, y1) = ordered(y.max(0), y.saturating_add(height).max(0));
        Self {
            x: x0 as usize,
            y: y0 as usize,
            width: (x1 - x0) as usize,
            height: (y1 - y0) as usize,
        }
    }

    pub fn to_array(self) -> [i64; 4] {
        [
            self.x as i64,
            self.y as i64,
            self.width as i64,
            self.height as i64,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Top-left corner as floating-point offsets.
    pub fn offset(&self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }

    /// Translate ROI-local coordinates to full-frame coordinates.
    pub fn to_frame(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.x as f64, y + self.y as f64)
    }

    /// Translate full-frame coordinates to ROI-local coordinates.
    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.x as f64, y - self.y as f64)
    }

    /// The part of `image` covered by this ROI, clipped to the image bounds.
    pub fn crop<'a>(&self, image: &'a Array2<u8>) -> ArrayView2<'a, u8> {
        let (h, w) = image.dim();
        let x0 = self.x.min(w);
        let y0 = self.y.min(h);
        let x1 = (self.x + self.width).min(w);
        let y1 = (self.y + self.height).min(h);
        image.slice(s![y0..y1, x0..x1])
    }
}

impl From<[i64; 4]> for Roi {
    fn from(r: [i64; 4]) -> Self {
        Self::normalized(r[0], r[1], r[2], r[3])
    }
}

impl From<Roi> for [i64; 4] {
    fn from(roi: Roi) -> Self {
        roi.to_array()
    }
}

/// Crop with an optional ROI; `None` means the whole frame.
pub fn crop_to_roi(image: &Array2<u8>, roi: Option<&Roi>) -> Array2<u8> {
    match roi {
        Some(roi) => roi.crop(image).to_owned(),
        None => image.clone(),
    }
}

/// Offset of an optional ROI, `(0, 0)` when absent.
pub fn roi_offset(roi: Option<&Roi>) -> (f64, f64) {
    roi.map(Roi::offset).unwrap_or((0.0, 0.0))
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
