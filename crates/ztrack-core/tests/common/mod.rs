#![allow(dead_code)]

use ndarray::Array2;

use ztrack_core::frame::{Frame, MemoryVideo};
use ztrack_core::io::ser::SER_HEADER_SIZE;

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 100=RGB, 101=BGR
pub fn build_ser_header(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer, Instrument, Telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 120]);
    // DateTime, DateTimeUTC
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Write a buffer to a temporary file and return the temp file handle.
pub fn write_temp(data: &[u8], suffix: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    f.write_all(data).expect("write data");
    f.flush().expect("flush");
    f
}

/// A filled ellipse, as drawn on a synthetic frame.
#[derive(Clone, Copy, Debug)]
pub struct Blob {
    pub cx: f64,
    pub cy: f64,
    pub semi_major: f64,
    pub semi_minor: f64,
    /// Major axis angle in degrees, clockwise on screen.
    pub theta: f64,
}

impl Blob {
    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self {
            cx,
            cy,
            semi_major: r,
            semi_minor: r,
            theta: 0.0,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (s, c) = self.theta.to_radians().sin_cos();
        let (dx, dy) = (x - self.cx, y - self.cy);
        let u = (dx * c + dy * s) / self.semi_major;
        let v = (-dx * s + dy * c) / self.semi_minor;
        u * u + v * v <= 1.0
    }
}

/// Draw blobs of `value` onto a uniform `fill` image.
pub fn draw_blobs(width: usize, height: usize, fill: u8, value: u8, blobs: &[Blob]) -> Array2<u8> {
    Array2::from_shape_fn((height, width), |(row, col)| {
        if blobs.iter().any(|b| b.contains(col as f64, row as f64)) {
            value
        } else {
            fill
        }
    })
}

/// Eyes and swim bladder of a larva facing up the screen (heading -90).
pub fn larva_blobs() -> [Blob; 3] {
    [
        Blob {
            cx: 50.0,
            cy: 50.0,
            semi_major: 8.0,
            semi_minor: 4.0,
            theta: -100.0,
        },
        Blob {
            cx: 70.0,
            cy: 50.0,
            semi_major: 8.0,
            semi_minor: 4.0,
            theta: -80.0,
        },
        Blob {
            cx: 60.0,
            cy: 75.0,
            semi_major: 10.0,
            semi_minor: 6.0,
            theta: -90.0,
        },
    ]
}

/// Dark larva landmarks on a bright 120x120 field.
pub fn larva_frame() -> Array2<u8> {
    draw_blobs(120, 120, 230, 20, &larva_blobs())
}

/// The same frame repeated `n` times.
pub fn static_video(image: &Array2<u8>, n: usize) -> MemoryVideo {
    MemoryVideo::new((0..n).map(|_| Frame::Gray(image.clone())).collect())
}

/// A bright horizontal line on a dark field, `thickness` rows around `y`.
pub fn horizontal_band(width: usize, height: usize, y: usize, half_thickness: usize) -> Array2<u8> {
    Array2::from_shape_fn((height, width), |(row, _)| {
        if row + half_thickness >= y && row <= y + half_thickness {
            255
        } else {
            0
        }
    })
}
