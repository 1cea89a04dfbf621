use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::{Array2, Array3};

use crate::error::{Result, ZtrackError};
use crate::frame::{Frame, FrameSource};

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// SER timestamps count 100 ns ticks.
const TICKS_PER_SECOND: f64 = 10_000_000.0;

const COLOR_ID_RGB: i32 = 100;
const COLOR_ID_BGR: i32 = 101;

/// SER file header (178 bytes). Only the fields the tracker needs are kept.
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
}

impl SerHeader {
    /// Bytes per sample (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_sample(&self) -> usize {
        if self.pixel_depth <= 8 {
            1
        } else {
            2
        }
    }

    /// Number of interleaved planes per pixel (3 for RGB/BGR, 1 otherwise).
    pub fn planes(&self) -> usize {
        match self.color_id {
            COLOR_ID_RGB | COLOR_ID_BGR => 3,
            _ => 1,
        }
    }

    pub fn frame_byte_size(&self) -> usize {
        self.width as usize * self.height as usize * self.bytes_per_sample() * self.planes()
    }
}

/// Memory-mapped SER video. Frames are decoded to 8 bits on access;
/// Bayer data is returned undebayered as a gray frame.
pub struct SerVideo {
    mmap: Mmap,
    path: PathBuf,
    pub header: SerHeader,
}

impl SerVideo {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and lives as long as `SerVideo`.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(ZtrackError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }
        if &mmap[0..14] != SER_MAGIC {
            return Err(ZtrackError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;
        let expected = SER_HEADER_SIZE + header.frame_byte_size() * header.frame_count as usize;
        if mmap.len() < expected {
            return Err(ZtrackError::InvalidSer(format!(
                "File truncated: expected at least {expected} bytes, got {}",
                mmap.len()
            )));
        }

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            header,
        })
    }

    fn frame_bytes(&self, index: usize) -> Result<&[u8]> {
        let total = self.header.frame_count as usize;
        if index >= total {
            return Err(ZtrackError::FrameIndexOutOfRange { index, total });
        }
        let size = self.header.frame_byte_size();
        let offset = SER_HEADER_SIZE + index * size;
        Ok(&self.mmap[offset..offset + size])
    }

    fn timestamp(&self, index: usize) -> Option<u64> {
        let trailer = SER_HEADER_SIZE
            + self.header.frame_byte_size() * self.header.frame_count as usize;
        let offset = trailer + index * 8;
        let bytes = self.mmap.get(offset..offset + 8)?;
        Some(u64::from_le_bytes(bytes.try_into().ok()?))
    }

    fn sample(&self, raw: &[u8], sample_index: usize) -> u8 {
        let bps = self.header.bytes_per_sample();
        if bps == 1 {
            return raw[sample_index];
        }
        let idx = sample_index * 2;
        let pair = [raw[idx], raw[idx + 1]];
        let value = if self.header.little_endian {
            u16::from_le_bytes(pair)
        } else {
            u16::from_be_bytes(pair)
        };
        (value >> (self.header.pixel_depth.clamp(9, 16) - 8)) as u8
    }
}

impl FrameSource for SerVideo {
    fn len(&self) -> usize {
        self.header.frame_count as usize
    }

    fn frame(&self, index: usize) -> Result<Frame> {
        let raw = self.frame_bytes(index)?;
        let h = self.header.height as usize;
        let w = self.header.width as usize;

        if self.header.planes() == 1 {
            let data = Array2::from_shape_fn((h, w), |(row, col)| {
                self.sample(raw, row * w + col)
            });
            return Ok(Frame::Gray(data));
        }

        let bgr = self.header.color_id == COLOR_ID_BGR;
        let data = Array3::from_shape_fn((h, w, 3), |(row, col, ch)| {
            let plane = if bgr { 2 - ch } else { ch };
            self.sample(raw, (row * w + col) * 3 + plane)
        });
        Ok(Frame::Rgb(data))
    }

    fn fps(&self) -> Option<f64> {
        let n = self.len();
        if n < 2 {
            return None;
        }
        let first = self.timestamp(0)?;
        let last = self.timestamp(n - 1)?;
        if last <= first {
            return None;
        }
        Some((n - 1) as f64 * TICKS_PER_SECOND / (last - first) as f64)
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]);

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()?;
    let height = cursor.read_i32::<LittleEndian>()?;
    let pixel_depth = cursor.read_i32::<LittleEndian>()?;
    let frame_count = cursor.read_i32::<LittleEndian>()?;

    if width <= 0 || height <= 0 {
        return Err(ZtrackError::InvalidDimensions {
            width: width.max(0) as usize,
            height: height.max(0) as usize,
        });
    }
    if !(1..=16).contains(&pixel_depth) {
        return Err(ZtrackError::InvalidSer(format!(
            "Unsupported pixel depth {pixel_depth}"
        )));
    }

    // Most writers store 0 here for little-endian data despite the format
    // description; only an explicit 1 means big-endian.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width: width as u32,
        height: height as u32,
        pixel_depth: pixel_depth as u32,
        frame_count: frame_count.max(0) as u32,
    })
}
