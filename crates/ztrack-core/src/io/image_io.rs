use std::path::Path;

use image::{GrayImage, ImageFormat};
use ndarray::{Array2, Array3};

use crate::error::{Result, ZtrackError};
use crate::frame::Frame;

/// Save an 8-bit grayscale array as PNG.
pub fn save_gray_png(data: &Array2<u8>, path: &Path) -> Result<()> {
    let (h, w) = data.dim();
    let img = GrayImage::from_fn(w as u32, h as u32, |col, row| {
        image::Luma([data[[row as usize, col as usize]]])
    });
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Load any image file as 8-bit grayscale.
pub fn load_gray(path: &Path) -> Result<Array2<u8>> {
    let gray = image::open(path)?.to_luma8();
    let (w, h) = gray.dimensions();
    Array2::from_shape_vec((h as usize, w as usize), gray.into_raw()).map_err(|_| {
        ZtrackError::InvalidDimensions {
            width: w as usize,
            height: h as usize,
        }
    })
}

/// Load an image file as a frame, keeping colour when present.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    if img.color().has_color() {
        let rgb = img.to_rgb8();
        let (w, h) = rgb.dimensions();
        let data = Array3::from_shape_vec((h as usize, w as usize, 3), rgb.into_raw())
            .map_err(|_| ZtrackError::InvalidDimensions {
                width: w as usize,
                height: h as usize,
            })?;
        Ok(Frame::Rgb(data))
    } else {
        Ok(Frame::Gray(load_gray(path)?))
    }
}
