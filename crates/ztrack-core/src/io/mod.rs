pub mod image_io;
pub mod ser;
pub mod sequence;

use std::path::Path;

use crate::error::Result;
use crate::frame::FrameSource;

pub use ser::SerVideo;
pub use sequence::ImageSequence;

/// Open a video: a `.ser` file or a directory of images.
pub fn open_video(path: &Path) -> Result<Box<dyn FrameSource>> {
    if path.is_dir() {
        Ok(Box::new(ImageSequence::open(path)?))
    } else {
        Ok(Box::new(SerVideo::open(path)?))
    }
}
