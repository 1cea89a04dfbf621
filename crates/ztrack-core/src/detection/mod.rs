pub mod components;
pub mod contours;
pub mod threshold;

pub use contours::{find_contours, Contour};
pub use threshold::{adaptive_threshold, binary_threshold};
