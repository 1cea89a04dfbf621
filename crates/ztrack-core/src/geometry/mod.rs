//! Planar geometry on contours and landmark points.

pub mod curve;
pub mod ellipse;
pub mod hull;
pub mod landmarks;
pub mod moments;
pub mod polygon;

pub use curve::{circle_perimeter, resample_curve, split_length};
pub use ellipse::{fit_ellipse, Ellipse};
pub use hull::convex_hull;
pub use landmarks::{
    correct_orientation, heading, identify_landmarks, relative_angle, wrap_degrees, Landmarks,
};
pub use moments::{contour_area, contour_center};
pub use polygon::{nearest_contour, signed_distance};
