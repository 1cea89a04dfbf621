use crate::geometry::Ellipse;

/// Drawable geometry a tracker exposes for overlays.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Ellipse(Ellipse),
    Points(Vec<[f64; 2]>),
    Line { from: [f64; 2], to: [f64; 2] },
}

/// A named overlay in full-frame coordinates. Hidden until a record has
/// been annotated, and hidden again if that record is missing.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub name: &'static str,
    pub visible: bool,
    pub geometry: Geometry,
}

impl Shape {
    pub fn ellipse(name: &'static str) -> Self {
        Self {
            name,
            visible: false,
            geometry: Geometry::Ellipse(Ellipse {
                semi_major: 1.0,
                semi_minor: 1.0,
                ..Ellipse::default()
            }),
        }
    }

    pub fn points(name: &'static str) -> Self {
        Self {
            name,
            visible: false,
            geometry: Geometry::Points(Vec::new()),
        }
    }

    pub fn line(name: &'static str) -> Self {
        Self {
            name,
            visible: false,
            geometry: Geometry::Line {
                from: [0.0, 0.0],
                to: [0.0, 0.0],
            },
        }
    }

    pub fn set(&mut self, geometry: Geometry) {
        self.visible = true;
        self.geometry = geometry;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}
