use serde::{Deserialize, Serialize};

use crate::error::{Result, ZtrackError};
use crate::roi::Roi;

/// A raw parameter value as it appears in a saved configuration.
///
/// Untagged so that `{"sigma": 2.0, "tail_base": [250, 120], "roi": null}`
/// deserializes without type annotations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Point([i64; 2]),
    Rect([i64; 4]),
    Unset,
}

impl ParamValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "string",
            Self::Point(_) => "point",
            Self::Rect(_) => "rect",
            Self::Unset => "null",
        }
    }

    fn as_f64(&self, expected: &'static str) -> Result<f64> {
        match *self {
            Self::Int(v) => Ok(v as f64),
            Self::Float(v) if v.is_finite() => Ok(v),
            Self::Float(v) => Err(ZtrackError::InvalidValue(format!(
                "{v} is not a finite number"
            ))),
            _ => Err(self.mismatch(expected)),
        }
    }

    fn as_i64(&self, expected: &'static str) -> Result<i64> {
        match *self {
            Self::Int(v) => Ok(v),
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
            Self::Float(v) => Err(ZtrackError::InvalidValue(format!(
                "{v} is not an integer"
            ))),
            _ => Err(self.mismatch(expected)),
        }
    }

    fn mismatch(&self, expected: &'static str) -> ZtrackError {
        ZtrackError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<(i64, i64)> for ParamValue {
    fn from((x, y): (i64, i64)) -> Self {
        Self::Point([x, y])
    }
}

impl From<Option<Roi>> for ParamValue {
    fn from(v: Option<Roi>) -> Self {
        match v {
            Some(roi) => Self::Rect(roi.to_array()),
            None => Self::Unset,
        }
    }
}

/// Typed storage behind a [`Variable`], including its bounds.
#[derive(Clone, Debug, PartialEq)]
pub enum VariableKind {
    Int {
        value: i64,
        minimum: i64,
        maximum: i64,
        odd_only: bool,
    },
    UInt8 {
        value: u8,
    },
    Float {
        value: f64,
        minimum: f64,
        maximum: f64,
        step: f64,
    },
    /// Degrees in `[0, 360)`, wrapping around.
    Angle360 {
        value: f64,
    },
    /// Degrees in `(-180, 180]`, folding back at the ends.
    Angle180 {
        value: f64,
    },
    Point {
        value: (i64, i64),
    },
    Rect {
        value: Option<Roi>,
    },
    Text {
        value: String,
    },
    Bool {
        value: bool,
    },
}

/// A named, typed, bounded tracker parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    display_name: String,
    kind: VariableKind,
}

impl Variable {
    /// Bounded integer. Fails if `value` is outside `[minimum, maximum]`.
    pub fn int(display_name: &str, value: i64, minimum: i64, maximum: i64) -> Result<Self> {
        Self::with_kind(
            display_name,
            VariableKind::Int {
                value: minimum,
                minimum,
                maximum,
                odd_only: false,
            },
            ParamValue::Int(value),
        )
    }

    /// Bounded integer that only accepts odd values (filter block sizes).
    pub fn odd_int(display_name: &str, value: i64, minimum: i64, maximum: i64) -> Result<Self> {
        Self::with_kind(
            display_name,
            VariableKind::Int {
                value: minimum,
                minimum,
                maximum,
                odd_only: true,
            },
            ParamValue::Int(value),
        )
    }

    /// Integer in `[0, 255]`, typically a grey-level threshold.
    pub fn uint8(display_name: &str, value: i64) -> Result<Self> {
        Self::with_kind(
            display_name,
            VariableKind::UInt8 { value: 0 },
            ParamValue::Int(value),
        )
    }

    /// Bounded float with a UI step size.
    pub fn float(
        display_name: &str,
        value: f64,
        minimum: f64,
        maximum: f64,
        step: f64,
    ) -> Result<Self> {
        if minimum > maximum || step.is_nan() || step <= 0.0 {
            return Err(ZtrackError::InvalidValue(format!(
                "invalid float bounds [{minimum}, {maximum}] step {step}"
            )));
        }
        Self::with_kind(
            display_name,
            VariableKind::Float {
                value: minimum,
                minimum,
                maximum,
                step,
            },
            ParamValue::Float(value),
        )
    }

    pub fn angle360(display_name: &str, value: f64) -> Result<Self> {
        Self::with_kind(
            display_name,
            VariableKind::Angle360 { value: 0.0 },
            ParamValue::Float(value),
        )
    }

    pub fn angle180(display_name: &str, value: f64) -> Result<Self> {
        Self::with_kind(
            display_name,
            VariableKind::Angle180 { value: 0.0 },
            ParamValue::Float(value),
        )
    }

    pub fn point(display_name: &str, value: (i64, i64)) -> Self {
        Self {
            display_name: display_name.to_string(),
            kind: VariableKind::Point { value },
        }
    }

    pub fn rect(display_name: &str, value: Option<Roi>) -> Self {
        Self {
            display_name: display_name.to_string(),
            kind: VariableKind::Rect { value },
        }
    }

    pub fn text(display_name: &str, value: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            kind: VariableKind::Text {
                value: value.to_string(),
            },
        }
    }

    pub fn flag(display_name: &str, value: bool) -> Self {
        Self {
            display_name: display_name.to_string(),
            kind: VariableKind::Bool { value },
        }
    }

    fn with_kind(display_name: &str, kind: VariableKind, initial: ParamValue) -> Result<Self> {
        let mut var = Self {
            display_name: display_name.to_string(),
            kind,
        };
        var.set(initial)?;
        Ok(var)
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> &VariableKind {
        &self.kind
    }

    /// Lower bound for bounded numeric kinds.
    pub fn minimum(&self) -> Option<f64> {
        match self.kind {
            VariableKind::Int { minimum, .. } => Some(minimum as f64),
            VariableKind::UInt8 { .. } => Some(0.0),
            VariableKind::Float { minimum, .. } => Some(minimum),
            _ => None,
        }
    }

    /// Upper bound for bounded numeric kinds.
    pub fn maximum(&self) -> Option<f64> {
        match self.kind {
            VariableKind::Int { maximum, .. } => Some(maximum as f64),
            VariableKind::UInt8 { .. } => Some(255.0),
            VariableKind::Float { maximum, .. } => Some(maximum),
            _ => None,
        }
    }

    pub fn step(&self) -> Option<f64> {
        match self.kind {
            VariableKind::Float { step, .. } => Some(step),
            _ => None,
        }
    }

    pub fn value(&self) -> ParamValue {
        match &self.kind {
            VariableKind::Int { value, .. } => ParamValue::Int(*value),
            VariableKind::UInt8 { value } => ParamValue::Int(*value as i64),
            VariableKind::Float { value, .. }
            | VariableKind::Angle360 { value }
            | VariableKind::Angle180 { value } => ParamValue::Float(*value),
            VariableKind::Point { value } => ParamValue::Point([value.0, value.1]),
            VariableKind::Rect { value } => ParamValue::from(*value),
            VariableKind::Text { value } => ParamValue::Text(value.clone()),
            VariableKind::Bool { value } => ParamValue::Bool(*value),
        }
    }

    /// Assign a new value. On error the previous value is kept.
    pub fn set(&mut self, new: ParamValue) -> Result<()> {
        match &mut self.kind {
            VariableKind::Int {
                value,
                minimum,
                maximum,
                odd_only,
            } => {
                let v = new.as_i64("int")?;
                check_range(v as f64, *minimum as f64, *maximum as f64)?;
                if *odd_only && v % 2 == 0 {
                    return Err(ZtrackError::InvalidValue(format!("{v} must be odd")));
                }
                *value = v;
            }
            VariableKind::UInt8 { value } => {
                let v = new.as_i64("int")?;
                check_range(v as f64, 0.0, 255.0)?;
                *value = v as u8;
            }
            VariableKind::Float {
                value,
                minimum,
                maximum,
                ..
            } => {
                let v = new.as_f64("float")?;
                check_range(v, *minimum, *maximum)?;
                *value = v;
            }
            VariableKind::Angle360 { value } => {
                *value = wrap_360(new.as_f64("angle")?);
            }
            VariableKind::Angle180 { value } => {
                *value = fold_180(new.as_f64("angle")?);
            }
            VariableKind::Point { value } => match new {
                ParamValue::Point([x, y]) => *value = (x, y),
                other => return Err(other.mismatch("point")),
            },
            VariableKind::Rect { value } => match new {
                ParamValue::Rect(r) => *value = Some(Roi::from(r)),
                ParamValue::Unset => *value = None,
                other => return Err(other.mismatch("rect")),
            },
            VariableKind::Text { value } => match new {
                ParamValue::Text(s) => *value = s,
                other => return Err(other.mismatch("string")),
            },
            VariableKind::Bool { value } => match new {
                ParamValue::Bool(b) => *value = b,
                // Older configs stored flags as 0/1 integers.
                ParamValue::Int(i) => *value = i != 0,
                other => return Err(other.mismatch("bool")),
            },
        }
        Ok(())
    }
}

fn check_range(value: f64, minimum: f64, maximum: f64) -> Result<()> {
    if value < minimum || value > maximum {
        return Err(ZtrackError::OutOfRange {
            value,
            minimum,
            maximum,
        });
    }
    Ok(())
}

/// Wrap degrees into `[0, 360)`.
pub fn wrap_360(deg: f64) -> f64 {
    let v = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if v >= 360.0 {
        0.0
    } else {
        v
    }
}

/// Fold degrees into `(-180, 180]` like a dial with hard stops: values past
/// either end reflect back (190 -> 170, -190 -> -170).
pub fn fold_180(deg: f64) -> f64 {
    let mut t = (deg + 180.0).rem_euclid(720.0);
    if t > 360.0 {
        t = 720.0 - t;
    }
    let v = t - 180.0;
    if v <= -180.0 {
        180.0
    } else {
        v
    }
}
