use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Result, ZtrackError};
use crate::roi::Roi;

use super::variable::{ParamValue, Variable, VariableKind};

/// Plain key/value form of a parameter set, as stored in configurations.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Ordered mapping from parameter name to [`Variable`], owned by one tracker.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterSet {
    entries: Vec<(String, Variable)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, variable: Variable) -> Self {
        self.insert(name, variable);
        self
    }

    /// Insert or replace a variable, keeping the original position on replace.
    pub fn insert(&mut self, name: &str, variable: Variable) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = variable,
            None => self.entries.push((name.to_string(), variable)),
        }
    }

    /// Append every variable of `other`, used by composite trackers.
    pub fn extend(&mut self, other: ParameterSet) {
        for (name, variable) in other.entries {
            self.insert(&name, variable);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn variable_or_err(&self, name: &str) -> Result<&Variable> {
        self.variable(name)
            .ok_or_else(|| ZtrackError::UnknownParameter(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Result<ParamValue> {
        Ok(self.variable_or_err(name)?.value())
    }

    /// Set one value. Out-of-range values are rejected and the old value kept.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<()> {
        let variable = self
            .entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| ZtrackError::UnknownParameter(name.to_string()))?;
        variable.set(value.into())
    }

    pub fn to_map(&self) -> ParamMap {
        self.entries
            .iter()
            .map(|(n, v)| (n.clone(), v.value()))
            .collect()
    }

    /// Apply stored values to the matching names.
    ///
    /// Names this set does not know are skipped so that configurations stay
    /// usable across versions that add or drop parameters. The update is
    /// all-or-nothing: if any value is rejected nothing changes.
    pub fn apply_map(&mut self, map: &ParamMap) -> Result<()> {
        let mut updated = self.clone();
        for (name, value) in map {
            match updated.entries.iter_mut().find(|(n, _)| n == name) {
                Some((_, variable)) => variable.set(value.clone())?,
                None => debug!(parameter = %name, "Skipping unknown parameter"),
            }
        }
        *self = updated;
        Ok(())
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        match self.variable_or_err(name)?.kind() {
            VariableKind::Int { value, .. } => Ok(*value),
            VariableKind::UInt8 { value } => Ok(*value as i64),
            other => Err(kind_mismatch("int", other)),
        }
    }

    pub fn uint8(&self, name: &str) -> Result<u8> {
        match self.variable_or_err(name)?.kind() {
            VariableKind::UInt8 { value } => Ok(*value),
            other => Err(kind_mismatch("uint8", other)),
        }
    }

    /// Any numeric parameter as `f64`; angles are returned in degrees.
    pub fn float(&self, name: &str) -> Result<f64> {
        match self.variable_or_err(name)?.kind() {
            VariableKind::Float { value, .. }
            | VariableKind::Angle360 { value }
            | VariableKind::Angle180 { value } => Ok(*value),
            VariableKind::Int { value, .. } => Ok(*value as f64),
            VariableKind::UInt8 { value } => Ok(*value as f64),
            other => Err(kind_mismatch("float", other)),
        }
    }

    /// Angle parameter converted to radians.
    pub fn angle_rad(&self, name: &str) -> Result<f64> {
        match self.variable_or_err(name)?.kind() {
            VariableKind::Angle360 { value } | VariableKind::Angle180 { value } => {
                Ok(value.to_radians())
            }
            other => Err(kind_mismatch("angle", other)),
        }
    }

    pub fn point(&self, name: &str) -> Result<(i64, i64)> {
        match self.variable_or_err(name)?.kind() {
            VariableKind::Point { value } => Ok(*value),
            other => Err(kind_mismatch("point", other)),
        }
    }

    pub fn rect(&self, name: &str) -> Result<Option<Roi>> {
        match self.variable_or_err(name)?.kind() {
            VariableKind::Rect { value } => Ok(*value),
            other => Err(kind_mismatch("rect", other)),
        }
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        match self.variable_or_err(name)?.kind() {
            VariableKind::Text { value } => Ok(value),
            other => Err(kind_mismatch("string", other)),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.variable_or_err(name)?.kind() {
            VariableKind::Bool { value } => Ok(*value),
            other => Err(kind_mismatch("bool", other)),
        }
    }
}

fn kind_mismatch(expected: &'static str, kind: &VariableKind) -> ZtrackError {
    let found = match kind {
        VariableKind::Int { .. } => "int",
        VariableKind::UInt8 { .. } => "uint8",
        VariableKind::Float { .. } => "float",
        VariableKind::Angle360 { .. } | VariableKind::Angle180 { .. } => "angle",
        VariableKind::Point { .. } => "point",
        VariableKind::Rect { .. } => "rect",
        VariableKind::Text { .. } => "string",
        VariableKind::Bool { .. } => "bool",
    };
    ZtrackError::TypeMismatch { expected, found }
}
