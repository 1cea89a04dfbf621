use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ZtrackError};

/// One frame's named tracking output.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PoseRecord {
    pub columns: Vec<String>,
    #[serde(with = "nan_as_null")]
    pub values: Vec<f64>,
}

impl PoseRecord {
    pub fn new(columns: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if columns.len() != values.len() {
            return Err(ZtrackError::InvalidValue(format!(
                "{} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self { columns, values })
    }

    /// A record of NaNs, written for frames where tracking failed.
    pub fn missing(columns: Vec<String>) -> Self {
        let values = vec![f64::NAN; columns.len()];
        Self { columns, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    /// True if every value is NaN (an empty record is never missing).
    pub fn is_missing(&self) -> bool {
        !self.values.is_empty() && self.values.iter().all(|v| v.is_nan())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// Bitwise equality, treating NaNs with the same payload as equal.
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

/// Ordered pose records of one tracker over one video, sharing columns.
///
/// Rows are only ever appended, so a table is valid after any frame.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PoseTable {
    pub columns: Vec<String>,
    #[serde(with = "nan_rows_as_null")]
    pub rows: Vec<Vec<f64>>,
}

impl PoseTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, record: PoseRecord) -> Result<()> {
        if record.columns != self.columns {
            return Err(ZtrackError::InvalidValue(
                "record columns do not match the table".into(),
            ));
        }
        self.rows.push(record.values);
        Ok(())
    }

    pub fn record(&self, index: usize) -> Option<PoseRecord> {
        self.rows.get(index).map(|values| PoseRecord {
            columns: self.columns.clone(),
            values: values.clone(),
        })
    }

    /// All values of one column, in frame order.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let i = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[i]).collect())
    }

    /// Number of rows where tracking failed.
    pub fn missing_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| !row.is_empty() && row.iter().all(|v| v.is_nan()))
            .count()
    }
}

// JSON has no NaN; failed fields are written as null and read back as NaN.
mod nan_as_null {
    use super::*;

    pub fn serialize<S: Serializer>(values: &[f64], s: S) -> std::result::Result<S::Ok, S::Error> {
        let opt: Vec<Option<f64>> = values.iter().map(|v| (!v.is_nan()).then_some(*v)).collect();
        opt.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<f64>, D::Error> {
        let opt: Vec<Option<f64>> = Vec::deserialize(d)?;
        Ok(opt.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

mod nan_rows_as_null {
    use super::*;

    pub fn serialize<S: Serializer>(rows: &[Vec<f64>], s: S) -> std::result::Result<S::Ok, S::Error> {
        let opt: Vec<Vec<Option<f64>>> = rows
            .iter()
            .map(|row| row.iter().map(|v| (!v.is_nan()).then_some(*v)).collect())
            .collect();
        opt.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Vec<Vec<f64>>, D::Error> {
        let opt: Vec<Vec<Option<f64>>> = Vec::deserialize(d)?;
        Ok(opt
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
            .collect())
    }
}
