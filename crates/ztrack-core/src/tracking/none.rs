use crate::error::Result;
use crate::frame::Frame;
use crate::params::ParameterSet;
use crate::roi::Roi;

use super::{PoseRecord, Shape, Tracker};

/// Placeholder for a group that is not tracked. Produces empty records.
#[derive(Default)]
pub struct NoneTracker {
    params: ParameterSet,
    roi: Option<Roi>,
}

impl NoneTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tracker for NoneTracker {
    fn name(&self) -> &'static str {
        "none"
    }

    fn display_name(&self) -> &'static str {
        "None"
    }

    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    fn roi(&self) -> Option<Roi> {
        self.roi
    }

    fn set_roi(&mut self, roi: Option<Roi>) {
        self.roi = roi;
    }

    fn columns(&self) -> Vec<String> {
        Vec::new()
    }

    fn track_frame(&self, _frame: &Frame) -> Result<PoseRecord> {
        Ok(PoseRecord::default())
    }

    fn shapes(&self) -> &[Shape] {
        &[]
    }

    fn annotate(&mut self, _record: &PoseRecord) {}
}
