use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ZtrackError};
use crate::params::ParamMap;
use crate::roi::Roi;

use super::{Tracker, TrackerKind};

/// Saved settings of one tracker group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub method: String,
    /// `[x, y, w, h]`. A full-frame tracker omits the key when written; a
    /// missing key or `null` both read back as `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<Roi>,
    #[serde(default)]
    pub params: ParamMap,
}

impl TrackerConfig {
    /// Build and configure the tracker this entry selects.
    pub fn build(&self) -> Result<Box<dyn Tracker>> {
        let mut tracker = TrackerKind::from_name(&self.method)?.build()?;
        tracker
            .configure(&self.params)
            .map_err(|e| ZtrackError::Configuration(format!("{}: {e}", self.method)))?;
        tracker.set_roi(self.roi.filter(|r| !r.is_empty()));
        Ok(tracker)
    }

    pub fn from_tracker(tracker: &dyn Tracker) -> Self {
        Self {
            method: tracker.name().to_string(),
            roi: tracker.roi(),
            params: tracker.parameters().to_map(),
        }
    }
}

/// A tracking configuration: tracker group name to tracker settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingConfig {
    pub groups: BTreeMap<String, TrackerConfig>,
}

impl TrackingConfig {
    /// One default-configured entry per group, using the first variant
    /// registered in each.
    pub fn default_for(groups: &[&str]) -> Result<Self> {
        let mut config = Self::default();
        for &group in groups {
            let kind = TrackerKind::in_group(group)
                .next()
                .ok_or_else(|| ZtrackError::Configuration(format!("unknown group {group}")))?;
            let tracker = kind.build()?;
            config
                .groups
                .insert(group.to_string(), TrackerConfig::from_tracker(tracker.as_ref()));
        }
        Ok(config)
    }

    /// Configured trackers for every group. Fails before any frame is read
    /// if a method is unknown or a parameter is invalid.
    pub fn build_trackers(&self) -> Result<Vec<(String, Box<dyn Tracker>)>> {
        if self.groups.is_empty() {
            return Err(ZtrackError::Configuration("no tracker groups".into()));
        }
        self.groups
            .iter()
            .map(|(group, entry)| {
                let tracker = entry.build().map_err(|e| match e {
                    ZtrackError::UnknownTracker(m) => {
                        ZtrackError::UnknownTracker(format!("{m} (group {group})"))
                    }
                    ZtrackError::Configuration(m) => {
                        ZtrackError::Configuration(format!("group {group}: {m}"))
                    }
                    other => other,
                })?;
                Ok((group.clone(), tracker))
            })
            .collect()
    }

    /// Snapshot of live trackers.
    pub fn from_trackers<'a, I>(trackers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a dyn Tracker)>,
    {
        let groups = trackers
            .into_iter()
            .map(|(group, tracker)| (group.to_string(), TrackerConfig::from_tracker(tracker)))
            .collect();
        Self { groups }
    }
}
