use crate::error::{Result, ZtrackError};

use super::{EyeTracker, FreeSwimTracker, NoneTracker, TailTracker, Tracker};

/// Every tracker variant that can be selected by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackerKind {
    Binary,
    MultiThreshold,
    Adaptive,
    Sequential,
    Gradient,
    None,
    FreeSwim,
}

impl TrackerKind {
    pub const ALL: [TrackerKind; 7] = [
        Self::Binary,
        Self::MultiThreshold,
        Self::Adaptive,
        Self::Sequential,
        Self::Gradient,
        Self::None,
        Self::FreeSwim,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::MultiThreshold => "multithreshold",
            Self::Adaptive => "adaptive",
            Self::Sequential => "sequential",
            Self::Gradient => "gradient",
            Self::None => "none",
            Self::FreeSwim => "freeswim",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Binary => "Binary threshold",
            Self::MultiThreshold => "Multi-threshold",
            Self::Adaptive => "Adaptive threshold",
            Self::Sequential => "Sequential",
            Self::Gradient => "Gradient",
            Self::None => "None",
            Self::FreeSwim => "Free swimming",
        }
    }

    /// Tracker group the variant belongs to.
    pub fn group(self) -> &'static str {
        match self {
            Self::Binary | Self::MultiThreshold | Self::Adaptive => "eye",
            Self::Sequential | Self::Gradient | Self::None => "tail",
            Self::FreeSwim => "freeswim",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| ZtrackError::UnknownTracker(name.to_string()))
    }

    /// Variants of one group, in registration order.
    pub fn in_group(group: &str) -> impl Iterator<Item = TrackerKind> + '_ {
        Self::ALL.into_iter().filter(move |k| k.group() == group)
    }

    /// A tracker of this kind with default parameters and no ROI.
    pub fn build(self) -> Result<Box<dyn Tracker>> {
        Ok(match self {
            Self::Binary => Box::new(EyeTracker::binary()?),
            Self::MultiThreshold => Box::new(EyeTracker::multithreshold()?),
            Self::Adaptive => Box::new(EyeTracker::adaptive()?),
            Self::Sequential => Box::new(TailTracker::sequential()?),
            Self::Gradient => Box::new(TailTracker::gradient()?),
            Self::None => Box::new(NoneTracker::new()),
            Self::FreeSwim => Box::new(FreeSwimTracker::new()?),
        })
    }
}

impl std::fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
