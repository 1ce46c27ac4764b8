//! Label enum as the single source of truth for focus state strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical focus states produced by the observation source.
///
/// Exactly one label is active at any instant during an open session.
/// Variant order is the display order used by reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// User is at the desk and focused.
    Present,
    /// User has left the desk.
    Away,
    /// Active phone/tablet usage detected.
    GadgetSuspected,
    /// A distracting website or application is in the foreground.
    ScreenDistraction,
    /// User explicitly paused the session.
    Paused,
}

impl Label {
    /// All variants, in display order.
    pub const ALL: [Self; 5] = [
        Self::Present,
        Self::Away,
        Self::GadgetSuspected,
        Self::ScreenDistraction,
        Self::Paused,
    ];

    /// Returns the wire/storage string for this label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Away => "away",
            Self::GadgetSuspected => "gadget_suspected",
            Self::ScreenDistraction => "screen_distraction",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "away" => Ok(Self::Away),
            // Legacy name from early builds of the detector.
            "gadget_suspected" | "phone_suspected" => Ok(Self::GadgetSuspected),
            "screen_distraction" => Ok(Self::ScreenDistraction),
            "paused" => Ok(Self::Paused),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl Serialize for Label {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown label strings.
#[derive(Debug, Clone)]
pub struct UnknownLabel(String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label: {}", self.0)
    }
}

impl std::error::Error for UnknownLabel {}
