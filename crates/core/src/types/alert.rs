//! Alert identifiers and categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownVariant;

/// Severity category of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    /// Immediate threat to life or property.
    Emergency,
    /// Hazardous conditions expected or developing.
    Warning,
    /// Informational update.
    Info,
}

impl AlertCategory {
    /// All categories, most severe first.
    pub const ALL: [AlertCategory; 3] = [Self::Emergency, Self::Warning, Self::Info];

    /// Lower-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::Emergency => "emergency",
            AlertCategory::Warning => "warning",
            AlertCategory::Info => "info",
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emergency" => Ok(Self::Emergency),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            _ => Err(UnknownVariant::new("alert category", s)),
        }
    }
}

/// Process-unique alert identifier.
///
/// The paired notification carries the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(pub u64);

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AlertId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(AlertId)
    }
}
