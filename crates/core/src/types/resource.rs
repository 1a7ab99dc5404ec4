//! Resource ledger records supplied by the logistics feed.
//!
//! Records are read-only to the engine: they are loaded wholesale and only
//! ever filtered, sorted, and aggregated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownVariant;

/// Kind of relief resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Water,
    Food,
    Medical,
    Shelter,
    Power,
    Transport,
}

impl ResourceType {
    /// Lower-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Water => "water",
            ResourceType::Food => "food",
            ResourceType::Medical => "medical",
            ResourceType::Shelter => "shelter",
            ResourceType::Power => "power",
            ResourceType::Transport => "transport",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" => Ok(Self::Water),
            "food" => Ok(Self::Food),
            "medical" => Ok(Self::Medical),
            "shelter" => Ok(Self::Shelter),
            "power" => Ok(Self::Power),
            "transport" => Ok(Self::Transport),
            _ => Err(UnknownVariant::new("resource type", s)),
        }
    }
}

/// Dispatch priority of a resource line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Numeric rank used for ordering: low < medium < high.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    /// Lower-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(UnknownVariant::new("priority", s)),
        }
    }
}

/// One line of the resource ledger.
///
/// Quantities are whole units of `unit` (bottles, kits, cots, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Ledger identifier.
    pub id: String,
    /// Resource kind.
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Display name ("Bottled Water").
    pub name: String,
    /// Units on hand.
    pub available: u64,
    /// Units already allocated to recipients.
    pub allocated: u64,
    /// Units required to meet demand.
    pub required: u64,
    /// Unit label.
    pub unit: String,
    /// Distribution point ("Houston, TX").
    pub location: String,
    /// `[lat, lon]` of the distribution point.
    pub coordinates: [f64; 2],
    /// Dispatch priority.
    pub priority: Priority,
    /// Freshness label supplied by the feed.
    pub last_updated: String,
}
