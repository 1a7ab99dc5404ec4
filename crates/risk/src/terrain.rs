//! Terrain classes and their hazard multipliers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::pipeline::RiskError;

/// Land classification of the assessed location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Terrain {
    LowLying,
    Coastal,
    #[default]
    Urban,
    Forest,
    Mountainous,
}

/// Per-terrain scaling factors, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainMultipliers {
    pub flood: f64,
    pub wind: f64,
    pub fire: f64,
}

impl Terrain {
    pub const ALL: [Terrain; 5] = [
        Terrain::LowLying,
        Terrain::Coastal,
        Terrain::Urban,
        Terrain::Forest,
        Terrain::Mountainous,
    ];

    pub fn multipliers(&self) -> TerrainMultipliers {
        let (flood, wind, fire) = match self {
            Terrain::LowLying => (0.5, 0.4, 0.3),
            Terrain::Coastal => (0.4, 0.5, 0.2),
            Terrain::Urban => (0.3, 0.4, 0.3),
            Terrain::Forest => (0.3, 0.4, 0.5),
            Terrain::Mountainous => (0.2, 0.5, 0.4),
        };
        TerrainMultipliers { flood, wind, fire }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Terrain::LowLying => "low-lying",
            Terrain::Coastal => "coastal",
            Terrain::Urban => "urban",
            Terrain::Forest => "forest",
            Terrain::Mountainous => "mountainous",
        }
    }

    /// Parse an optional name, falling back to [`Terrain::Urban`].
    pub fn parse_or_default(name: Option<&str>) -> Result<Self, RiskError> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.parse(),
            None => Ok(Terrain::default()),
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Terrain {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low-lying" | "low_lying" | "lowlying" => Ok(Terrain::LowLying),
            "coastal" => Ok(Terrain::Coastal),
            "urban" => Ok(Terrain::Urban),
            "forest" => Ok(Terrain::Forest),
            "mountainous" => Ok(Terrain::Mountainous),
            _ => Err(RiskError::UnknownTerrain(s.to_string())),
        }
    }
}
