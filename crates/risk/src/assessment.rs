//! Risk verdict types.

use std::fmt;

use serde::Serialize;

/// Qualitative severity. Ordered `Low < Moderate < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hazard family an assessment speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Hazard {
    Flood,
    Wind,
    Temperature,
}

impl Hazard {
    /// Tie-break rank when severities are equal. Higher wins.
    pub fn priority(&self) -> u8 {
        match self {
            Hazard::Flood => 2,
            Hazard::Wind => 1,
            Hazard::Temperature => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hazard::Flood => "Flood",
            Hazard::Wind => "Wind",
            Hazard::Temperature => "Temperature",
        }
    }
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring one hazard, or of combining several.
///
/// Recomputed on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk: RiskLevel,
    pub hazard_type: Hazard,
    pub message: String,
    pub recommendation: String,
}

impl RiskAssessment {
    pub fn new(
        risk: RiskLevel,
        hazard_type: Hazard,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            risk,
            hazard_type,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }

    /// Sort key for combining: severity first, hazard priority second.
    pub(crate) fn rank(&self) -> (RiskLevel, u8) {
        (self.risk, self.hazard_type.priority())
    }
}
