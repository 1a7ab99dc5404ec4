//! Flood risk from precipitation probability.

use crate::assessment::{Hazard, RiskAssessment, RiskLevel};
use crate::pipeline::{HazardScorer, RiskInputs};
use crate::terrain::Terrain;

use super::{classify, PRECIPITATION_THRESHOLD};

/// Scores flood risk from the next-hour precipitation probability (0-100).
/// Uses the terrain's flood multiplier.
#[derive(Debug, Clone)]
pub struct PrecipitationScorer {
    pub threshold: f64,
}

impl Default for PrecipitationScorer {
    fn default() -> Self {
        Self {
            threshold: PRECIPITATION_THRESHOLD,
        }
    }
}

impl PrecipitationScorer {
    pub fn assess(&self, probability: f64, terrain: Terrain) -> RiskAssessment {
        let level = classify(probability, self.threshold, terrain.multipliers().flood);
        match level {
            RiskLevel::High => RiskAssessment::new(
                level,
                Hazard::Flood,
                format!("High flood risk: {probability:.0}% chance of precipitation over {terrain} terrain"),
                "Avoid low-lying roads and be ready to move to higher ground",
            ),
            RiskLevel::Moderate => RiskAssessment::new(
                level,
                Hazard::Flood,
                format!("Moderate flood risk: {probability:.0}% chance of precipitation"),
                "Keep drains clear and monitor local flood warnings",
            ),
            RiskLevel::Low => RiskAssessment::new(
                level,
                Hazard::Flood,
                "Low flood risk",
                "No immediate action required",
            ),
        }
    }
}

impl HazardScorer for PrecipitationScorer {
    fn name(&self) -> &str {
        "precipitation"
    }

    fn hazard(&self) -> Hazard {
        Hazard::Flood
    }

    fn score(&self, inputs: &RiskInputs, terrain: Terrain) -> RiskAssessment {
        self.assess(inputs.precipitation_probability, terrain)
    }
}

/// Score precipitation probability with the default 60% threshold.
pub fn score_precipitation(probability: f64, terrain: Terrain) -> RiskAssessment {
    PrecipitationScorer::default().assess(probability, terrain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urban_bands() {
        // Urban flood multiplier 0.3: High at 18%, Moderate at 9%.
        assert_eq!(score_precipitation(73.0, Terrain::Urban).risk, RiskLevel::High);
        assert_eq!(score_precipitation(18.0, Terrain::Urban).risk, RiskLevel::High);
        assert_eq!(score_precipitation(12.0, Terrain::Urban).risk, RiskLevel::Moderate);
        assert_eq!(score_precipitation(5.0, Terrain::Urban).risk, RiskLevel::Low);
    }

    #[test]
    fn test_terrain_changes_verdict() {
        // Low-lying adjusts to 30 (half 15), mountainous to 12.
        assert_eq!(score_precipitation(25.0, Terrain::LowLying).risk, RiskLevel::Moderate);
        assert_eq!(score_precipitation(25.0, Terrain::Mountainous).risk, RiskLevel::High);
    }

    #[test]
    fn test_low_message() {
        let a = score_precipitation(0.0, Terrain::Urban);
        assert_eq!(a.hazard_type, Hazard::Flood);
        assert_eq!(a.message, "Low flood risk");
        assert_eq!(a.recommendation, "No immediate action required");
    }

    #[test]
    fn test_high_message_names_terrain() {
        let a = score_precipitation(80.0, Terrain::Coastal);
        assert!(a.message.contains("80%"));
        assert!(a.message.contains("coastal"));
    }

    #[test]
    fn test_custom_threshold() {
        let scorer = PrecipitationScorer { threshold: 100.0 };
        // Adjusted 30 on urban.
        assert_eq!(scorer.assess(20.0, Terrain::Urban).risk, RiskLevel::Moderate);
    }
}
