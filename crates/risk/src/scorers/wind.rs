//! Wind risk from sustained wind speed.

use crate::assessment::{Hazard, RiskAssessment, RiskLevel};
use crate::pipeline::{HazardScorer, RiskInputs};
use crate::terrain::Terrain;

use super::{classify, WIND_THRESHOLD};

/// Scores wind risk from sustained speed in mph.
#[derive(Debug, Clone)]
pub struct WindScorer {
    pub threshold: f64,
}

impl Default for WindScorer {
    fn default() -> Self {
        Self {
            threshold: WIND_THRESHOLD,
        }
    }
}

impl WindScorer {
    pub fn assess(&self, speed: f64, terrain: Terrain) -> RiskAssessment {
        let level = classify(speed, self.threshold, terrain.multipliers().wind);
        match level {
            RiskLevel::High => RiskAssessment::new(
                level,
                Hazard::Wind,
                format!("Dangerous winds at {speed:.0} mph"),
                "Secure loose objects and stay indoors away from windows",
            ),
            RiskLevel::Moderate => RiskAssessment::new(
                level,
                Hazard::Wind,
                format!("Elevated winds at {speed:.0} mph"),
                "Secure outdoor items and drive with caution",
            ),
            RiskLevel::Low => RiskAssessment::new(
                level,
                Hazard::Wind,
                "Normal wind conditions",
                "No special precautions needed",
            ),
        }
    }
}

impl HazardScorer for WindScorer {
    fn name(&self) -> &str {
        "wind"
    }

    fn hazard(&self) -> Hazard {
        Hazard::Wind
    }

    fn score(&self, inputs: &RiskInputs, terrain: Terrain) -> RiskAssessment {
        self.assess(inputs.wind_speed, terrain)
    }
}

/// Score wind speed with the default 30 mph threshold.
pub fn score_wind(speed: f64, terrain: Terrain) -> RiskAssessment {
    WindScorer::default().assess(speed, terrain)
}
