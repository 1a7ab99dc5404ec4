//! Heat and cold risk from deviation against a baseline temperature.

use crate::assessment::{Hazard, RiskAssessment, RiskLevel};
use crate::pipeline::{HazardScorer, RiskInputs};
use crate::terrain::Terrain;

use super::{classify, TEMPERATURE_ANOMALY_THRESHOLD};

/// Scores the absolute anomaly `current - baseline` in °F. The sign only
/// decides whether the message talks about heat or cold. Uses the terrain's
/// fire multiplier.
#[derive(Debug, Clone)]
pub struct TemperatureScorer {
    pub threshold: f64,
}

impl Default for TemperatureScorer {
    fn default() -> Self {
        Self {
            threshold: TEMPERATURE_ANOMALY_THRESHOLD,
        }
    }
}

impl TemperatureScorer {
    pub fn assess(&self, current: f64, baseline: f64, terrain: Terrain) -> RiskAssessment {
        let anomaly = current - baseline;
        let magnitude = anomaly.abs();
        let level = classify(magnitude, self.threshold, terrain.multipliers().fire);
        let hot = anomaly > 0.0;

        let (message, recommendation) = match (level, hot) {
            (RiskLevel::High, true) => (
                format!("Extreme heat: {magnitude:.1}°F above normal"),
                "Stay hydrated and avoid outdoor activity during peak hours",
            ),
            (RiskLevel::High, false) => (
                format!("Extreme cold: {magnitude:.1}°F below normal"),
                "Limit time outdoors and protect exposed pipes",
            ),
            (RiskLevel::Moderate, true) => (
                format!("Above-normal temperatures: {magnitude:.1}°F above normal"),
                "Limit strenuous outdoor activity",
            ),
            (RiskLevel::Moderate, false) => (
                format!("Below-normal temperatures: {magnitude:.1}°F below normal"),
                "Keep warm clothing on hand",
            ),
            (RiskLevel::Low, _) => (
                "Normal temperature range".to_string(),
                "No special precautions needed",
            ),
        };

        RiskAssessment::new(level, Hazard::Temperature, message, recommendation)
    }
}

impl HazardScorer for TemperatureScorer {
    fn name(&self) -> &str {
        "temperature"
    }

    fn hazard(&self) -> Hazard {
        Hazard::Temperature
    }

    fn score(&self, inputs: &RiskInputs, terrain: Terrain) -> RiskAssessment {
        self.assess(inputs.temperature, inputs.baseline_temperature, terrain)
    }
}

/// Score a temperature anomaly with the default 5°F threshold.
pub fn score_temperature_anomaly(current: f64, baseline: f64, terrain: Terrain) -> RiskAssessment {
    TemperatureScorer::default().assess(current, baseline, terrain)
}
