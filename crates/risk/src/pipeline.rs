//! Hazard scoring pipeline.
//!
//! A [`RiskPipeline`] runs every registered [`HazardScorer`] against one
//! [`RiskInputs`] snapshot and reduces the results with [`combine`]. Unlike a
//! rejection chain nothing short-circuits: every scorer contributes an
//! assessment, and the most severe one becomes the overall verdict.

use serde::Serialize;
use tracing::debug;

use sr_core::types::Observation;

use crate::assessment::{Hazard, RiskAssessment};
use crate::scorers::{PrecipitationScorer, TemperatureScorer, WindScorer};
use crate::terrain::Terrain;

/// Errors from risk scoring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiskError {
    /// `combine` was given nothing to combine.
    #[error("cannot combine an empty list of assessments")]
    EmptyAssessments,
    /// Terrain name not in the multiplier table.
    #[error("unknown terrain: {0}")]
    UnknownTerrain(String),
}

/// Raw signals a scorer may read.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskInputs {
    /// Percent, 0-100.
    pub precipitation_probability: f64,
    /// mph.
    pub wind_speed: f64,
    /// °F.
    pub temperature: f64,
    /// Seasonal normal used for the anomaly, °F.
    pub baseline_temperature: f64,
}

impl RiskInputs {
    pub fn from_observation(observation: &Observation, baseline_temperature: f64) -> Self {
        Self {
            precipitation_probability: observation.precipitation_probability,
            wind_speed: observation.wind_speed,
            temperature: observation.temperature,
            baseline_temperature,
        }
    }
}

/// A single hazard evaluation.
///
/// Scorers are pure: the same inputs and terrain always give the same
/// assessment.
pub trait HazardScorer: Send + Sync {
    /// Name for logging and diagnostics.
    fn name(&self) -> &str;

    /// Hazard family of every assessment this scorer returns. A pipeline
    /// holds at most one scorer per hazard.
    fn hazard(&self) -> Hazard;

    fn score(&self, inputs: &RiskInputs, terrain: Terrain) -> RiskAssessment;
}

/// Individual assessments plus the combined verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub terrain: Terrain,
    pub assessments: Vec<RiskAssessment>,
    pub overall: RiskAssessment,
}

/// Reduce several assessments to one.
///
/// The highest severity wins. Equal severities are broken by hazard priority
/// (flood, then wind, then temperature). The winner's message and
/// recommendation are returned unchanged.
pub fn combine(assessments: &[RiskAssessment]) -> Result<RiskAssessment, RiskError> {
    assessments
        .iter()
        .max_by_key(|a| a.rank())
        .cloned()
        .ok_or(RiskError::EmptyAssessments)
}

/// Ordered set of hazard scorers.
pub struct RiskPipeline {
    scorers: Vec<Box<dyn HazardScorer>>,
}

impl RiskPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self {
            scorers: Vec::new(),
        }
    }

    /// Precipitation, wind and temperature scorers with default thresholds.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_scorer(PrecipitationScorer::default());
        pipeline.add_scorer(WindScorer::default());
        pipeline.add_scorer(TemperatureScorer::default());
        pipeline
    }

    /// Register a scorer. One already registered for the same hazard is
    /// replaced in place, keeping evaluation order.
    pub fn add_scorer(&mut self, scorer: impl HazardScorer + 'static) {
        let hazard = scorer.hazard();
        match self.scorers.iter_mut().find(|s| s.hazard() == hazard) {
            Some(slot) => {
                debug!(replaced = slot.name(), scorer = scorer.name(), hazard = %hazard, "scorer replaced");
                *slot = Box::new(scorer);
            }
            None => self.scorers.push(Box::new(scorer)),
        }
    }

    /// Run every scorer and combine. Fails only when the pipeline is empty.
    pub fn evaluate(&self, inputs: &RiskInputs, terrain: Terrain) -> Result<RiskReport, RiskError> {
        let assessments: Vec<RiskAssessment> = self
            .scorers
            .iter()
            .map(|scorer| {
                let assessment = scorer.score(inputs, terrain);
                debug!(
                    scorer = scorer.name(),
                    risk = %assessment.risk,
                    terrain = %terrain,
                    "hazard scored"
                );
                assessment
            })
            .collect();

        let overall = combine(&assessments)?;
        Ok(RiskReport {
            terrain,
            assessments,
            overall,
        })
    }

    pub fn scorer_count(&self) -> usize {
        self.scorers.len()
    }
}

impl Default for RiskPipeline {
    fn default() -> Self {
        Self::new()
    }
}
