//! # sr-risk
//!
//! Turns weather signals and terrain into qualitative risk verdicts. Each
//! hazard scorer compares its signal against a fixed threshold scaled by a
//! terrain multiplier; [`combine`] reduces the per-hazard assessments to one
//! overall verdict.

pub mod assessment;
pub mod pipeline;
pub mod scorers;
pub mod terrain;

pub use assessment::{Hazard, RiskAssessment, RiskLevel};
pub use pipeline::{combine, HazardScorer, RiskError, RiskInputs, RiskPipeline, RiskReport};
pub use scorers::{score_precipitation, score_temperature_anomaly, score_wind};
pub use terrain::{Terrain, TerrainMultipliers};
