//! Individual hazard scorers.
//!
//! Each scorer compares a raw signal against `threshold × multiplier`, where
//! the multiplier comes from the terrain table. At or above the adjusted
//! threshold is `High`, at or above half of it is `Moderate`, anything else
//! is `Low`.

pub mod precipitation;
pub mod temperature;
pub mod wind;

pub use precipitation::{score_precipitation, PrecipitationScorer};
pub use temperature::{score_temperature_anomaly, TemperatureScorer};
pub use wind::{score_wind, WindScorer};

use crate::assessment::RiskLevel;

/// Precipitation probability threshold, percent.
pub const PRECIPITATION_THRESHOLD: f64 = 60.0;
/// Sustained wind speed threshold, mph.
pub const WIND_THRESHOLD: f64 = 30.0;
/// Absolute deviation from the baseline temperature, °F.
pub const TEMPERATURE_ANOMALY_THRESHOLD: f64 = 5.0;

/// Map a non-negative signal onto a severity band.
pub(crate) fn classify(signal: f64, threshold: f64, multiplier: f64) -> RiskLevel {
    let adjusted = threshold * multiplier;
    if signal >= adjusted {
        RiskLevel::High
    } else if signal >= adjusted / 2.0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}
