//! Weather observations as returned by the observation provider.
//!
//! Units are imperial throughout: temperatures in °F, wind speed in mph.
//! Humidity and precipitation probability are percentages in `[0, 100]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single point-in-time weather observation for one location.
///
/// Immutable once fetched. The gateway hands these out behind an `Arc` so
/// repeated cache hits share one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Normalized query key the observation was fetched under.
    pub location_key: String,
    /// Human-readable place name reported by the provider.
    pub location_label: String,
    /// Latitude of the observed location.
    pub latitude: f64,
    /// Longitude of the observed location.
    pub longitude: f64,
    /// Air temperature (°F).
    pub temperature: f64,
    /// Apparent temperature (°F).
    pub feels_like: f64,
    /// Relative humidity (%).
    pub humidity: f64,
    /// Sustained wind speed (mph).
    pub wind_speed: f64,
    /// Probability of precipitation over the next hour (%).
    pub precipitation_probability: f64,
    /// Advisories issued by the provider for this location.
    #[serde(default)]
    pub advisories: Vec<Advisory>,
}

/// Provider-issued weather advisory (e.g. a flood watch).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    /// Issuing agency.
    pub sender: String,
    /// Short event name ("Flood Warning").
    pub event: String,
    /// When the advisory takes effect.
    pub start: DateTime<Utc>,
    /// When the advisory expires.
    pub end: DateTime<Utc>,
    /// Free-text body.
    pub description: String,
}

impl Advisory {
    /// Returns `true` once `at` has reached the advisory's end.
    pub fn has_expired(&self, at: DateTime<Utc>) -> bool {
        self.end <= at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn advisory() -> Advisory {
        Advisory {
            sender: "NWS Houston".to_string(),
            event: "Flood Warning".to_string(),
            start: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap(),
            description: "Minor flooding expected".to_string(),
        }
    }

    #[test]
    fn test_advisory_expiry() {
        let a = advisory();
        // Not yet started is not expired.
        assert!(!a.has_expired(Utc.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap()));
        assert!(!a.has_expired(Utc.with_ymd_and_hms(2024, 6, 1, 17, 59, 59).unwrap()));
        assert!(a.has_expired(Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap()));
    }

    #[test]
    fn test_observation_camel_case_serde() {
        let obs = Observation {
            location_key: "city-houston".to_string(),
            location_label: "Houston".to_string(),
            latitude: 29.7604,
            longitude: -95.3698,
            temperature: 88.0,
            feels_like: 95.0,
            humidity: 70.0,
            wind_speed: 12.0,
            precipitation_probability: 40.0,
            advisories: vec![advisory()],
        };
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["locationKey"], "city-houston");
        assert_eq!(json["feelsLike"], 95.0);
        assert_eq!(json["precipitationProbability"], 40.0);
        let back: Observation = serde_json::from_value(json).unwrap();
        assert_eq!(back, obs);
    }
}
