//! Normalized cache keys for observation lookups.
//!
//! Coordinates are stored as fixed-point integers (1e-4 degree, roughly 11 m)
//! so keys are `Eq + Hash` and two requests for "the same place" written with
//! different float noise share a cache entry.

use std::fmt;

use crate::provider::GatewayError;

/// Fixed-point scale for coordinates: 4 decimal places.
const COORD_SCALE: f64 = 10_000.0;

/// A normalized observation query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// City name, trimmed, lower-cased, inner whitespace collapsed.
    City(String),
    /// Latitude/longitude in units of 1e-4 degree.
    Coordinates { lat_e4: i32, lon_e4: i32 },
}

impl QueryKey {
    /// Build a city key. A blank name cannot resolve to any location.
    pub fn city(name: &str) -> Result<Self, GatewayError> {
        let normalized = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if normalized.is_empty() {
            return Err(GatewayError::LocationNotFound(name.to_string()));
        }
        Ok(Self::City(normalized))
    }

    /// Build a coordinate key.
    ///
    /// Rejects non-finite values, latitude outside `[-90, 90]`, and
    /// longitude outside `[-180, 180]` before anything else happens.
    pub fn coordinates(lat: f64, lon: f64) -> Result<Self, GatewayError> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if !valid {
            return Err(GatewayError::InvalidCoordinates { lat, lon });
        }
        Ok(Self::Coordinates {
            lat_e4: (lat * COORD_SCALE).round() as i32,
            lon_e4: (lon * COORD_SCALE).round() as i32,
        })
    }

    /// Latitude/longitude in degrees, for coordinate keys.
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        match self {
            QueryKey::City(_) => None,
            QueryKey::Coordinates { lat_e4, lon_e4 } => Some((
                f64::from(*lat_e4) / COORD_SCALE,
                f64::from(*lon_e4) / COORD_SCALE,
            )),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::City(name) => write!(f, "city-{}", name),
            QueryKey::Coordinates { .. } => {
                let (lat, lon) = self.lat_lon().unwrap_or_default();
                write!(f, "coords-{:.4}-{:.4}", lat, lon)
            }
        }
    }
}
