//! OpenWeatherMap REST client.
//!
//! Implements [`ObservationProvider`] on top of two endpoints of the
//! OpenWeatherMap 2.5 API, always in imperial units:
//!
//! - `GET /weather?q={city}` resolves a city to coordinates and a display name.
//! - `GET /onecall?lat={lat}&lon={lon}&exclude=minutely,daily` yields current
//!   conditions, the hourly precipitation probability, and active alerts.
//!
//! The API key travels as the `appid` query parameter, so request URLs are
//! never logged.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use sr_core::types::{Advisory, Observation};

use crate::provider::{GatewayError, ObservationProvider};

/// OpenWeatherMap REST client.
///
/// Reuses a single `reqwest::Client` for connection pooling. Every request
/// is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    client: Client,
}

/// `GET /weather` response (only the fields we use).
#[derive(Debug, Deserialize)]
pub struct OwmCurrentResponse {
    /// Resolved coordinates.
    pub coord: OwmCoord,
    /// Display name of the resolved city.
    pub name: String,
}

/// Coordinate pair in OpenWeatherMap payloads.
#[derive(Debug, Deserialize)]
pub struct OwmCoord {
    pub lat: f64,
    pub lon: f64,
}

/// `GET /onecall` response (only the fields we use).
#[derive(Debug, Deserialize)]
pub struct OwmOneCallResponse {
    pub lat: f64,
    pub lon: f64,
    pub current: OwmCurrent,
    /// Hourly forecast; the first entry covers the current hour.
    #[serde(default)]
    pub hourly: Vec<OwmHourly>,
    /// Government weather alerts; absent when there are none.
    #[serde(default)]
    pub alerts: Vec<OwmAlert>,
}

/// Current conditions block of a one-call response.
#[derive(Debug, Deserialize)]
pub struct OwmCurrent {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

/// One hour of forecast.
#[derive(Debug, Deserialize)]
pub struct OwmHourly {
    /// Probability of precipitation in `[0, 1]`.
    #[serde(default)]
    pub pop: f64,
}

/// Government alert as relayed by OpenWeatherMap.
#[derive(Debug, Deserialize)]
pub struct OwmAlert {
    pub sender_name: String,
    pub event: String,
    /// Unix seconds.
    pub start: i64,
    /// Unix seconds.
    pub end: i64,
    #[serde(default)]
    pub description: String,
}

/// OpenWeatherMap error body.
#[derive(Debug, Deserialize)]
pub struct OwmApiError {
    /// Status code; the API sends it as a string or a number.
    pub cod: serde_json::Value,
    pub message: String,
}

impl OpenWeatherClient {
    /// Create a new client with the given request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ProviderUnavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Issue a GET against `endpoint` with the given query parameters.
    ///
    /// `subject` names the location in `LocationNotFound` errors.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        subject: &str,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(endpoint, subject, "OpenWeatherMap GET request");

        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("units", "imperial"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("{endpoint} timed out")
                } else {
                    format!("{endpoint} request failed: {}", e.without_url())
                };
                warn!(endpoint, %reason, "OpenWeatherMap request failed");
                GatewayError::ProviderUnavailable(reason)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            GatewayError::ProviderUnavailable(format!("failed to read {endpoint} body: {}", e.without_url()))
        })?;

        parse_response(endpoint, status, &body, subject)
    }
}

/// Map an HTTP status and body to a typed payload or a gateway error.
fn parse_response<T: DeserializeOwned>(
    endpoint: &str,
    status: StatusCode,
    body: &str,
    subject: &str,
) -> Result<T, GatewayError> {
    if status == StatusCode::NOT_FOUND {
        return Err(GatewayError::LocationNotFound(subject.to_string()));
    }
    if !status.is_success() {
        let detail = serde_json::from_str::<OwmApiError>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());
        return Err(GatewayError::ProviderUnavailable(format!(
            "{endpoint} returned HTTP {status}: {detail}"
        )));
    }
    serde_json::from_str(body).map_err(|e| {
        GatewayError::ProviderUnavailable(format!("malformed {endpoint} payload: {e}"))
    })
}

/// Convert unix seconds to UTC, clamping garbage to the epoch.
fn unix_to_utc(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

impl OwmOneCallResponse {
    /// Build an [`Observation`] labelled `label`.
    ///
    /// The gateway overwrites `location_key` with the normalized query key.
    pub fn into_observation(self, label: String) -> Observation {
        let precipitation_probability = self
            .hourly
            .first()
            .map(|h| (h.pop * 100.0).clamp(0.0, 100.0))
            .unwrap_or(0.0);

        let advisories = self
            .alerts
            .into_iter()
            .map(|a| Advisory {
                sender: a.sender_name,
                event: a.event,
                start: unix_to_utc(a.start),
                end: unix_to_utc(a.end),
                description: a.description,
            })
            .collect();

        Observation {
            location_key: String::new(),
            location_label: label,
            latitude: self.lat,
            longitude: self.lon,
            temperature: self.current.temp,
            feels_like: self.current.feels_like,
            humidity: self.current.humidity,
            wind_speed: self.current.wind_speed,
            precipitation_probability,
            advisories,
        }
    }
}

#[async_trait]
impl ObservationProvider for OpenWeatherClient {
    async fn by_city(&self, city: &str) -> Result<Observation, GatewayError> {
        let resolved: OwmCurrentResponse = self
            .get_json("/weather", &[("q", city.to_string())], city)
            .await?;

        let one_call: OwmOneCallResponse = self
            .get_json(
                "/onecall",
                &[
                    ("lat", resolved.coord.lat.to_string()),
                    ("lon", resolved.coord.lon.to_string()),
                    ("exclude", "minutely,daily".to_string()),
                ],
                city,
            )
            .await?;

        Ok(one_call.into_observation(resolved.name))
    }

    async fn by_coordinates(&self, lat: f64, lon: f64) -> Result<Observation, GatewayError> {
        let subject = format!("{lat:.4}, {lon:.4}");
        let one_call: OwmOneCallResponse = self
            .get_json(
                "/onecall",
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("exclude", "minutely,daily".to_string()),
                ],
                &subject,
            )
            .await?;

        Ok(one_call.into_observation(subject))
    }
}
