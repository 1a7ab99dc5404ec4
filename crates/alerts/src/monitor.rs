//! Alert source driven by live risk scoring.
//!
//! On each poll the watched location is fetched through the gateway (so
//! repeated polls inside the TTL cost no provider call), scored with the risk
//! pipeline, and turned into at most one risk alert plus one info alert per
//! new, unexpired provider advisory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use sr_core::types::{AlertCategory, Observation};
use sr_gateway::FetchGateway;
use sr_risk::{RiskInputs, RiskLevel, RiskPipeline, Terrain};

use crate::source::{AlertDraft, AlertSource, SourceError};

/// Watches one location and drafts alerts when its risk escalates.
///
/// A risk alert is drafted only when the overall level rises above the level
/// seen on the previous poll, so a steady `High` does not repeat every tick.
/// Falling back to `Low` re-arms it.
pub struct RiskMonitorSource {
    gateway: Arc<FetchGateway>,
    pipeline: RiskPipeline,
    location: String,
    terrain: Terrain,
    baseline_temperature: f64,
    last_level: RiskLevel,
    /// (event, start) of advisories already drafted, mapped to their end.
    seen_advisories: HashMap<(String, DateTime<Utc>), DateTime<Utc>>,
}

impl RiskMonitorSource {
    pub fn new(
        gateway: Arc<FetchGateway>,
        location: impl Into<String>,
        terrain: Terrain,
        baseline_temperature: f64,
    ) -> Self {
        Self {
            gateway,
            pipeline: RiskPipeline::standard(),
            location: location.into(),
            terrain,
            baseline_temperature,
            last_level: RiskLevel::Low,
            seen_advisories: HashMap::new(),
        }
    }

    /// Turn one observation into drafts, updating escalation and advisory
    /// state.
    pub fn assess(&mut self, observation: &Observation) -> Result<Vec<AlertDraft>, SourceError> {
        self.assess_at(observation, Utc::now())
    }

    fn assess_at(
        &mut self,
        observation: &Observation,
        now: DateTime<Utc>,
    ) -> Result<Vec<AlertDraft>, SourceError> {
        let inputs = RiskInputs::from_observation(observation, self.baseline_temperature);
        let report = self.pipeline.evaluate(&inputs, self.terrain)?;
        let level = report.overall.risk;
        let location = observation.location_label.clone();

        let mut drafts = Vec::new();
        if level > self.last_level {
            let category = match level {
                RiskLevel::High => AlertCategory::Emergency,
                _ => AlertCategory::Warning,
            };
            drafts.push(AlertDraft::new(
                category,
                format!("{}. {}", report.overall.message, report.overall.recommendation),
                location.clone(),
            ));
        }
        debug!(
            location = %location,
            previous = %self.last_level,
            current = %level,
            hazard = %report.overall.hazard_type,
            "risk monitor assessed"
        );
        self.last_level = level;

        self.seen_advisories.retain(|_, end| *end > now);
        for advisory in &observation.advisories {
            if advisory.has_expired(now) {
                debug!(event = %advisory.event, end = %advisory.end, "skipping expired advisory");
                continue;
            }
            let key = (advisory.event.clone(), advisory.start);
            if self.seen_advisories.insert(key, advisory.end).is_none() {
                drafts.push(AlertDraft::new(
                    AlertCategory::Info,
                    format!("{} issued by {}", advisory.event, advisory.sender),
                    location.clone(),
                ));
            }
        }

        Ok(drafts)
    }
}

#[async_trait]
impl AlertSource for RiskMonitorSource {
    fn name(&self) -> &str {
        "risk-monitor"
    }

    async fn poll(&mut self) -> Result<Vec<AlertDraft>, SourceError> {
        let observation = self.gateway.fetch_city(&self.location).await?;
        self.assess(&observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr_core::types::Advisory;
    use sr_gateway::{GatewayConfig, GatewayError, ObservationProvider};

    struct NoProvider;

    #[async_trait]
    impl ObservationProvider for NoProvider {
        async fn by_city(&self, city: &str) -> Result<Observation, GatewayError> {
            Err(GatewayError::LocationNotFound(city.to_string()))
        }
        async fn by_coordinates(&self, lat: f64, lon: f64) -> Result<Observation, GatewayError> {
            Err(GatewayError::InvalidCoordinates { lat, lon })
        }
    }

    fn monitor() -> RiskMonitorSource {
        let gateway = Arc::new(FetchGateway::new(Arc::new(NoProvider), GatewayConfig::default()));
        RiskMonitorSource::new(gateway, "Houston", Terrain::Urban, 75.0)
    }

    fn observation(precipitation: f64, wind: f64, temperature: f64) -> Observation {
        Observation {
            location_key: "city-houston".to_string(),
            location_label: "Houston".to_string(),
            latitude: 29.76,
            longitude: -95.37,
            temperature,
            feels_like: temperature,
            humidity: 70.0,
            wind_speed: wind,
            precipitation_probability: precipitation,
            advisories: Vec::new(),
        }
    }

    #[test]
    fn test_calm_conditions_draft_nothing() {
        let mut m = monitor();
        assert!(m.assess(&observation(0.0, 0.0, 75.0)).unwrap().is_empty());
    }

    #[test]
    fn test_escalation_drafts_once() {
        let mut m = monitor();
        // Urban: moderate flood at 9%, high at 18%.
        let drafts = m.assess(&observation(10.0, 0.0, 75.0)).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].category, AlertCategory::Warning);
        assert!(drafts[0].message.starts_with("Moderate flood risk"));

        let drafts = m.assess(&observation(80.0, 0.0, 75.0)).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].category, AlertCategory::Emergency);
        assert_eq!(drafts[0].location, "Houston");

        // Holding at High is silent.
        assert!(m.assess(&observation(85.0, 0.0, 75.0)).unwrap().is_empty());

        // Back to calm, then up again re-arms.
        assert!(m.assess(&observation(0.0, 0.0, 75.0)).unwrap().is_empty());
        assert_eq!(m.assess(&observation(80.0, 0.0, 75.0)).unwrap().len(), 1);
    }

    #[test]
    fn test_advisories_deduplicated() {
        let mut m = monitor();
        let start = Utc::now();
        let mut obs = observation(0.0, 0.0, 75.0);
        obs.advisories.push(Advisory {
            sender: "NWS Houston/Galveston TX".to_string(),
            event: "Flood Watch".to_string(),
            start,
            end: start + chrono::Duration::hours(6),
            description: String::new(),
        });

        let drafts = m.assess(&obs).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].category, AlertCategory::Info);
        assert_eq!(drafts[0].message, "Flood Watch issued by NWS Houston/Galveston TX");

        assert!(m.assess(&obs).unwrap().is_empty());
    }

    #[test]
    fn test_expired_advisories_skipped_and_forgotten() {
        let mut m = monitor();
        let now = Utc::now();
        let mut obs = observation(0.0, 0.0, 75.0);
        obs.advisories.push(Advisory {
            sender: "NWS Houston/Galveston TX".to_string(),
            event: "Heat Advisory".to_string(),
            start: now - chrono::Duration::hours(12),
            end: now - chrono::Duration::hours(1),
            description: String::new(),
        });
        obs.advisories.push(Advisory {
            sender: "NWS Houston/Galveston TX".to_string(),
            event: "Flood Watch".to_string(),
            start: now,
            end: now + chrono::Duration::hours(6),
            description: String::new(),
        });

        let drafts = m.assess_at(&obs, now).unwrap();
        assert_eq!(drafts.len(), 1);
        assert!(drafts[0].message.starts_with("Flood Watch"));
        assert_eq!(m.seen_advisories.len(), 1);

        // Once the watch ends it is dropped from the seen set too.
        let later = now + chrono::Duration::hours(7);
        assert!(m.assess_at(&obs, later).unwrap().is_empty());
        assert!(m.seen_advisories.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_error_surfaces() {
        let mut m = monitor();
        let err = m.poll().await.unwrap_err();
        assert!(matches!(err, SourceError::Gateway(GatewayError::LocationNotFound(_))));
    }
}
