//! Integration tests for the gateway through its public API only.
//!
//! A scripted provider stands in for OpenWeatherMap; one test drives the real
//! HTTP client against a closed local port.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use sr_core::types::Observation;
use sr_gateway::{
    FetchGateway, GatewayConfig, GatewayError, ObservationProvider, OpenWeatherClient, QueryKey,
};

#[derive(Default)]
struct CountingProvider {
    city_calls: AtomicUsize,
    coord_calls: AtomicUsize,
}

fn houston(lat: f64, lon: f64) -> Observation {
    Observation {
        location_key: String::new(),
        location_label: "Houston".to_string(),
        latitude: lat,
        longitude: lon,
        temperature: 88.0,
        feels_like: 95.0,
        humidity: 75.0,
        wind_speed: 18.0,
        precipitation_probability: 65.0,
        advisories: Vec::new(),
    }
}

#[async_trait]
impl ObservationProvider for CountingProvider {
    async fn by_city(&self, city: &str) -> Result<Observation, GatewayError> {
        self.city_calls.fetch_add(1, Ordering::SeqCst);
        if city == "atlantis" {
            return Err(GatewayError::LocationNotFound(city.to_string()));
        }
        Ok(houston(29.7604, -95.3698))
    }

    async fn by_coordinates(&self, lat: f64, lon: f64) -> Result<Observation, GatewayError> {
        self.coord_calls.fetch_add(1, Ordering::SeqCst);
        Ok(houston(lat, lon))
    }
}

#[tokio::test]
async fn test_city_and_coordinate_keys_are_separate_entries() {
    let provider = Arc::new(CountingProvider::default());
    let gw = FetchGateway::new(provider.clone(), GatewayConfig::default());

    let by_name = gw.fetch_city("Houston").await.unwrap();
    let by_coords = gw.fetch_coordinates(29.7604, -95.3698).await.unwrap();

    assert_eq!(by_name.location_key, "city-houston");
    assert_eq!(by_coords.location_key, "coords-29.7604--95.3698");
    assert_eq!(gw.cached_len(), 2);
    assert_eq!(provider.city_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.coord_calls.load(Ordering::SeqCst), 1);

    // Key-based entry point hits the same entries.
    let again = gw.fetch(QueryKey::city("houston").unwrap()).await.unwrap();
    assert!(Arc::ptr_eq(&by_name, &again));
    assert_eq!(gw.provider_calls(), 2);
}

#[tokio::test]
async fn test_unknown_city_is_not_cached() {
    let provider = Arc::new(CountingProvider::default());
    let gw = FetchGateway::new(provider.clone(), GatewayConfig::default());

    for _ in 0..2 {
        let err = gw.fetch_city("Atlantis").await.unwrap_err();
        assert!(matches!(err, GatewayError::LocationNotFound(_)));
    }
    assert_eq!(provider.city_calls.load(Ordering::SeqCst), 2);
    assert_eq!(gw.cached_len(), 0);
}

#[tokio::test]
async fn test_blank_city_rejected_without_call() {
    let provider = Arc::new(CountingProvider::default());
    let gw = FetchGateway::new(provider.clone(), GatewayConfig::default());

    assert!(gw.fetch_city("   ").await.is_err());
    assert_eq!(gw.provider_calls(), 0);
}

#[tokio::test]
async fn test_unreachable_provider_surfaces_unavailable() {
    // Port 9 (discard) is closed on test hosts; the connect fails fast.
    let client = OpenWeatherClient::new(
        "http://127.0.0.1:9/data/2.5",
        "0123456789abcdef0123456789abcdef",
        Duration::from_secs(2),
    )
    .unwrap();
    let gw = FetchGateway::new(Arc::new(client), GatewayConfig::default());

    let err = gw.fetch_city("Houston").await.unwrap_err();
    match err {
        GatewayError::ProviderUnavailable(reason) => {
            assert!(!reason.contains("0123456789abcdef"), "key leaked: {reason}");
        }
        other => panic!("expected ProviderUnavailable, got {other:?}"),
    }
    assert_eq!(gw.cached_len(), 0);
}
