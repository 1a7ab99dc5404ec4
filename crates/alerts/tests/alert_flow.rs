//! Alert lifecycle through the public API, including a full injection
//! round trip from a risk monitor to the store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use sr_alerts::{
    run_applier, spawn_injector, AlertStore, RandomAlertSource, RiskMonitorSource,
};
use sr_core::types::{AlertCategory, Observation};
use sr_gateway::{FetchGateway, GatewayConfig, GatewayError, ObservationProvider};
use sr_risk::Terrain;

#[test]
fn test_houston_flash_flood_lifecycle() {
    let store = AlertStore::new();
    let alert = store.add_alert(AlertCategory::Emergency, "Flash flood warning", "Houston, TX");

    assert_eq!(store.unread_count(), 1);
    store.mark_as_read(alert.id);
    assert_eq!(store.unread_count(), 0);

    // Reading does not dismiss.
    assert!(store.alert(alert.id).is_some());
    assert_eq!(store.active_alerts().len(), 1);

    assert!(store.remove_alert(alert.id));
    assert!(store.active_alerts().is_empty());
    assert_eq!(store.notifications().len(), 1);
    assert_eq!(store.unread_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_random_injection_reaches_store() {
    let store = Arc::new(AlertStore::new());
    let (tx, rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();

    let source = RandomAlertSource::new(StdRng::seed_from_u64(1), 1.0, "Houston, TX");
    let injector = spawn_injector(source, Duration::from_secs(60), tx, cancel.clone());
    let applier = tokio::spawn(run_applier(Arc::clone(&store), rx, cancel.clone()));

    tokio::time::sleep(Duration::from_secs(60 * 3 + 1)).await;
    cancel.cancel();
    injector.await.unwrap();
    let applied = applier.await.unwrap();

    assert_eq!(applied, 3);
    assert_eq!(store.unread_count(), 3);
    for n in store.notifications() {
        assert_eq!(n.location, "Houston, TX");
        assert!(n.message.starts_with("New "));
    }
}

/// Reports a storm that builds over successive provider calls.
struct StormProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl ObservationProvider for StormProvider {
    async fn by_city(&self, city: &str) -> Result<Observation, GatewayError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let (precipitation, wind) = match n {
            0 => (0.0, 2.0),
            1 => (12.0, 8.0),
            _ => (90.0, 35.0),
        };
        Ok(Observation {
            location_key: String::new(),
            location_label: city.to_string(),
            latitude: 29.7604,
            longitude: -95.3698,
            temperature: 75.0,
            feels_like: 75.0,
            humidity: 90.0,
            wind_speed: wind,
            precipitation_probability: precipitation,
            advisories: Vec::new(),
        })
    }

    async fn by_coordinates(&self, lat: f64, lon: f64) -> Result<Observation, GatewayError> {
        Err(GatewayError::InvalidCoordinates { lat, lon })
    }
}

#[tokio::test(start_paused = true)]
async fn test_risk_monitor_escalation_round_trip() {
    let provider = Arc::new(StormProvider {
        calls: AtomicUsize::new(0),
    });
    // TTL shorter than the poll period so every poll refreshes.
    let gateway = Arc::new(FetchGateway::new(
        provider.clone(),
        GatewayConfig {
            ttl: Duration::from_secs(30),
            request_timeout: Duration::from_secs(5),
        },
    ));
    let monitor = RiskMonitorSource::new(Arc::clone(&gateway), "Houston", Terrain::Urban, 75.0);

    let store = Arc::new(AlertStore::new());
    let (tx, rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();
    let injector = spawn_injector(monitor, Duration::from_secs(60), tx, cancel.clone());
    let applier = tokio::spawn(run_applier(Arc::clone(&store), rx, cancel.clone()));

    tokio::time::sleep(Duration::from_secs(60 * 4 + 1)).await;
    cancel.cancel();
    injector.await.unwrap();
    applier.await.unwrap();

    assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    let categories: Vec<AlertCategory> = store
        .notifications()
        .iter()
        .rev()
        .map(|n| n.category)
        .collect();
    // Calm, then moderate, then high and holding.
    assert_eq!(categories, vec![AlertCategory::Warning, AlertCategory::Emergency]);
    assert!(store
        .active_alerts()
        .iter()
        .all(|a| a.location == "houston"));
}
