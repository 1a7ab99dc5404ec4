//! Engine wiring and lifecycle.
//!
//! [`Engine`] builds the shared state (gateway, alert store, resource ledger,
//! risk pipeline) and spawns the HTTP server, the alert applier, and up to
//! two injectors: synthetic traffic and the risk monitor.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use sr_alerts::{run_applier, spawn_injector, AlertDraft, AlertStore, RandomAlertSource, RiskMonitorSource};
use sr_core::config::AppConfig;
use sr_gateway::{FetchGateway, GatewayConfig, OpenWeatherClient};
use sr_resources::Ledger;
use sr_risk::{RiskPipeline, Terrain};

use crate::server;

/// Capacity of the injector → applier channel.
const DRAFT_CHANNEL_CAPACITY: usize = 64;

/// State shared by every HTTP handler.
pub struct AppState {
    pub gateway: Arc<FetchGateway>,
    pub alerts: Arc<AlertStore>,
    pub ledger: Arc<Ledger>,
    pub pipeline: RiskPipeline,
    /// Used by `/risk` when the request carries no `baseline`.
    pub baseline_temperature: f64,
}

impl AppState {
    pub fn new(gateway: Arc<FetchGateway>, alerts: Arc<AlertStore>, ledger: Ledger) -> Self {
        Self {
            gateway,
            alerts,
            ledger: Arc::new(ledger),
            pipeline: RiskPipeline::standard(),
            baseline_temperature: 75.0,
        }
    }
}

/// The running service.
pub struct Engine {
    state: Arc<AppState>,
    config: AppConfig,
    monitor_terrain: Terrain,
    cancel: CancellationToken,
}

impl Engine {
    /// Build an engine from configuration.
    ///
    /// Fails if the ledger files cannot be read or the monitor terrain is
    /// unknown.
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = OpenWeatherClient::new(
            config.provider.base_url.clone(),
            config.provider.api_key.clone(),
            Duration::from_millis(config.provider.timeout_ms),
        )
        .context("failed to build observation provider")?;
        let gateway = Arc::new(FetchGateway::new(
            Arc::new(client),
            GatewayConfig::from_settings(&config.cache, &config.provider),
        ));

        let alerts = if config.alerts.seed_demo_data {
            AlertStore::with_demo_data()
        } else {
            AlertStore::new()
        };

        let ledger = Ledger::load(&config.ledger).context("failed to load resource ledger")?;

        let monitor_terrain: Terrain = config
            .monitor
            .terrain
            .parse()
            .context("invalid monitor.terrain")?;

        let mut state = AppState::new(gateway, Arc::new(alerts), ledger);
        state.baseline_temperature = config.monitor.baseline_temperature_f;

        Ok(Self {
            state: Arc::new(state),
            config,
            monitor_terrain,
            cancel: CancellationToken::new(),
        })
    }

    /// Token that stops the engine when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until SIGINT or cancellation.
    ///
    /// Returns the HTTP server's error if it failed, e.g. when the port is
    /// already taken.
    pub async fn run(self) -> Result<()> {
        let config = &self.config;
        let cancel = self.cancel.clone();

        tracing::info!(
            port = config.server.port,
            ttl_secs = config.cache.ttl_secs,
            injection = config.alerts.injection_enabled,
            monitor = config.monitor.enabled,
            "engine starting"
        );

        // ── 1. Alert applier ─────────────────────────────────────
        let (draft_tx, draft_rx) = mpsc::channel::<AlertDraft>(DRAFT_CHANNEL_CAPACITY);
        let applier = tokio::spawn(run_applier(
            Arc::clone(&self.state.alerts),
            draft_rx,
            cancel.clone(),
        ));

        // ── 2. Injectors ─────────────────────────────────────────
        let mut injectors = Vec::new();
        if config.alerts.injection_enabled {
            let source = RandomAlertSource::from_entropy(
                config.alerts.injection_probability,
                config.alerts.fallback_location.clone(),
            );
            injectors.push(spawn_injector(
                source,
                Duration::from_secs(config.alerts.injection_interval_secs),
                draft_tx.clone(),
                cancel.clone(),
            ));
        }
        if config.monitor.enabled {
            let source = RiskMonitorSource::new(
                Arc::clone(&self.state.gateway),
                config.monitor.location.clone(),
                self.monitor_terrain,
                config.monitor.baseline_temperature_f,
            );
            injectors.push(spawn_injector(
                source,
                Duration::from_secs(config.monitor.interval_secs),
                draft_tx.clone(),
                cancel.clone(),
            ));
        }
        // The applier exits on its own once every injector is gone.
        drop(draft_tx);

        // ── 3. HTTP server ───────────────────────────────────────
        let server_state = Arc::clone(&self.state);
        let server_cancel = cancel.clone();
        let port = config.server.port;
        let server = tokio::spawn(async move {
            let result = server::run_server(server_state, port, server_cancel.clone()).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "HTTP server failed");
                server_cancel.cancel();
            }
            result
        });

        // ── Shutdown signal ──────────────────────────────────────
        tokio::select! {
            _ = signal::ctrl_c() => {
                tracing::info!("received SIGINT, shutting down");
            }
            _ = cancel.cancelled() => {
                tracing::info!("cancellation token triggered");
            }
        }

        cancel.cancel();

        for handle in injectors {
            let _ = handle.await;
        }
        let applied = applier.await.unwrap_or_default();
        let served = server.await.context("HTTP server task panicked")?;

        tracing::info!(
            applied,
            active_alerts = self.state.alerts.active_alerts().len(),
            provider_calls = self.state.gateway.provider_calls(),
            "engine stopped"
        );
        served
    }
}
