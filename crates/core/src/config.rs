//! Layered configuration for the sitrep engine.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults (public OpenWeatherMap endpoint, 30 minute cache)
//! 2. TOML configuration file (if provided)
//! 3. Environment variable overrides (prefix `SITREP_`, nested with `__`)
//! 4. `OPENWEATHER_API_KEY` for the provider key
//!
//! The provider API key **must** come from the environment, never from a
//! configuration file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

// ── Default value functions ────────────────────────────────────────────

/// Default provider request timeout: 10 000 ms.
fn default_timeout_ms() -> u64 {
    10_000
}

/// Default observation cache TTL: 30 minutes.
fn default_ttl_secs() -> u64 {
    30 * 60
}

/// Default synthetic injection cadence: 60 s.
fn default_injection_interval_secs() -> u64 {
    60
}

/// Default chance that a tick injects an alert.
fn default_injection_probability() -> f64 {
    0.3
}

/// Synthetic injection and demo seeding are on unless disabled.
fn default_true() -> bool {
    true
}

/// Default location used for synthetic alerts.
fn default_fallback_location() -> String {
    "Houston, TX".to_string()
}

/// Default terrain for the risk monitor.
fn default_terrain() -> String {
    "urban".to_string()
}

/// Default seasonal baseline temperature: 75 °F.
fn default_baseline_temperature_f() -> f64 {
    75.0
}

/// Default risk monitor cadence: 5 minutes.
fn default_monitor_interval_secs() -> u64 {
    300
}

/// Default HTTP port.
fn default_port() -> u16 {
    8080
}

// ── Configuration structs ──────────────────────────────────────────────

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Observation provider connection settings.
    pub provider: ProviderConfig,
    /// Observation cache settings.
    pub cache: CacheConfig,
    /// Alert store and synthetic injection settings.
    pub alerts: AlertsConfig,
    /// Risk monitor that turns observations into alerts.
    pub monitor: MonitorConfig,
    /// Resource ledger and social signal inputs.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

/// Observation provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// REST base URL (e.g. `https://api.openweathermap.org/data/2.5`).
    pub base_url: String,
    /// API key, loaded from `OPENWEATHER_API_KEY`.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Observation cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live of a cached observation, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

/// Alert store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    /// Whether the synthetic alert injector runs.
    #[serde(default = "default_true")]
    pub injection_enabled: bool,
    /// Seconds between injector ticks.
    #[serde(default = "default_injection_interval_secs")]
    pub injection_interval_secs: u64,
    /// Probability in `[0, 1]` that a tick produces an alert.
    #[serde(default = "default_injection_probability")]
    pub injection_probability: f64,
    /// Location attached to synthetic alerts.
    #[serde(default = "default_fallback_location")]
    pub fallback_location: String,
    /// Start with the demo alerts and notifications.
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

/// Risk monitor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Whether the monitor polls the provider.
    #[serde(default)]
    pub enabled: bool,
    /// City to watch.
    pub location: String,
    /// Terrain class of the watched location.
    #[serde(default = "default_terrain")]
    pub terrain: String,
    /// Seasonal baseline used for temperature anomalies (°F).
    #[serde(default = "default_baseline_temperature_f")]
    pub baseline_temperature_f: f64,
    /// Seconds between polls.
    #[serde(default = "default_monitor_interval_secs")]
    pub interval_secs: u64,
}

/// Locations of the read-only JSON inputs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// JSON array of resource records.
    pub resources_path: Option<PathBuf>,
    /// JSON array of social signals.
    pub signals_path: Option<PathBuf>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl AppConfig {
    /// Load configuration using layered sources.
    ///
    /// 1. Compiled-in defaults.
    /// 2. TOML file at `config_path` (if `Some`).
    /// 3. Environment variable overrides with prefix `SITREP_` and `__` as
    ///    the nesting separator (e.g., `SITREP_CACHE__TTL_SECS=600`).
    /// 4. Provider key from `OPENWEATHER_API_KEY`.
    ///
    /// The result is validated before it is returned.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            // ── Layer 1: compiled-in defaults ───────────────────────
            .set_default("provider.base_url", "https://api.openweathermap.org/data/2.5")?
            .set_default("provider.api_key", "")?
            .set_default("provider.timeout_ms", 10_000i64)?
            .set_default("cache.ttl_secs", 1800i64)?
            .set_default("alerts.injection_enabled", true)?
            .set_default("alerts.injection_interval_secs", 60i64)?
            .set_default("alerts.injection_probability", 0.3)?
            .set_default("alerts.fallback_location", "Houston, TX")?
            .set_default("alerts.seed_demo_data", true)?
            .set_default("monitor.enabled", false)?
            .set_default("monitor.location", "Houston")?
            .set_default("monitor.terrain", "urban")?
            .set_default("monitor.baseline_temperature_f", 75.0)?
            .set_default("monitor.interval_secs", 300i64)?
            .set_default("server.port", 8080i64)?;

        // ── Layer 2: TOML file ─────────────────────────────────────
        if let Some(path) = config_path {
            let path_str = path
                .to_str()
                .context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // ── Layer 3: env var overrides (SITREP_ prefix) ───────────
        // The prefix separator is set explicitly to `_`; otherwise the
        // `config` crate reuses the `__` nesting separator for the prefix.
        builder = builder.add_source(
            Environment::with_prefix("SITREP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut cfg: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        // ── Layer 4: dedicated API key env var ─────────────────────
        if let Ok(v) = std::env::var("OPENWEATHER_API_KEY") {
            cfg.provider.api_key = v;
        }

        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate configuration invariants.
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alerts.injection_probability) {
            bail!(
                "alerts.injection_probability must be within [0, 1], got {}",
                self.alerts.injection_probability
            );
        }
        if self.alerts.injection_interval_secs == 0 {
            bail!("alerts.injection_interval_secs must be positive");
        }
        if self.cache.ttl_secs == 0 {
            bail!("cache.ttl_secs must be positive");
        }
        if self.monitor.enabled {
            if self.monitor.interval_secs == 0 {
                bail!("monitor.interval_secs must be positive");
            }
            if self.provider.api_key.is_empty() {
                bail!("OPENWEATHER_API_KEY is required when the risk monitor is enabled");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    /// Serializes tests that manipulate environment variables. Recovers from
    /// a poisoned lock so one failing test does not cascade.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_env() {
        std::env::remove_var("SITREP_CACHE__TTL_SECS");
        std::env::remove_var("SITREP_ALERTS__INJECTION_PROBABILITY");
        std::env::remove_var("SITREP_MONITOR__ENABLED");
        std::env::remove_var("OPENWEATHER_API_KEY");
    }

    /// Write a temporary TOML file; the `.toml` suffix lets `config` detect
    /// the format.
    fn write_temp_toml(content: &str) -> (tempfile::NamedTempFile, PathBuf) {
        let mut f = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("create temp file");
        write!(f, "{}", content).expect("write temp file");
        let path = f.path().to_path_buf();
        (f, path)
    }

    #[test]
    fn test_load_defaults_only() {
        let _lock = lock_env();
        clear_env();

        let cfg = AppConfig::load(None).expect("load defaults");
        assert_eq!(cfg.provider.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(cfg.provider.timeout_ms, 10_000);
        assert_eq!(cfg.cache.ttl_secs, 1800);
        assert!(cfg.alerts.injection_enabled);
        assert_eq!(cfg.alerts.injection_interval_secs, 60);
        assert_eq!(cfg.alerts.injection_probability, 0.3);
        assert_eq!(cfg.alerts.fallback_location, "Houston, TX");
        assert!(cfg.alerts.seed_demo_data);
        assert!(!cfg.monitor.enabled);
        assert_eq!(cfg.monitor.terrain, "urban");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.ledger.resources_path.is_none());
    }

    #[test]
    fn test_section_defaults_match_layered_defaults() {
        let _lock = lock_env();
        clear_env();

        let layered = AppConfig::load(None).expect("load defaults");
        let alerts: AlertsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(alerts.injection_enabled, layered.alerts.injection_enabled);
        assert_eq!(alerts.injection_interval_secs, layered.alerts.injection_interval_secs);
        assert_eq!(alerts.injection_probability, layered.alerts.injection_probability);
        assert_eq!(alerts.fallback_location, layered.alerts.fallback_location);
        assert_eq!(alerts.seed_demo_data, layered.alerts.seed_demo_data);

        let cache: CacheConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cache.ttl_secs, layered.cache.ttl_secs);
    }

    #[test]
    fn test_load_from_toml() {
        let _lock = lock_env();
        clear_env();

        let toml_content = r#"
[provider]
base_url = "http://localhost:9000"
timeout_ms = 2500

[cache]
ttl_secs = 600

[alerts]
injection_interval_secs = 15
injection_probability = 0.5
fallback_location = "Miami, FL"

[monitor]
location = "Miami"
terrain = "coastal"
baseline_temperature_f = 82.0

[ledger]
resources_path = "/var/lib/sitrep/resources.json"

[server]
port = 9090
"#;
        let (_f, path) = write_temp_toml(toml_content);
        let cfg = AppConfig::load(Some(path)).expect("load from toml");

        assert_eq!(cfg.provider.base_url, "http://localhost:9000");
        assert_eq!(cfg.provider.timeout_ms, 2500);
        assert_eq!(cfg.cache.ttl_secs, 600);
        assert_eq!(cfg.alerts.injection_interval_secs, 15);
        assert_eq!(cfg.alerts.fallback_location, "Miami, FL");
        assert_eq!(cfg.monitor.terrain, "coastal");
        assert_eq!(cfg.monitor.baseline_temperature_f, 82.0);
        assert_eq!(
            cfg.ledger.resources_path,
            Some(PathBuf::from("/var/lib/sitrep/resources.json"))
        );
        assert_eq!(cfg.server.port, 9090);
    }

    #[test]
    fn test_env_var_overrides() {
        let _lock = lock_env();
        clear_env();
        std::env::set_var("SITREP_CACHE__TTL_SECS", "120");

        let cfg = AppConfig::load(None).expect("load with env override");
        assert_eq!(cfg.cache.ttl_secs, 120);

        clear_env();
    }

    #[test]
    fn test_probability_out_of_range_fails() {
        let _lock = lock_env();
        clear_env();
        std::env::set_var("SITREP_ALERTS__INJECTION_PROBABILITY", "1.5");

        let result = AppConfig::load(None);
        assert!(result.is_err());
        let err_msg = format!("{}", result.unwrap_err());
        assert!(err_msg.contains("injection_probability"));

        clear_env();
    }

    #[test]
    fn test_monitor_without_api_key_fails() {
        let _lock = lock_env();
        clear_env();

        let toml_content = r#"
[monitor]
enabled = true
location = "Houston"
"#;
        let (_f, path) = write_temp_toml(toml_content);
        let result = AppConfig::load(Some(path));
        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("OPENWEATHER_API_KEY"));
    }

    #[test]
    fn test_monitor_with_api_key_succeeds() {
        let _lock = lock_env();
        clear_env();
        std::env::set_var("OPENWEATHER_API_KEY", "owm_test_key");
        std::env::set_var("SITREP_MONITOR__ENABLED", "true");

        let cfg = AppConfig::load(None).expect("load monitor with key");
        assert!(cfg.monitor.enabled);
        assert_eq!(cfg.provider.api_key, "owm_test_key");

        clear_env();
    }
}
