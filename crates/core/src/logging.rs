//! Logging and tracing initialization for the sitrep engine.
//!
//! [`init_tracing`] installs the global subscriber in one of two formats:
//! - [`LogFormat::Json`]: one JSON object per line with millisecond UTC
//!   timestamps, for log shipping.
//! - [`LogFormat::Pretty`]: colored multi-line output for local runs.
//!
//! Both respect `RUST_LOG` (e.g., `RUST_LOG=sr_gateway=debug,sr_alerts=trace`)
//! and fall back to `info`.
//!
//! The [`SecretSanitizer`] layer warns whenever a span or event records a
//! field that looks like the provider API key.

use std::fmt;
use std::str::FromStr;

use tracing::field::{Field, Visit};
use tracing::span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

/// Output format of the global subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Newline-delimited JSON.
    Json,
    /// Human-readable, colored.
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Install the global tracing subscriber.
///
/// Returns an error if a global subscriber is already set, which lets
/// integration tests call this more than once.
///
/// # Examples
///
/// ```
/// use sr_core::logging::{init_tracing, LogFormat};
/// let _ = init_tracing(LogFormat::Pretty);
/// ```
pub fn init_tracing(format: LogFormat) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(SecretSanitizer);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_timer(UtcMillisTimer)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init(),
    }
}

/// RFC 3339 timestamps with millisecond precision.
#[derive(Debug, Clone)]
struct UtcMillisTimer;

impl tracing_subscriber::fmt::time::FormatTime for UtcMillisTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

/// A tracing layer that flags fields carrying credentials.
///
/// OpenWeatherMap keys are 32 hex characters and travel as the `appid` query
/// parameter, so request URLs must never be logged verbatim.
///
/// Patterns detected:
/// - fields named `api_key`, `appid`, `secret`, `password`, `token`,
///   `authorization`
/// - string values of exactly 32 hex characters
/// - URLs containing an `appid=` query parameter
#[derive(Debug, Clone)]
pub struct SecretSanitizer;

impl<S> Layer<S> for SecretSanitizer
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &span::Attributes<'_>,
        _id: &span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = SecretCheckVisitor::default();
        attrs.record(&mut visitor);
        if let Some(field) = visitor.offending_field {
            tracing::warn!(field, "credential-like value recorded in span fields");
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = SecretCheckVisitor::default();
        event.record(&mut visitor);
        if let Some(field) = visitor.offending_field {
            tracing::warn!(field, "credential-like value recorded in event fields");
        }
    }
}

/// Field names that always indicate secrets regardless of value.
const SENSITIVE_FIELD_NAMES: &[&str] = &[
    "api_key",
    "appid",
    "secret",
    "password",
    "token",
    "authorization",
];

/// Visitor that remembers the first field that looks like a credential.
#[derive(Default)]
struct SecretCheckVisitor {
    offending_field: Option<&'static str>,
}

impl SecretCheckVisitor {
    fn looks_like_secret(value: &str) -> bool {
        if value.contains("appid=") {
            return true;
        }
        value.len() == 32 && value.chars().all(|c| c.is_ascii_hexdigit())
    }

    fn flag(&mut self, field: &Field) {
        if self.offending_field.is_none() {
            self.offending_field = Some(field.name());
        }
    }
}

impl Visit for SecretCheckVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if SENSITIVE_FIELD_NAMES.contains(&field.name()) {
            self.flag(field);
        } else if Self::looks_like_secret(&format!("{value:?}")) {
            self.flag(field);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if SENSITIVE_FIELD_NAMES.contains(&field.name()) || Self::looks_like_secret(value) {
            self.flag(field);
        }
    }
}
