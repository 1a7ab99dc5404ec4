//! HTTP API over the engine state.
//!
//! ## Endpoints
//!
//! - `GET /health`
//! - `GET /alerts`, `POST /alerts`, `DELETE /alerts/:id`
//! - `GET /notifications`, `POST /notifications/:id/read`
//! - `GET /weather?city=` or `?lat=&lon=`
//! - `GET /risk?city=|lat=&lon=&terrain=&baseline=`
//! - `GET /resources?type=&priority=&location=&q=&sort=&dir=`
//! - `GET /resources/aggregate?by=type|location`
//! - `GET /resources/summary`
//! - `GET /signals/summary`

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use sr_alerts::{Alert, NotificationView};
use sr_core::types::{AlertCategory, AlertId, Observation, ResourceRecord};
use sr_gateway::QueryKey;
use sr_resources::{
    filter, group_by, sort_by, AggregateReport, Dimension, LedgerSummary, ResourceFilter,
    SignalSummary, SortDirection, SortField,
};
use sr_risk::{RiskInputs, RiskReport, Terrain};

use crate::engine::AppState;
use crate::error::ApiError;

type SharedState = Arc<AppState>;

/// JSON response for `/health`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub cached_observations: usize,
    pub active_alerts: usize,
}

/// Body of `POST /alerts`.
#[derive(Debug, Deserialize)]
pub struct CreateAlertRequest {
    #[serde(alias = "type")]
    pub category: AlertCategory,
    pub message: String,
    pub location: String,
}

/// JSON response for `/notifications`.
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub unread: usize,
    pub items: Vec<NotificationView>,
}

/// A city or a coordinate pair.
#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Query parameters for `/risk`.
///
/// The location fields are repeated rather than flattened; flattened
/// numbers do not survive URL-encoded deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct RiskQuery {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub terrain: Option<String>,
    pub baseline: Option<f64>,
}

/// JSON response for `/risk`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponse {
    pub location: String,
    pub baseline_temperature: f64,
    #[serde(flatten)]
    pub report: RiskReport,
}

/// Query parameters for `/resources`.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub priority: Option<String>,
    pub location: Option<String>,
    /// Name substring.
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AggregateQuery {
    pub by: Option<String>,
}

/// Build the API router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/alerts", get(list_alerts_handler).post(create_alert_handler))
        .route("/alerts/:id", delete(remove_alert_handler))
        .route("/notifications", get(notifications_handler))
        .route("/notifications/:id/read", post(mark_read_handler))
        .route("/weather", get(weather_handler))
        .route("/risk", get(risk_handler))
        .route("/resources", get(resources_handler))
        .route("/resources/aggregate", get(aggregate_handler))
        .route("/resources/summary", get(resource_summary_handler))
        .route("/signals/summary", get(signal_summary_handler))
        .with_state(state)
}

/// Resolve the location parameters to a cache key.
fn query_key(city: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> Result<QueryKey, ApiError> {
    match (city, lat, lon) {
        (Some(city), None, None) => Ok(QueryKey::city(city)?),
        (None, Some(lat), Some(lon)) => Ok(QueryKey::coordinates(lat, lon)?),
        _ => Err(ApiError::bad_request(
            "expected either `city` or both `lat` and `lon`",
        )),
    }
}

/// Parse an optional query parameter with its `FromStr` impl.
fn parse_opt<T>(value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .transpose()
        .map_err(ApiError::bad_request)
}

/// `GET /health` — liveness plus a few gauges.
async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        cached_observations: state.gateway.cached_len(),
        active_alerts: state.alerts.active_alerts().len(),
    })
}

async fn list_alerts_handler(State(state): State<SharedState>) -> Json<Vec<Alert>> {
    Json(state.alerts.active_alerts())
}

/// `POST /alerts` — add an alert and its unread notification.
async fn create_alert_handler(
    State(state): State<SharedState>,
    Json(body): Json<CreateAlertRequest>,
) -> Result<(StatusCode, Json<Alert>), ApiError> {
    if body.message.trim().is_empty() {
        return Err(ApiError::bad_request("alert message must not be empty"));
    }
    let alert = state
        .alerts
        .add_alert(body.category, body.message, body.location);
    Ok((StatusCode::CREATED, Json(alert)))
}

/// `DELETE /alerts/:id` — idempotent; unknown ids also answer 204.
async fn remove_alert_handler(State(state): State<SharedState>, Path(id): Path<u64>) -> StatusCode {
    state.alerts.remove_alert(AlertId(id));
    StatusCode::NO_CONTENT
}

async fn notifications_handler(State(state): State<SharedState>) -> Json<NotificationsResponse> {
    let now = Utc::now();
    let items = state
        .alerts
        .notifications()
        .iter()
        .map(|n| n.view(now))
        .collect();
    Json(NotificationsResponse {
        unread: state.alerts.unread_count(),
        items,
    })
}

/// `POST /notifications/:id/read` — idempotent.
async fn mark_read_handler(State(state): State<SharedState>, Path(id): Path<u64>) -> StatusCode {
    state.alerts.mark_as_read(AlertId(id));
    StatusCode::NO_CONTENT
}

/// `GET /weather` — cached observation for a city or coordinates.
async fn weather_handler(
    State(state): State<SharedState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Observation>, ApiError> {
    let key = query_key(query.city.as_deref(), query.lat, query.lon)?;
    let observation = state.gateway.fetch(key).await?;
    Ok(Json(Observation::clone(&observation)))
}

/// `GET /risk` — per-hazard and combined assessments for one location.
async fn risk_handler(
    State(state): State<SharedState>,
    Query(query): Query<RiskQuery>,
) -> Result<Json<RiskResponse>, ApiError> {
    // Validate the cheap inputs before touching the provider.
    let terrain = Terrain::parse_or_default(query.terrain.as_deref())?;
    let key = query_key(query.city.as_deref(), query.lat, query.lon)?;
    let baseline = query.baseline.unwrap_or(state.baseline_temperature);

    let observation = state.gateway.fetch(key).await?;
    let inputs = RiskInputs::from_observation(&observation, baseline);
    let report = state.pipeline.evaluate(&inputs, terrain)?;

    tracing::debug!(
        location = %observation.location_label,
        %terrain,
        overall = %report.overall.risk,
        "risk evaluated"
    );

    Ok(Json(RiskResponse {
        location: observation.location_label.clone(),
        baseline_temperature: baseline,
        report,
    }))
}

/// `GET /resources` — filtered, optionally sorted ledger records.
async fn resources_handler(
    State(state): State<SharedState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Vec<ResourceRecord>>, ApiError> {
    let predicates = ResourceFilter {
        resource_type: parse_opt(query.resource_type.as_deref())?,
        priority: parse_opt(query.priority.as_deref())?,
        location: query.location.filter(|l| !l.trim().is_empty()),
        name_contains: query.q.filter(|q| !q.trim().is_empty()),
    };
    let field: Option<SortField> = parse_opt(query.sort.as_deref())?;
    let direction: SortDirection = parse_opt(query.dir.as_deref())?.unwrap_or_default();

    let mut rows = filter(&state.ledger.resources, &predicates);
    if let Some(field) = field {
        sort_by(&mut rows, field, direction);
    }
    Ok(Json(rows.into_iter().cloned().collect()))
}

/// `GET /resources/aggregate` — per-group totals, percentage and urgency.
async fn aggregate_handler(
    State(state): State<SharedState>,
    Query(query): Query<AggregateQuery>,
) -> Result<Json<BTreeMap<String, AggregateReport>>, ApiError> {
    let dimension: Dimension = parse_opt(query.by.as_deref())?.unwrap_or(Dimension::Type);
    let groups = group_by(&state.ledger.resources, dimension)
        .into_iter()
        .map(|(group, aggregate)| (group, aggregate.report()))
        .collect();
    Ok(Json(groups))
}

async fn resource_summary_handler(State(state): State<SharedState>) -> Json<LedgerSummary> {
    Json(state.ledger.summary())
}

async fn signal_summary_handler(State(state): State<SharedState>) -> Json<SignalSummary> {
    Json(state.ledger.signal_summary())
}

/// Build and run the HTTP server until `cancel` fires.
pub async fn run_server(
    state: SharedState,
    port: u16,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    Ok(())
}
