//! API error type and its HTTP mapping.
//!
//! Gateway and risk errors pass through unchanged; the status code is chosen
//! here so handlers can use `?` on library calls.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use sr_gateway::GatewayError;
use sr_risk::RiskError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed query parameter (400).
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Risk(#[from] RiskError),
}

impl ApiError {
    pub fn bad_request(message: impl fmt::Display) -> Self {
        Self::BadRequest(message.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Gateway(GatewayError::InvalidCoordinates { .. }) => StatusCode::BAD_REQUEST,
            Self::Gateway(GatewayError::LocationNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Gateway(GatewayError::ProviderUnavailable(_)) => StatusCode::BAD_GATEWAY,
            Self::Risk(RiskError::UnknownTerrain(_)) => StatusCode::BAD_REQUEST,
            Self::Risk(RiskError::EmptyAssessments) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for the response body.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Gateway(GatewayError::InvalidCoordinates { .. }) => "INVALID_COORDINATES",
            Self::Gateway(GatewayError::LocationNotFound(_)) => "LOCATION_NOT_FOUND",
            Self::Gateway(GatewayError::ProviderUnavailable(_)) => "PROVIDER_UNAVAILABLE",
            Self::Risk(RiskError::UnknownTerrain(_)) => "UNKNOWN_TERRAIN",
            Self::Risk(RiskError::EmptyAssessments) => "INTERNAL_ERROR",
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        let body = ErrorResponse {
            code: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
