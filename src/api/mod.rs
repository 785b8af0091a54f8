//! REST API endpoints.
//!
//! Axum-based HTTP API for registering players, reporting results,
//! and reading standings and next-round pairings.

pub mod routes;
pub mod state;

use axum::{
    extract::rejection::JsonRejection,
    http::{header::InvalidHeaderValue, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

use crate::tournament::TournamentError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::StoreUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            }
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        match err {
            TournamentError::StoreUnavailable(e) => ApiError::StoreUnavailable(e.to_string()),
            e @ (TournamentError::InsufficientPlayers { .. }
            | TournamentError::OddPlayerCount { .. }) => ApiError::Conflict(e.to_string()),
            e @ (TournamentError::InvalidMatchReport(_) | TournamentError::EmptyPlayerName) => {
                ApiError::BadRequest(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/players/count", get(routes::players::count_players))
        .route(
            "/api/players",
            post(routes::players::register_player).delete(routes::players::delete_players),
        )
        .route(
            "/api/matches",
            post(routes::matches::report_match).delete(routes::matches::delete_matches),
        )
        .route("/api/standings", get(routes::standings::standings))
        .route("/api/pairings", get(routes::standings::pairings))
        .with_state(state)
}

/// CORS layer for the configured origin. `*` allows any origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        Ok(layer.allow_origin(Any))
    } else {
        Ok(layer.allow_origin(origin.parse::<HeaderValue>()?))
    }
}
