use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::routes::players::DeletedResponse;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{MatchId, PlayerId};

#[derive(Debug, Deserialize)]
pub struct ReportMatchRequest {
    pub winner: PlayerId,
    pub loser: PlayerId,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub id: MatchId,
    pub winner: PlayerId,
    pub loser: PlayerId,
}

pub async fn report_match(
    State(state): State<AppState>,
    payload: Result<Json<ReportMatchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MatchResponse>), ApiError> {
    let Json(request) = payload?;
    let record = state
        .tournament
        .report_match(request.winner, request.loser)?;
    Ok((
        StatusCode::CREATED,
        Json(MatchResponse {
            id: record.id,
            winner: record.winner,
            loser: record.loser,
        }),
    ))
}

pub async fn delete_matches(
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.tournament.delete_matches()?;
    Ok(Json(DeletedResponse { deleted }))
}
