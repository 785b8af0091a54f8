use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::PlayerId;

#[derive(Debug, Deserialize)]
pub struct RegisterPlayerRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: usize,
}

pub async fn register_player(
    State(state): State<AppState>,
    payload: Result<Json<RegisterPlayerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlayerResponse>), ApiError> {
    let Json(request) = payload?;
    let player = state.tournament.register_player(&request.name)?;
    Ok((
        StatusCode::CREATED,
        Json(PlayerResponse {
            id: player.id,
            name: player.name,
        }),
    ))
}

pub async fn count_players(State(state): State<AppState>) -> Result<Json<CountResponse>, ApiError> {
    let count = state.tournament.count_players()?;
    Ok(Json(CountResponse { count }))
}

pub async fn delete_players(
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.tournament.delete_players()?;
    Ok(Json(DeletedResponse { deleted }))
}
