use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Pairing, Standing};

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub standings: Vec<Standing>,
}

#[derive(Debug, Serialize)]
pub struct PairingsResponse {
    pub pairings: Vec<Pairing>,
}

pub async fn standings(State(state): State<AppState>) -> Result<Json<StandingsResponse>, ApiError> {
    let standings = state.tournament.player_standings()?;
    Ok(Json(StandingsResponse { standings }))
}

pub async fn pairings(State(state): State<AppState>) -> Result<Json<PairingsResponse>, ApiError> {
    let pairings = state.tournament.swiss_pairings()?;
    Ok(Json(PairingsResponse { pairings }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::api::test_support::{send, setup_test_state};
    use crate::models::PlayerId;
    use axum::http::{Method, StatusCode};

    fn four_player_round() -> (AppState, Vec<PlayerId>) {
        let state = setup_test_state();
        let ids: Vec<PlayerId> = ["Bruno Walton", "Boots O'Neal", "Cathy Burton", "Diane Grant"]
            .iter()
            .map(|name| state.tournament.register_player(name).unwrap().id)
            .collect();
        state.tournament.report_match(ids[0], ids[1]).unwrap();
        state.tournament.report_match(ids[2], ids[3]).unwrap();
        (state, ids)
    }

    #[tokio::test]
    async fn test_standings_endpoint() {
        let (state, _) = four_player_round();
        let (status, json) = send(build_router(state), Method::GET, "/api/standings", None).await;

        assert_eq!(status, StatusCode::OK);
        let rows = json["standings"].as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["id"], 1);
        assert_eq!(rows[0]["name"], "Bruno Walton");
        assert_eq!(rows[0]["wins"], 1);
        assert_eq!(rows[0]["matches"], 1);
        assert_eq!(rows[1]["id"], 3);
        assert_eq!(rows[3]["wins"], 0);
        assert_eq!(rows[3]["matches"], 1);
    }

    #[tokio::test]
    async fn test_pairings_endpoint() {
        let (state, _) = four_player_round();
        let (status, json) = send(build_router(state), Method::GET, "/api/pairings", None).await;

        assert_eq!(status, StatusCode::OK);
        let pairings = json["pairings"].as_array().unwrap();
        assert_eq!(pairings.len(), 2);
        assert_eq!(pairings[0]["table"], 1);
        assert_eq!(pairings[0]["id1"], 1);
        assert_eq!(pairings[0]["id2"], 3);
        assert_eq!(pairings[1]["id1"], 2);
        assert_eq!(pairings[1]["name2"], "Diane Grant");
    }

    #[tokio::test]
    async fn test_pairings_without_players_is_conflict() {
        let app = build_router(setup_test_state());
        let (status, json) = send(app, Method::GET, "/api/pairings", None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_pairings_odd_count_is_conflict() {
        let state = setup_test_state();
        for name in ["A", "B", "C"] {
            state.tournament.register_player(name).unwrap();
        }

        let (status, _) = send(build_router(state), Method::GET, "/api/pairings", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
