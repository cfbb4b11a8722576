use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::tournament::{
        AsOfRequest, BirthdayPreferencesRequest, CutResponse, FinalizeRequest,
        GenerateBirthdayRequest, GenerateMajorsRequest, SweepResponse,
        TournamentLeaderboardQuery, TournamentLeaderboardResponse, TournamentListQuery,
        TournamentResponse,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tournaments",
    params(TournamentListQuery),
    responses(
        (status = 200, description = "Tournaments for a group", body = Vec<TournamentResponse>)
    ),
    tag = "tournaments"
)]
pub async fn list_tournaments(
    State(db): State<Database>,
    Query(query): Query<TournamentListQuery>,
) -> Result<Response, WebError> {
    let tournaments = services::list_tournaments(db.pool(), query.group_id, query.year).await?;

    let response: Vec<TournamentResponse> =
        tournaments.into_iter().map(TournamentResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/majors/generate",
    request_body = GenerateMajorsRequest,
    responses(
        (status = 200, description = "Majors generated", body = Vec<TournamentResponse>),
        (status = 409, description = "Majors already generated for this year")
    ),
    tag = "tournaments"
)]
pub async fn generate_majors(
    State(db): State<Database>,
    Json(payload): Json<GenerateMajorsRequest>,
) -> Result<Response, WebError> {
    payload.validate()?;

    let tournaments = services::generate_majors(db.pool(), payload.group_id, payload.year).await?;

    let response: Vec<TournamentResponse> =
        tournaments.into_iter().map(TournamentResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/birthday/generate",
    request_body = GenerateBirthdayRequest,
    responses(
        (status = 200, description = "Birthday tournament generated, or skipped when the player has no birth date on file or has opted out"),
        (status = 409, description = "Already generated for this year")
    ),
    tag = "tournaments"
)]
pub async fn generate_birthday(
    State(db): State<Database>,
    Json(payload): Json<GenerateBirthdayRequest>,
) -> Result<Response, WebError> {
    payload.validate()?;

    let tournament =
        services::generate_birthday(db.pool(), payload.player_id, payload.group_id, payload.year)
            .await?;

    Ok(Json(serde_json::json!({
        "generated": tournament.is_some(),
        "tournament": tournament.map(TournamentResponse::from),
    }))
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{tournament_id}/leaderboard",
    params(
        ("tournament_id" = Uuid, Path, description = "Tournament ID"),
        TournamentLeaderboardQuery
    ),
    responses(
        (status = 200, description = "Tournament standings", body = TournamentLeaderboardResponse),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn tournament_leaderboard(
    State(db): State<Database>,
    Path(tournament_id): Path<Uuid>,
    Query(query): Query<TournamentLeaderboardQuery>,
) -> Result<Response, WebError> {
    let response = services::tournament_leaderboard(db.pool(), tournament_id, query.as_of).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{tournament_id}/cut",
    params(("tournament_id" = Uuid, Path, description = "Tournament ID")),
    request_body = AsOfRequest,
    responses(
        (status = 200, description = "Cut applied", body = CutResponse),
        (status = 400, description = "Cut day has not passed yet")
    ),
    tag = "tournaments"
)]
pub async fn apply_cut(
    State(db): State<Database>,
    Path(tournament_id): Path<Uuid>,
    Json(payload): Json<AsOfRequest>,
) -> Result<Response, WebError> {
    let advancing = services::apply_cut(db.pool(), tournament_id, payload.as_of).await?;

    Ok(Json(CutResponse {
        tournament_id,
        advancing,
    })
    .into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{tournament_id}/finalize",
    params(("tournament_id" = Uuid, Path, description = "Tournament ID")),
    request_body = FinalizeRequest,
    responses(
        (status = 200, description = "Final standings persisted"),
        (status = 400, description = "Tournament has not completed yet")
    ),
    tag = "tournaments"
)]
pub async fn finalize_tournament(
    State(db): State<Database>,
    Path(tournament_id): Path<Uuid>,
    Json(payload): Json<FinalizeRequest>,
) -> Result<Response, WebError> {
    payload.validate()?;

    let standings = services::finalize(
        db.pool(),
        tournament_id,
        payload.as_of,
        payload.winner_prize.as_deref(),
    )
    .await?;

    Ok(Json(standings).into_response())
}

#[utoipa::path(
    put,
    path = "/api/tournaments/birthday/preferences",
    request_body = BirthdayPreferencesRequest,
    responses(
        (status = 200, description = "Preferences stored")
    ),
    tag = "tournaments"
)]
pub async fn upsert_birthday_preferences(
    State(db): State<Database>,
    Json(payload): Json<BirthdayPreferencesRequest>,
) -> Result<Response, WebError> {
    payload.validate()?;

    let prefs = services::upsert_birthday_preferences(db.pool(), &payload).await?;

    Ok(Json(prefs).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/tournaments/sweep",
    request_body = AsOfRequest,
    responses(
        (status = 200, description = "Activation sweep completed", body = SweepResponse)
    ),
    tag = "tournaments"
)]
pub async fn sweep_activation(
    State(db): State<Database>,
    Json(payload): Json<AsOfRequest>,
) -> Result<Response, WebError> {
    let (activated, deactivated) = services::sweep_activation(db.pool(), payload.as_of).await?;

    Ok(Json(SweepResponse {
        activated,
        deactivated,
    })
    .into_response())
}
