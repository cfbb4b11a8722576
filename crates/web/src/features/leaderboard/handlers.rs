use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::leaderboard::{HandicapResponse, LeaderboardQuery, LeaderboardResponse},
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/leaderboard",
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        LeaderboardQuery
    ),
    responses(
        (status = 200, description = "Group leaderboard", body = LeaderboardResponse),
        (status = 400, description = "Unknown leaderboard mode")
    ),
    tag = "leaderboard"
)]
pub async fn get_group_leaderboard(
    State(db): State<Database>,
    Path(group_id): Path<Uuid>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Response, WebError> {
    let response = services::group_leaderboard(db.pool(), group_id, &query).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/handicaps/{player_id}",
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("player_id" = Uuid, Path, description = "Player ID")
    ),
    responses(
        (status = 200, description = "Current handicap", body = HandicapResponse),
        (status = 404, description = "No handicap on file")
    ),
    tag = "leaderboard"
)]
pub async fn get_handicap(
    State(db): State<Database>,
    Path((group_id, player_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let record = services::get_handicap(db.pool(), group_id, player_id).await?;

    Ok(Json(HandicapResponse::from(record)).into_response())
}
