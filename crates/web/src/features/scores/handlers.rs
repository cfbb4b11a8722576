use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::common::PaginatedResponse,
    dto::score::{OverrideScoreRequest, ScoreHistoryFilter, ScoreResponse, SubmitScoreRequest},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/scores",
    request_body = SubmitScoreRequest,
    responses(
        (status = 200, description = "Score recorded", body = ScoreResponse),
        (status = 400, description = "Invalid attempts or puzzle date"),
        (status = 409, description = "Score already submitted for this puzzle day")
    ),
    tag = "scores"
)]
pub async fn submit_score(
    State(db): State<Database>,
    Json(payload): Json<SubmitScoreRequest>,
) -> Result<Response, WebError> {
    payload.validate()?;

    let record = services::submit_score(db.pool(), &payload).await?;

    Ok(Json(ScoreResponse::from(record)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/scores",
    params(ScoreHistoryFilter),
    responses(
        (status = 200, description = "Score history, newest first", body = PaginatedResponse<ScoreResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "scores"
)]
pub async fn list_scores(
    State(db): State<Database>,
    Query(filter): Query<ScoreHistoryFilter>,
) -> Result<Response, WebError> {
    filter.validate().map_err(WebError::BadRequest)?;

    let (records, total_items) = services::list_scores(db.pool(), &filter).await?;

    let response = PaginatedResponse::new(
        records.into_iter().map(ScoreResponse::from).collect(),
        filter.pagination.page,
        filter.pagination.page_size,
        total_items,
    );

    Ok(Json(response).into_response())
}

#[utoipa::path(
    put,
    path = "/api/scores/override",
    request_body = OverrideScoreRequest,
    responses(
        (status = 200, description = "Score replaced", body = ScoreResponse),
        (status = 400, description = "Invalid attempts")
    ),
    tag = "scores"
)]
pub async fn override_score(
    State(db): State<Database>,
    Json(payload): Json<OverrideScoreRequest>,
) -> Result<Response, WebError> {
    payload.validate()?;

    let record = services::override_score(db.pool(), &payload).await?;

    Ok(Json(ScoreResponse::from(record)).into_response())
}
