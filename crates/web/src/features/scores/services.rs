use sqlx::PgPool;
use storage::{
    dto::score::{OverrideScoreRequest, ScoreHistoryFilter, SubmitScoreRequest},
    error::Result,
    models::ScoreRecord,
    repository::score::ScoreRepository,
    services::scoring,
};

/// Submit today's puzzle result
pub async fn submit_score(pool: &PgPool, request: &SubmitScoreRequest) -> Result<ScoreRecord> {
    scoring::submit_score(pool, request).await
}

/// Replace a score through the administrative override path
pub async fn override_score(pool: &PgPool, request: &OverrideScoreRequest) -> Result<ScoreRecord> {
    scoring::override_score(pool, request).await
}

/// Page through a group's score history
pub async fn list_scores(
    pool: &PgPool,
    filter: &ScoreHistoryFilter,
) -> Result<(Vec<ScoreRecord>, i64)> {
    ScoreRepository::new(pool)
        .list_history(
            filter.group_id,
            filter.player_id,
            filter.pagination.offset() as i64,
            filter.pagination.limit() as i64,
        )
        .await
}
