use sqlx::PgPool;
use storage::{
    dto::leaderboard::{LeaderboardQuery, LeaderboardResponse},
    error::Result,
    models::HandicapRecord,
    repository::handicap::HandicapRepository,
    services::leaderboard,
};
use uuid::Uuid;

/// Monthly or all-time group leaderboard
pub async fn group_leaderboard(
    pool: &PgPool,
    group_id: Uuid,
    query: &LeaderboardQuery,
) -> Result<LeaderboardResponse> {
    leaderboard::group_leaderboard(pool, group_id, query).await
}

/// A player's current handicap within a group
pub async fn get_handicap(
    pool: &PgPool,
    group_id: Uuid,
    player_id: Uuid,
) -> Result<HandicapRecord> {
    HandicapRepository::new(pool).find(player_id, group_id).await
}
