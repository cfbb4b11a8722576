use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{get_group_leaderboard, get_handicap};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/:group_id/leaderboard", get(get_group_leaderboard))
        .route("/:group_id/handicaps/:player_id", get(get_handicap))
}
