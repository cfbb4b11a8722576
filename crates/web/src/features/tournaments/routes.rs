use axum::{
    Router,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{
    apply_cut, finalize_tournament, generate_birthday, generate_majors, list_tournaments,
    sweep_activation, tournament_leaderboard, upsert_birthday_preferences,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_tournaments))
        .route("/majors/generate", post(generate_majors))
        .route("/birthday/generate", post(generate_birthday))
        .route("/birthday/preferences", put(upsert_birthday_preferences))
        .route("/:tournament_id/leaderboard", get(tournament_leaderboard))
        .route("/:tournament_id/cut", post(apply_cut))
        .route("/:tournament_id/finalize", post(finalize_tournament))
}

pub fn admin_routes() -> Router<Database> {
    Router::new().route("/sweep", post(sweep_activation))
}
