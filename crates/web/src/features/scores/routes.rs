use axum::{
    Router,
    routing::{get, put},
};
use storage::Database;

use super::handlers::{list_scores, override_score, submit_score};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_scores).post(submit_score))
        .route("/override", put(override_score))
}
