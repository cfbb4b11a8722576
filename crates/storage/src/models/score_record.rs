use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One player's result for one puzzle on one date within one group.
///
/// `raw_score` is always par-relative (-3..=+3, par is 4 attempts); the
/// inbound attempt count is converted once at submission and never stored
/// as the score itself.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScoreRecord {
    pub score_id: Uuid,
    pub player_id: Uuid,
    pub group_id: Uuid,
    pub puzzle_date: NaiveDate,
    pub puzzle_number: i32,
    /// Attempts used (1-7, 7 meaning the puzzle was failed).
    pub attempts: i16,
    pub score_label: String,
    pub raw_score: i16,
    pub admin_submitted: bool,
    pub created_at: chrono::NaiveDateTime,
}
