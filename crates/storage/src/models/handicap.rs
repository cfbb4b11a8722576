use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A player's current rolling handicap within a group.
///
/// Recomputed from the most recent score records whenever a new score is
/// committed; never hand-edited.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HandicapRecord {
    pub player_id: Uuid,
    pub group_id: Uuid,
    /// Non-negative, one fractional digit.
    pub handicap: Decimal,
    pub games_played: i32,
    pub updated_at: chrono::NaiveDateTime,
}
