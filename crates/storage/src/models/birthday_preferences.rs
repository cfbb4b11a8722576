use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Per (player, group) opt-in settings for birthday tournaments.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BirthdayPreferences {
    pub player_id: Uuid,
    pub group_id: Uuid,
    pub enabled: bool,
    pub custom_name: Option<String>,
    /// Shift from the birthday week, in whole weeks; may be negative.
    pub week_offset: i32,
    pub stroke_advantage: Option<Decimal>,
}
