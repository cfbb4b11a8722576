use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Player {
    pub player_id: Uuid,
    pub display_name: String,
    /// Month of birth (1-12), if the player has shared it.
    pub birth_month: Option<i16>,
    /// Day of birth (1-31), if the player has shared it.
    pub birth_day: Option<i16>,
    pub created_at: chrono::NaiveDateTime,
}

impl Player {
    /// Birth month and day together, when both are on file.
    pub fn birth_date(&self) -> Option<(u32, u32)> {
        match (self.birth_month, self.birth_day) {
            (Some(m), Some(d)) => Some((m as u32, d as u32)),
            _ => None,
        }
    }
}
