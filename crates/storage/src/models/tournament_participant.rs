use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Per-tournament standing for one player.
///
/// `made_cut` is written once, when the cut is applied after the Friday
/// boundary; `cut_applied` marks that write so the flag is never revised.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TournamentParticipant {
    pub participant_id: Uuid,
    pub tournament_id: Uuid,
    pub player_id: Uuid,
    pub qualifying_total: Decimal,
    pub made_cut: bool,
    pub cut_applied: bool,
    pub weekend_total: Decimal,
    pub final_total: Decimal,
    pub final_position: Option<i32>,
    pub prize: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}
