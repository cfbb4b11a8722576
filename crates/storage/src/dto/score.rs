use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Request payload for submitting today's puzzle result.
///
/// `today` is supplied by the caller rather than read from the system clock,
/// so the deployment controls the puzzle-day time zone and tests stay
/// deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitScoreRequest {
    pub player_id: Uuid,
    pub group_id: Uuid,

    #[validate(range(min = 1, max = 7, message = "Attempts must be between 1 and 7"))]
    pub attempts: i16,

    pub puzzle_date: NaiveDate,
    pub puzzle_number: i32,
    pub today: NaiveDate,
}

/// Administrative replacement of a score for any date.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OverrideScoreRequest {
    pub player_id: Uuid,
    pub group_id: Uuid,

    #[validate(range(min = 1, max = 7, message = "Attempts must be between 1 and 7"))]
    pub attempts: i16,

    pub puzzle_date: NaiveDate,
    pub puzzle_number: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ScoreHistoryFilter {
    #[serde(flatten)]
    pub pagination: super::common::PaginationParams,
    pub group_id: Uuid,
    pub player_id: Option<Uuid>,
}

impl ScoreHistoryFilter {
    pub fn validate(&self) -> Result<(), String> {
        self.pagination.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreResponse {
    pub score_id: Uuid,
    pub player_id: Uuid,
    pub group_id: Uuid,
    pub puzzle_date: NaiveDate,
    pub puzzle_number: i32,
    pub attempts: i16,
    pub score_label: String,
    pub raw_score: i16,
    pub admin_submitted: bool,
}

impl From<crate::models::ScoreRecord> for ScoreResponse {
    fn from(record: crate::models::ScoreRecord) -> Self {
        Self {
            score_id: record.score_id,
            player_id: record.player_id,
            group_id: record.group_id,
            puzzle_date: record.puzzle_date,
            puzzle_number: record.puzzle_number,
            attempts: record.attempts,
            score_label: record.score_label,
            raw_score: record.raw_score,
            admin_submitted: record.admin_submitted,
        }
    }
}
