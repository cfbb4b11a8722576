use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenerateMajorsRequest {
    pub group_id: Uuid,

    #[validate(range(min = 2020, max = 2100, message = "Year out of range"))]
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenerateBirthdayRequest {
    pub player_id: Uuid,
    pub group_id: Uuid,

    #[validate(range(min = 2020, max = 2100, message = "Year out of range"))]
    pub year: i32,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct TournamentListQuery {
    pub group_id: Uuid,
    pub year: Option<i32>,
}

/// As-of date for the daily activation sweep and for the cut.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AsOfRequest {
    pub as_of: NaiveDate,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct TournamentLeaderboardQuery {
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct FinalizeRequest {
    pub as_of: NaiveDate,

    #[validate(length(max = 255, message = "Prize text too long"))]
    pub winner_prize: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TournamentResponse {
    pub tournament_id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub tournament_type: String,
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub venue: Option<String>,
    pub is_active: bool,
    pub birthday_player_id: Option<Uuid>,
    pub stroke_advantage: Option<Decimal>,
}

impl From<crate::models::Tournament> for TournamentResponse {
    fn from(t: crate::models::Tournament) -> Self {
        Self {
            tournament_id: t.tournament_id,
            group_id: t.group_id,
            name: t.name,
            tournament_type: t.tournament_type,
            year: t.year,
            start_date: t.start_date,
            end_date: t.end_date,
            venue: t.venue,
            is_active: t.is_active,
            birthday_player_id: t.birthday_player_id,
            stroke_advantage: t.stroke_advantage,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TournamentStanding {
    pub player_id: Uuid,
    pub display_name: String,
    pub rounds_played: i64,
    pub total_score: Decimal,
    pub average_score: Decimal,
    pub made_cut: bool,
    pub position: i32,
    pub is_winner: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TournamentLeaderboardResponse {
    pub tournament: TournamentResponse,
    pub standings: Vec<TournamentStanding>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SweepResponse {
    pub activated: u64,
    pub deactivated: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CutResponse {
    pub tournament_id: Uuid,
    pub advancing: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BirthdayPreferencesRequest {
    pub player_id: Uuid,
    pub group_id: Uuid,
    pub enabled: bool,

    #[validate(length(max = 255, message = "Name too long"))]
    pub custom_name: Option<String>,

    #[validate(range(min = -12, max = 12, message = "Week offset out of range"))]
    #[serde(default)]
    pub week_offset: i32,

    pub stroke_advantage: Option<Decimal>,
}
