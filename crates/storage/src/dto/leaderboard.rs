use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{Result, StorageError};

/// Which metric a leaderboard is ranked by. Lower is always better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardMode {
    /// Average of per-round net scores (raw minus handicap).
    Net,
    /// Average raw score.
    Raw,
    /// Cumulative strokes relative to par, ignoring handicaps.
    TotalToPar,
}

impl LeaderboardMode {
    pub fn parse(s: &str) -> Result<LeaderboardMode> {
        match s {
            "net" => Ok(LeaderboardMode::Net),
            "raw" => Ok(LeaderboardMode::Raw),
            "to_par" => Ok(LeaderboardMode::TotalToPar),
            other => Err(StorageError::InvalidInput(format!(
                "Unknown leaderboard mode: {other}"
            ))),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LeaderboardQuery {
    /// `net`, `raw` or `to_par`.
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Restrict to the calendar month containing this date; all-time when absent.
    pub month: Option<NaiveDate>,
}

fn default_mode() -> String {
    "net".to_string()
}

/// One score row joined with its player, the unit of leaderboard math.
#[derive(Debug, Clone, FromRow)]
pub struct ScoreWithPlayer {
    pub player_id: Uuid,
    pub display_name: String,
    pub puzzle_date: NaiveDate,
    pub raw_score: i16,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSummary {
    pub player_id: Uuid,
    pub display_name: String,
    pub games_played: i64,
    pub avg_raw: Decimal,
    pub avg_net: Decimal,
    pub total_to_par: i64,
    pub handicap: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub group_id: Uuid,
    pub mode: String,
    /// First day of the window, absent for all-time boards.
    pub window_start: Option<NaiveDate>,
    pub window_end: Option<NaiveDate>,
    pub standings: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HandicapResponse {
    pub player_id: Uuid,
    pub group_id: Uuid,
    pub handicap: Decimal,
    pub games_played: i32,
}

impl From<crate::models::HandicapRecord> for HandicapResponse {
    fn from(record: crate::models::HandicapRecord) -> Self {
        Self {
            player_id: record.player_id,
            group_id: record.group_id,
            handicap: record.handicap,
            games_played: record.games_played,
        }
    }
}
