use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A named, dated competition window: Monday start, Sunday end.
///
/// Rounds 1-4 (Mon-Thu) are qualifying, Friday is the cut day with no play,
/// rounds 5-6 (Sat-Sun) are the championship weekend.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tournament {
    pub tournament_id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    /// `"major"` or `"birthday"`.
    pub tournament_type: String,
    pub year: i32,
    pub start_date: NaiveDate,
    /// Always `start_date + 6` days.
    pub end_date: NaiveDate,
    pub venue: Option<String>,
    pub is_active: bool,
    /// The honoree, for birthday tournaments.
    pub birthday_player_id: Option<Uuid>,
    /// Strokes deducted from the honoree's eligible rounds.
    pub stroke_advantage: Option<Decimal>,
    /// Bitmask of round ids (1-6) the stroke advantage applies to.
    pub advantage_rounds: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
}

/// A tournament as produced by the schedule generators, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTournament {
    pub group_id: Uuid,
    pub name: String,
    pub tournament_type: TournamentType,
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub venue: Option<String>,
    pub birthday_player_id: Option<Uuid>,
    pub stroke_advantage: Option<Decimal>,
    pub advantage_rounds: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentType {
    Major,
    Birthday,
}

impl TournamentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentType::Major => "major",
            TournamentType::Birthday => "birthday",
        }
    }

    pub fn parse(s: &str) -> Option<TournamentType> {
        match s {
            "major" => Some(TournamentType::Major),
            "birthday" => Some(TournamentType::Birthday),
            _ => None,
        }
    }
}

impl Tournament {
    pub fn is_major(&self) -> bool {
        self.tournament_type == TournamentType::Major.as_str()
    }

    pub fn is_birthday(&self) -> bool {
        self.tournament_type == TournamentType::Birthday.as_str()
    }

    /// Whether `date` falls inside the tournament window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// The tournament has ended as of `date`.
    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.end_date < date
    }
}
