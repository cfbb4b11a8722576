use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::score::{OverrideScoreRequest, SubmitScoreRequest};
use crate::error::{Result, StorageError};
use crate::models::ScoreRecord;
use crate::repository::score::ScoreRepository;
use crate::services::handicap;

/// Par for the daily puzzle: four attempts.
pub const PAR_ATTEMPTS: i16 = 4;

/// Golf-equivalent result of one puzzle. Raw scores are par-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GolfScore {
    HoleInOne,
    Eagle,
    Birdie,
    Par,
    Bogey,
    DoubleBogey,
    Failed,
}

impl GolfScore {
    /// Convert an attempt count (1-7, 7 meaning failed) into a golf score.
    /// Anything outside that range is a caller error, not something to clamp.
    pub fn from_attempts(attempts: i16) -> Result<GolfScore> {
        match attempts {
            1 => Ok(GolfScore::HoleInOne),
            2 => Ok(GolfScore::Eagle),
            3 => Ok(GolfScore::Birdie),
            4 => Ok(GolfScore::Par),
            5 => Ok(GolfScore::Bogey),
            6 => Ok(GolfScore::DoubleBogey),
            7 => Ok(GolfScore::Failed),
            other => Err(StorageError::InvalidInput(format!(
                "Attempts must be between 1 and 7, got {other}"
            ))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GolfScore::HoleInOne => "Hole-in-One",
            GolfScore::Eagle => "Eagle",
            GolfScore::Birdie => "Birdie",
            GolfScore::Par => "Par",
            GolfScore::Bogey => "Bogey",
            GolfScore::DoubleBogey => "Double Bogey",
            GolfScore::Failed => "Failed",
        }
    }

    /// Par-relative value, -3 for a hole-in-one through +3 for a fail.
    pub fn raw_score(&self) -> i16 {
        match self {
            GolfScore::HoleInOne => -3,
            GolfScore::Eagle => -2,
            GolfScore::Birdie => -1,
            GolfScore::Par => 0,
            GolfScore::Bogey => 1,
            GolfScore::DoubleBogey => 2,
            GolfScore::Failed => 3,
        }
    }
}

/// A single round's net score: raw minus handicap, one decimal, never
/// better than the hole-in-one floor of -3.
pub fn net_score(raw_score: i16, handicap: Decimal) -> Decimal {
    let floor = Decimal::from(-3);
    let net = (Decimal::from(raw_score) - handicap).round_dp(1);
    net.max(floor)
}

/// Submit a score through the normal daily path.
///
/// The puzzle date must be the caller-supplied "today" (no back-dating);
/// duplicate submission comes back as `AlreadyExists`, which callers show
/// as "you already submitted today". A committed score refreshes the
/// player's rolling handicap.
pub async fn submit_score(pool: &PgPool, request: &SubmitScoreRequest) -> Result<ScoreRecord> {
    let score = GolfScore::from_attempts(request.attempts)?;

    if request.puzzle_date != request.today {
        return Err(StorageError::InvalidInput(format!(
            "Puzzle date {} is not the current puzzle day {}",
            request.puzzle_date, request.today
        )));
    }

    let repo = ScoreRepository::new(pool);

    // The unique key remains the authoritative guard; this check just gives
    // the common case a friendly answer without hitting the constraint.
    if repo
        .find_by_player_date(request.player_id, request.group_id, request.puzzle_date)
        .await?
        .is_some()
    {
        return Err(StorageError::AlreadyExists(
            "Score already submitted for this puzzle day".to_string(),
        ));
    }

    let record = repo
        .insert(
            request.player_id,
            request.group_id,
            request.puzzle_date,
            request.puzzle_number,
            request.attempts,
            score.label(),
            score.raw_score(),
        )
        .await?;

    handicap::recompute_for_player(pool, request.player_id, request.group_id).await?;

    Ok(record)
}

/// Administrative override: replace (or create) a score for any date and
/// mark it admin-submitted. Also refreshes the handicap.
pub async fn override_score(pool: &PgPool, request: &OverrideScoreRequest) -> Result<ScoreRecord> {
    let score = GolfScore::from_attempts(request.attempts)?;

    let repo = ScoreRepository::new(pool);
    let record = repo
        .upsert_override(
            request.player_id,
            request.group_id,
            request.puzzle_date,
            request.puzzle_number,
            request.attempts,
            score.label(),
            score.raw_score(),
        )
        .await?;

    handicap::recompute_for_player(pool, request.player_id, request.group_id).await?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hole_in_one_conversion() {
        let score = GolfScore::from_attempts(1).unwrap();
        assert_eq!(score.label(), "Hole-in-One");
        assert_eq!(score.raw_score(), -3);
    }

    #[test]
    fn par_conversion() {
        let score = GolfScore::from_attempts(4).unwrap();
        assert_eq!(score.label(), "Par");
        assert_eq!(score.raw_score(), 0);
    }

    #[test]
    fn failed_conversion() {
        let score = GolfScore::from_attempts(7).unwrap();
        assert_eq!(score.label(), "Failed");
        assert_eq!(score.raw_score(), 3);
    }

    #[test]
    fn raw_score_monotonic_in_attempts() {
        let raws: Vec<i16> = (1..=7)
            .map(|a| GolfScore::from_attempts(a).unwrap().raw_score())
            .collect();
        assert!(raws.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn out_of_range_attempts_rejected() {
        assert!(matches!(
            GolfScore::from_attempts(0),
            Err(StorageError::InvalidInput(_))
        ));
        assert!(matches!(
            GolfScore::from_attempts(8),
            Err(StorageError::InvalidInput(_))
        ));
        assert!(matches!(
            GolfScore::from_attempts(-1),
            Err(StorageError::InvalidInput(_))
        ));
    }

    #[test]
    fn net_score_subtracts_handicap() {
        let net = net_score(1, Decimal::new(15, 1));
        assert_eq!(net, Decimal::new(-5, 1));
    }

    #[test]
    fn net_score_capped_at_hole_in_one_floor() {
        let net = net_score(-3, Decimal::new(22, 1));
        assert_eq!(net, Decimal::from(-3));
    }
}
