use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::leaderboard::{
    LeaderboardMode, LeaderboardQuery, LeaderboardResponse, PlayerSummary, ScoreWithPlayer,
};
use crate::error::{Result, StorageError};
use crate::repository::handicap::HandicapRepository;
use crate::repository::score::ScoreRepository;
use crate::services::scoring;

/// Group a window of score rows into per-player summaries and rank them.
///
/// Lower is better for every metric, golf convention. Players with no
/// records in the window simply do not appear. Ties sort by player id so
/// repeated renders agree.
pub fn aggregate(
    records: &[ScoreWithPlayer],
    handicaps: &HashMap<Uuid, Decimal>,
    mode: LeaderboardMode,
) -> Vec<PlayerSummary> {
    let mut by_player: BTreeMap<Uuid, Vec<&ScoreWithPlayer>> = BTreeMap::new();
    for record in records {
        by_player.entry(record.player_id).or_default().push(record);
    }

    let mut summaries: Vec<PlayerSummary> = by_player
        .into_iter()
        .map(|(player_id, rounds)| {
            let games_played = rounds.len() as i64;
            let games = Decimal::from(games_played);
            let handicap = handicaps.get(&player_id).copied().unwrap_or(Decimal::ZERO);

            let total_raw: i64 = rounds.iter().map(|r| r.raw_score as i64).sum();
            let avg_raw = (Decimal::from(total_raw) / games).round_dp(2);

            let total_net: Decimal = rounds
                .iter()
                .map(|r| scoring::net_score(r.raw_score, handicap))
                .sum();
            let avg_net = (total_net / games).round_dp(2);

            PlayerSummary {
                player_id,
                display_name: rounds[0].display_name.clone(),
                games_played,
                avg_raw,
                avg_net,
                // Raw scores are already par-relative, so the cumulative
                // to-par view is a plain sum.
                total_to_par: total_raw,
                handicap,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        let (ka, kb) = match mode {
            LeaderboardMode::Net => (a.avg_net, b.avg_net),
            LeaderboardMode::Raw => (a.avg_raw, b.avg_raw),
            LeaderboardMode::TotalToPar => {
                (Decimal::from(a.total_to_par), Decimal::from(b.total_to_par))
            }
        };
        ka.cmp(&kb).then(a.player_id.cmp(&b.player_id))
    });

    summaries
}

/// First and last day of the calendar month containing `date`.
pub fn month_bounds(date: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .ok_or_else(|| StorageError::InvalidInput(format!("Malformed date: {date}")))?;

    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .ok_or_else(|| StorageError::InvalidInput(format!("Malformed date: {date}")))?;

    Ok((first, next_month - Duration::days(1)))
}

/// Monthly or all-time leaderboard for a group.
pub async fn group_leaderboard(
    pool: &PgPool,
    group_id: Uuid,
    query: &LeaderboardQuery,
) -> Result<LeaderboardResponse> {
    let mode = LeaderboardMode::parse(&query.mode)?;

    let scores = ScoreRepository::new(pool);
    let (records, window) = match query.month {
        Some(month) => {
            let (start, end) = month_bounds(month)?;
            let records = scores.scores_in_window(group_id, start, end).await?;
            (records, Some((start, end)))
        }
        None => (scores.all_scores(group_id).await?, None),
    };

    let handicaps: HashMap<Uuid, Decimal> = HandicapRepository::new(pool)
        .for_group(group_id)
        .await?
        .into_iter()
        .map(|h| (h.player_id, h.handicap))
        .collect();

    let standings = aggregate(&records, &handicaps, mode);

    Ok(LeaderboardResponse {
        group_id,
        mode: query.mode.clone(),
        window_start: window.map(|(s, _)| s),
        window_end: window.map(|(_, e)| e),
        standings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(player: u128, name: &str, day: u32, raw: i16) -> ScoreWithPlayer {
        ScoreWithPlayer {
            player_id: Uuid::from_u128(player),
            display_name: name.to_string(),
            puzzle_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            raw_score: raw,
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn averages_and_totals_per_player() {
        let records = vec![
            row(1, "Alma", 1, -1),
            row(1, "Alma", 2, 1),
            row(2, "Ben", 1, 2),
        ];
        let handicaps = HashMap::new();

        let standings = aggregate(&records, &handicaps, LeaderboardMode::Raw);

        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].display_name, "Alma");
        assert_eq!(standings[0].games_played, 2);
        assert_eq!(standings[0].avg_raw, dec("0.00"));
        assert_eq!(standings[0].total_to_par, 0);
        assert_eq!(standings[1].avg_raw, dec("2.00"));
    }

    #[test]
    fn net_mode_applies_handicap_per_round() {
        let records = vec![row(1, "Alma", 1, 2), row(2, "Ben", 1, 2)];
        let mut handicaps = HashMap::new();
        handicaps.insert(Uuid::from_u128(1), dec("1.5"));

        let standings = aggregate(&records, &handicaps, LeaderboardMode::Net);

        // Alma nets 0.5, Ben nets 2.0; Alma leads.
        assert_eq!(standings[0].player_id, Uuid::from_u128(1));
        assert_eq!(standings[0].avg_net, dec("0.50"));
        assert_eq!(standings[1].avg_net, dec("2.00"));
    }

    #[test]
    fn lower_metric_never_ranks_below_higher() {
        let records = vec![
            row(1, "Alma", 1, 3),
            row(2, "Ben", 1, 0),
            row(3, "Cleo", 1, -2),
        ];
        let standings = aggregate(&records, &HashMap::new(), LeaderboardMode::Raw);
        let avgs: Vec<Decimal> = standings.iter().map(|s| s.avg_raw).collect();
        assert!(avgs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn players_without_records_are_absent() {
        let records = vec![row(1, "Alma", 1, 0)];
        let mut handicaps = HashMap::new();
        // Ben has a handicap on file but no rounds this window.
        handicaps.insert(Uuid::from_u128(2), dec("2.0"));

        let standings = aggregate(&records, &handicaps, LeaderboardMode::Net);
        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0].player_id, Uuid::from_u128(1));
    }

    #[test]
    fn ties_break_by_player_id() {
        let records = vec![row(2, "Ben", 1, 1), row(1, "Alma", 1, 1)];
        let standings = aggregate(&records, &HashMap::new(), LeaderboardMode::Raw);
        assert_eq!(standings[0].player_id, Uuid::from_u128(1));
        assert_eq!(standings[1].player_id, Uuid::from_u128(2));
    }

    #[test]
    fn month_bounds_cover_the_month() {
        let (start, end) = month_bounds(NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());

        let (start, end) = month_bounds(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }
}
