use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::leaderboard::ScoreWithPlayer;
use crate::dto::tournament::{
    TournamentLeaderboardResponse, TournamentResponse, TournamentStanding,
};
use crate::error::{Result, StorageError};
use crate::models::Tournament;
use crate::repository::score::ScoreRepository;
use crate::repository::tournament::TournamentRepository;
use crate::services::tournament_schedule::{self, TournamentDay, advantage_applies};

/// One round's contribution to a tournament total: the raw score, minus
/// the birthday advantage when this is the honoree playing an eligible
/// round, floored at the hole-in-one value.
pub fn adjusted_round_score(
    tournament: &Tournament,
    player_id: Uuid,
    round: u8,
    raw_score: i16,
) -> Decimal {
    let raw = Decimal::from(raw_score);

    let Some(honoree) = tournament.birthday_player_id else {
        return raw;
    };
    if honoree != player_id {
        return raw;
    }

    let mask = tournament
        .advantage_rounds
        .unwrap_or(tournament_schedule::DEFAULT_ADVANTAGE_ROUNDS);
    if !advantage_applies(mask, round) {
        return raw;
    }

    let advantage = tournament.stroke_advantage.unwrap_or(Decimal::ZERO);
    (raw - advantage).max(Decimal::from(-3))
}

/// Qualifying totals (rounds 1-4) per player, for the cut.
pub fn qualifying_totals(
    tournament: &Tournament,
    records: &[ScoreWithPlayer],
) -> Vec<(Uuid, Decimal)> {
    let mut totals: BTreeMap<Uuid, Decimal> = BTreeMap::new();

    for record in records {
        if let Some(TournamentDay::Qualifying(round)) =
            tournament_schedule::day_of(tournament.start_date, record.puzzle_date)
        {
            let score = adjusted_round_score(tournament, record.player_id, round, record.raw_score);
            *totals.entry(record.player_id).or_insert(Decimal::ZERO) += score;
        }
    }

    totals.into_iter().collect()
}

#[derive(Debug, Default)]
struct Accumulated {
    display_name: String,
    rounds_played: i64,
    total: Decimal,
    weekend_total: Decimal,
}

fn accumulate(
    tournament: &Tournament,
    records: &[ScoreWithPlayer],
    cut_applied: bool,
    made_cut: &HashSet<Uuid>,
) -> BTreeMap<Uuid, Accumulated> {
    let mut by_player: BTreeMap<Uuid, Accumulated> = BTreeMap::new();

    for record in records {
        let day = tournament_schedule::day_of(tournament.start_date, record.puzzle_date);
        let round = match day {
            Some(TournamentDay::Qualifying(round)) => round,
            Some(TournamentDay::Championship(round)) => {
                // Weekend rounds only count for players still in the field.
                if cut_applied && !made_cut.contains(&record.player_id) {
                    continue;
                }
                round
            }
            // Cut-day and out-of-window scores belong to the regular
            // stream, not to this tournament.
            Some(TournamentDay::CutDay) | None => continue,
        };

        let score = adjusted_round_score(tournament, record.player_id, round, record.raw_score);
        let entry = by_player.entry(record.player_id).or_default();
        if entry.display_name.is_empty() {
            entry.display_name = record.display_name.clone();
        }
        entry.rounds_played += 1;
        entry.total += score;
        if round > tournament_schedule::LAST_QUALIFYING_ROUND {
            entry.weekend_total += score;
        }
    }

    by_player
}

/// Rank a tournament's field by adjusted total, ascending. The winner flag
/// is set on position 1 only once the tournament has completed.
pub fn aggregate(
    tournament: &Tournament,
    records: &[ScoreWithPlayer],
    cut_applied: bool,
    made_cut: &HashSet<Uuid>,
    as_of: NaiveDate,
) -> Vec<TournamentStanding> {
    let accumulated = accumulate(tournament, records, cut_applied, made_cut);
    let completed = tournament.is_completed(as_of);

    let mut standings: Vec<TournamentStanding> = accumulated
        .into_iter()
        .map(|(player_id, acc)| TournamentStanding {
            player_id,
            display_name: acc.display_name,
            rounds_played: acc.rounds_played,
            total_score: acc.total,
            average_score: (acc.total / Decimal::from(acc.rounds_played)).round_dp(2),
            made_cut: cut_applied && made_cut.contains(&player_id),
            position: 0,
            is_winner: false,
        })
        .collect();

    standings.sort_by(|a, b| {
        a.total_score
            .cmp(&b.total_score)
            .then(a.player_id.cmp(&b.player_id))
    });

    for (index, standing) in standings.iter_mut().enumerate() {
        standing.position = index as i32 + 1;
        standing.is_winner = completed && index == 0;
    }

    standings
}

async fn load_field(
    pool: &PgPool,
    tournament_id: Uuid,
) -> Result<(Tournament, Vec<ScoreWithPlayer>, bool, HashSet<Uuid>)> {
    let repo = TournamentRepository::new(pool);
    let tournament = repo.find_by_id(tournament_id).await?;

    let records = ScoreRepository::new(pool)
        .scores_in_window(tournament.group_id, tournament.start_date, tournament.end_date)
        .await?;

    let participants = repo.participants(tournament_id).await?;
    let cut_applied = participants.iter().any(|p| p.cut_applied);
    let made_cut: HashSet<Uuid> = participants
        .iter()
        .filter(|p| p.made_cut)
        .map(|p| p.player_id)
        .collect();

    Ok((tournament, records, cut_applied, made_cut))
}

/// Standings for one tournament as of an explicit date.
pub async fn leaderboard(
    pool: &PgPool,
    tournament_id: Uuid,
    as_of: NaiveDate,
) -> Result<TournamentLeaderboardResponse> {
    let (tournament, records, cut_applied, made_cut) = load_field(pool, tournament_id).await?;

    let standings = aggregate(&tournament, &records, cut_applied, &made_cut, as_of);

    Ok(TournamentLeaderboardResponse {
        tournament: TournamentResponse::from(tournament),
        standings,
    })
}

/// Persist final standings for a completed tournament. The optional prize
/// text is stored on the winner; positions and totals on everyone.
pub async fn finalize(
    pool: &PgPool,
    tournament_id: Uuid,
    as_of: NaiveDate,
    winner_prize: Option<&str>,
) -> Result<Vec<TournamentStanding>> {
    let (tournament, records, cut_applied, made_cut) = load_field(pool, tournament_id).await?;

    if !tournament.is_completed(as_of) {
        return Err(StorageError::InvalidInput(format!(
            "Tournament does not end until {}",
            tournament.end_date
        )));
    }

    let accumulated = accumulate(&tournament, &records, cut_applied, &made_cut);
    let standings = aggregate(&tournament, &records, cut_applied, &made_cut, as_of);

    let repo = TournamentRepository::new(pool);
    for standing in &standings {
        let weekend_total = accumulated
            .get(&standing.player_id)
            .map(|acc| acc.weekend_total)
            .unwrap_or(Decimal::ZERO);
        let prize = if standing.is_winner { winner_prize } else { None };

        repo.record_final_standing(
            tournament_id,
            standing.player_id,
            weekend_total,
            standing.total_score,
            standing.position,
            prize,
        )
        .await?;
    }

    Ok(standings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TournamentType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn row(player: u128, name: &str, on: NaiveDate, raw: i16) -> ScoreWithPlayer {
        ScoreWithPlayer {
            player_id: Uuid::from_u128(player),
            display_name: name.to_string(),
            puzzle_date: on,
            raw_score: raw,
        }
    }

    fn birthday_tournament(honoree: u128) -> Tournament {
        Tournament {
            tournament_id: Uuid::from_u128(100),
            group_id: Uuid::from_u128(9),
            name: "Maya's Birthday Championship".to_string(),
            tournament_type: TournamentType::Birthday.as_str().to_string(),
            year: 2025,
            start_date: date(2025, 6, 16),
            end_date: date(2025, 6, 22),
            venue: None,
            is_active: true,
            birthday_player_id: Some(Uuid::from_u128(honoree)),
            stroke_advantage: Some(dec("0.5")),
            advantage_rounds: Some(tournament_schedule::DEFAULT_ADVANTAGE_ROUNDS),
            created_at: date(2025, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    fn major_tournament() -> Tournament {
        Tournament {
            birthday_player_id: None,
            stroke_advantage: None,
            advantage_rounds: None,
            name: "The Masters".to_string(),
            tournament_type: TournamentType::Major.as_str().to_string(),
            ..birthday_tournament(0)
        }
    }

    #[test]
    fn advantage_applies_only_to_honoree() {
        let t = birthday_tournament(1);

        assert_eq!(adjusted_round_score(&t, Uuid::from_u128(1), 1, 0), dec("-0.5"));
        assert_eq!(adjusted_round_score(&t, Uuid::from_u128(2), 1, 0), dec("0"));
    }

    #[test]
    fn advantage_respects_round_mask() {
        let mut t = birthday_tournament(1);
        t.advantage_rounds = Some(1 << 1); // Monday only

        assert_eq!(adjusted_round_score(&t, Uuid::from_u128(1), 1, 1), dec("0.5"));
        assert_eq!(adjusted_round_score(&t, Uuid::from_u128(1), 2, 1), dec("1"));
    }

    #[test]
    fn adjusted_score_floors_at_hole_in_one() {
        let mut t = birthday_tournament(1);
        t.stroke_advantage = Some(dec("2.0"));

        assert_eq!(adjusted_round_score(&t, Uuid::from_u128(1), 1, -3), dec("-3"));
    }

    #[test]
    fn major_rounds_are_unadjusted() {
        let t = major_tournament();
        assert_eq!(adjusted_round_score(&t, Uuid::from_u128(1), 1, 2), dec("2"));
    }

    #[test]
    fn qualifying_totals_ignore_weekend_and_outside_scores() {
        let t = major_tournament();
        let records = vec![
            row(1, "Alma", date(2025, 6, 16), 1), // round 1
            row(1, "Alma", date(2025, 6, 19), 2), // round 4
            row(1, "Alma", date(2025, 6, 21), -3), // Saturday, not qualifying
            row(1, "Alma", date(2025, 6, 23), -3), // outside the window
        ];

        let totals = qualifying_totals(&t, &records);

        assert_eq!(totals, vec![(Uuid::from_u128(1), dec("3"))]);
    }

    #[test]
    fn weekend_scores_dropped_for_players_missing_cut() {
        let t = major_tournament();
        let records = vec![
            row(1, "Alma", date(2025, 6, 16), 0),
            row(2, "Ben", date(2025, 6, 16), 3),
            row(1, "Alma", date(2025, 6, 21), 1), // Saturday
            row(2, "Ben", date(2025, 6, 21), -2), // Saturday, but Ben missed the cut
        ];
        let made_cut: HashSet<Uuid> = [Uuid::from_u128(1)].into();

        let standings = aggregate(&t, &records, true, &made_cut, date(2025, 6, 21));

        let ben = standings.iter().find(|s| s.player_id == Uuid::from_u128(2)).unwrap();
        assert_eq!(ben.rounds_played, 1);
        assert_eq!(ben.total_score, dec("3"));
        assert!(!ben.made_cut);

        let alma = standings.iter().find(|s| s.player_id == Uuid::from_u128(1)).unwrap();
        assert_eq!(alma.rounds_played, 2);
        assert_eq!(alma.total_score, dec("1"));
        assert!(alma.made_cut);
    }

    #[test]
    fn friday_scores_never_count() {
        let t = major_tournament();
        let records = vec![
            row(1, "Alma", date(2025, 6, 20), -3), // the cut day
        ];

        let standings = aggregate(&t, &records, false, &HashSet::new(), date(2025, 6, 20));
        assert!(standings.is_empty());
    }

    #[test]
    fn winner_flag_only_after_completion() {
        let t = major_tournament();
        let records = vec![
            row(1, "Alma", date(2025, 6, 16), -1),
            row(2, "Ben", date(2025, 6, 16), 2),
        ];

        let mid_week = aggregate(&t, &records, false, &HashSet::new(), date(2025, 6, 17));
        assert!(!mid_week[0].is_winner);

        let after = aggregate(&t, &records, false, &HashSet::new(), date(2025, 6, 23));
        assert!(after[0].is_winner);
        assert_eq!(after[0].player_id, Uuid::from_u128(1));
        assert_eq!(after[0].position, 1);
        assert!(!after[1].is_winner);
        assert_eq!(after[1].position, 2);
    }

    #[test]
    fn honoree_advantage_shifts_the_standings() {
        let t = birthday_tournament(2);
        let records = vec![
            row(1, "Alma", date(2025, 6, 16), 1),
            row(2, "Maya", date(2025, 6, 16), 1),
        ];

        let standings = aggregate(&t, &records, false, &HashSet::new(), date(2025, 6, 17));

        // Maya's 1 becomes 0.5 and leads Alma's unadjusted 1.
        assert_eq!(standings[0].player_id, Uuid::from_u128(2));
        assert_eq!(standings[0].total_score, dec("0.5"));
        assert_eq!(standings[1].total_score, dec("1"));
    }

    #[test]
    fn ties_order_by_player_id() {
        let t = major_tournament();
        let records = vec![
            row(2, "Ben", date(2025, 6, 16), 1),
            row(1, "Alma", date(2025, 6, 16), 1),
        ];

        let standings = aggregate(&t, &records, false, &HashSet::new(), date(2025, 6, 17));
        assert_eq!(standings[0].player_id, Uuid::from_u128(1));
    }
}
