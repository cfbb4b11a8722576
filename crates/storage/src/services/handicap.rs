use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::HandicapRecord;
use crate::repository::handicap::HandicapRepository;
use crate::repository::score::ScoreRepository;

/// The rolling window the handicap looks back over.
pub const HISTORY_LIMIT: usize = 20;

/// How many of the most recent scores count toward the handicap, by
/// games played. USGA-style tiers.
fn best_n_for(games_played: i64) -> usize {
    match games_played {
        0..=2 => 0,
        3..=5 => 2,
        6..=9 => 3,
        10..=14 => 4,
        15..=19 => 6,
        _ => 8,
    }
}

/// Tiered best-N-of-last-20 handicap.
///
/// `recent_raw_scores` is the player's score history, newest first; only
/// the first `HISTORY_LIMIT` entries are considered. Fewer than three games
/// played is an insufficient sample and yields zero, and the result is
/// never negative.
pub fn compute_handicap(recent_raw_scores: &[i16], games_played: i64) -> Decimal {
    let n = best_n_for(games_played);
    if n == 0 {
        return Decimal::ZERO;
    }

    let mut window: Vec<i16> = recent_raw_scores
        .iter()
        .take(HISTORY_LIMIT)
        .copied()
        .collect();
    window.sort_unstable();

    let n = n.min(window.len());
    if n == 0 {
        return Decimal::ZERO;
    }

    let sum: i64 = window[..n].iter().map(|&s| s as i64).sum();
    let mean = Decimal::from(sum) / Decimal::from(n as i64);
    let handicap = (mean * Decimal::new(96, 2)).round_dp(1);

    handicap.max(Decimal::ZERO)
}

/// Recompute a player's handicap from their stored history and upsert it.
/// Called every time a score is committed for that (player, group).
pub async fn recompute_for_player(
    pool: &PgPool,
    player_id: Uuid,
    group_id: Uuid,
) -> Result<HandicapRecord> {
    let scores = ScoreRepository::new(pool);
    let games_played = scores.count_games(player_id, group_id).await?;
    let recent = scores
        .recent_raw_scores(player_id, group_id, HISTORY_LIMIT as i64)
        .await?;

    let handicap = compute_handicap(&recent, games_played);

    HandicapRepository::new(pool)
        .upsert(player_id, group_id, handicap, games_played as i32)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn fewer_than_three_games_is_zero() {
        assert_eq!(compute_handicap(&[], 0), Decimal::ZERO);
        assert_eq!(compute_handicap(&[2], 1), Decimal::ZERO);
        assert_eq!(compute_handicap(&[2, 3], 2), Decimal::ZERO);
    }

    #[test]
    fn best_two_of_small_sample() {
        // 4 games: best 2 of [1, 2, 3, 3] = [1, 2], mean 1.5, x0.96 = 1.44
        let handicap = compute_handicap(&[3, 2, 3, 1], 4);
        assert_eq!(handicap, dec("1.4"));
    }

    #[test]
    fn tier_boundaries() {
        // 6 games moves to best-3: [0, 1, 1], mean 2/3, x0.96 = 0.64
        let handicap = compute_handicap(&[1, 2, 0, 1, 2, 3], 6);
        assert_eq!(handicap, dec("0.6"));
    }

    #[test]
    fn negative_mean_floors_at_zero() {
        // 10 games, best 4 of [-3,-2,-1,0,0,1,1,2,2,3] = [-3,-2,-1,0],
        // mean -1.5, x0.96 negative, floored to zero.
        let history = [-3, -2, -1, 0, 0, 1, 1, 2, 2, 3];
        assert_eq!(compute_handicap(&history, 10), Decimal::ZERO);
    }

    #[test]
    fn never_negative_for_any_history() {
        let histories: [&[i16]; 4] = [
            &[-3; 20],
            &[-3, -2, -1, 0, 1],
            &[0; 10],
            &[-1, -1, -1, -1, -1, -1],
        ];
        for history in histories {
            assert!(compute_handicap(history, history.len() as i64) >= Decimal::ZERO);
        }
    }

    #[test]
    fn only_last_twenty_considered() {
        // Newest 20 are all bogeys; the ancient hole-in-ones beyond the
        // window must not drag the handicap down.
        let mut history = vec![1i16; 20];
        history.extend_from_slice(&[-3; 10]);
        let handicap = compute_handicap(&history, 30);
        // best 8 of twenty 1s: mean 1, x0.96 = 0.96 -> 1.0
        assert_eq!(handicap, dec("1.0"));
    }

    #[test]
    fn twenty_plus_games_uses_best_eight() {
        // 20 games: eight 0s then twelve 2s, newest first ordering does not
        // matter for the multiset. Best 8 = all zeros.
        let mut history = vec![0i16; 8];
        history.extend_from_slice(&[2; 12]);
        assert_eq!(compute_handicap(&history, 20), Decimal::ZERO);
    }

    #[test]
    fn deterministic_under_reordering_of_equals() {
        let a = compute_handicap(&[2, 1, 2, 1, 2, 1], 6);
        let b = compute_handicap(&[1, 2, 1, 2, 1, 2], 6);
        assert_eq!(a, b);
    }
}
