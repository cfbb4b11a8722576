use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{
    BirthdayPreferences, MajorTemplate, NewTournament, Player, Tournament, TournamentType,
};
use crate::repository::player::PlayerRepository;
use crate::repository::score::ScoreRepository;
use crate::repository::tournament::TournamentRepository;
use crate::services::tournament_leaderboard;

/// Round ids: 1-4 qualify Monday through Thursday, 5 and 6 are the
/// championship Saturday and Sunday. Friday is the cut day and has no id.
pub const FIRST_QUALIFYING_ROUND: u8 = 1;
pub const LAST_QUALIFYING_ROUND: u8 = 4;
pub const SATURDAY_ROUND: u8 = 5;
pub const SUNDAY_ROUND: u8 = 6;

/// Default advantage eligibility: every playable round.
pub const DEFAULT_ADVANTAGE_ROUNDS: i32 = 0b0111_1110;

pub fn default_stroke_advantage() -> Decimal {
    Decimal::new(5, 1)
}

/// Whether the birthday stroke advantage applies to a round, given the
/// tournament's eligibility bitmask (bit r set means round r is eligible).
pub fn advantage_applies(mask: i32, round: u8) -> bool {
    (FIRST_QUALIFYING_ROUND..=SUNDAY_ROUND).contains(&round) && mask & (1 << round) != 0
}

/// What a calendar date means inside a tournament week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentDay {
    /// Monday-Thursday, rounds 1-4.
    Qualifying(u8),
    /// Friday. No play; the field is cut after this day.
    CutDay,
    /// Saturday and Sunday, rounds 5 and 6.
    Championship(u8),
}

/// Map a date to its role in a tournament starting on `start` (a Monday).
/// Dates outside the seven-day window are `None`.
pub fn day_of(start: NaiveDate, date: NaiveDate) -> Option<TournamentDay> {
    let offset = (date - start).num_days();
    match offset {
        0..=3 => Some(TournamentDay::Qualifying(offset as u8 + 1)),
        4 => Some(TournamentDay::CutDay),
        5 => Some(TournamentDay::Championship(SATURDAY_ROUND)),
        6 => Some(TournamentDay::Championship(SUNDAY_ROUND)),
        _ => None,
    }
}

/// The playable round id for a date, if any. The cut day and dates outside
/// the window have none.
pub fn round_of(start: NaiveDate, date: NaiveDate) -> Option<u8> {
    match day_of(start, date)? {
        TournamentDay::Qualifying(round) => Some(round),
        TournamentDay::Championship(round) => Some(round),
        TournamentDay::CutDay => None,
    }
}

/// The Friday of a tournament week.
pub fn cut_day(start: NaiveDate) -> NaiveDate {
    start + Duration::days(4)
}

/// The Monday of the calendar week containing `date`.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn windows_overlap(a: (NaiveDate, NaiveDate), b: (NaiveDate, NaiveDate)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// Generate the four majors for a year from the template calendar.
///
/// Template start dates advance by whole years with the day of month
/// preserved; the calendar is re-anchored by inserting a new template year,
/// not by recomputing weekdays here.
pub fn generate_majors(
    group_id: Uuid,
    year: i32,
    templates: &[MajorTemplate],
) -> Result<Vec<NewTournament>> {
    if templates.is_empty() {
        return Err(StorageError::InvalidInput(
            "No major tournament template configured".to_string(),
        ));
    }

    templates
        .iter()
        .map(|template| {
            let start_date = NaiveDate::from_ymd_opt(
                year,
                template.start_month as u32,
                template.start_day as u32,
            )
            .ok_or_else(|| {
                StorageError::InvalidInput(format!(
                    "Template '{}' has no valid start date in {year}",
                    template.name
                ))
            })?;

            Ok(NewTournament {
                group_id,
                name: template.name.clone(),
                tournament_type: TournamentType::Major,
                year,
                start_date,
                end_date: start_date + Duration::days(6),
                venue: template.venue.clone(),
                birthday_player_id: None,
                stroke_advantage: None,
                advantage_rounds: None,
            })
        })
        .collect()
}

/// Generate a player's birthday tournament for a year, if they qualify.
///
/// Skips players without a stored birth month/day and players who disabled
/// the tournament. The candidate week is the Monday of the week holding the
/// birthday, shifted by the preferred whole-week offset; if that week
/// collides with a major it is moved back seven days exactly once, and a
/// second collision is accepted as-is.
pub fn generate_birthday(
    group_id: Uuid,
    player: &Player,
    prefs: Option<&BirthdayPreferences>,
    year: i32,
    major_windows: &[(NaiveDate, NaiveDate)],
) -> Option<NewTournament> {
    let (birth_month, birth_day) = player.birth_date()?;

    if let Some(p) = prefs
        && !p.enabled
    {
        return None;
    }

    let birthday = NaiveDate::from_ymd_opt(year, birth_month, birth_day).or_else(|| {
        // A Feb 29 birthday lands on Feb 28 in common years.
        if birth_month == 2 && birth_day == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })?;

    let week_offset = prefs.map(|p| p.week_offset).unwrap_or(0);
    let mut start = monday_of_week(birthday) + Duration::weeks(week_offset as i64);

    let collides = |start: NaiveDate| {
        let window = (start, start + Duration::days(6));
        major_windows.iter().any(|&m| windows_overlap(window, m))
    };

    if collides(start) {
        start -= Duration::weeks(1);
    }

    let name = prefs
        .and_then(|p| p.custom_name.clone())
        .unwrap_or_else(|| format!("{}'s Birthday Championship", player.display_name));
    let stroke_advantage = prefs
        .and_then(|p| p.stroke_advantage)
        .unwrap_or_else(default_stroke_advantage);

    Some(NewTournament {
        group_id,
        name,
        tournament_type: TournamentType::Birthday,
        year,
        start_date: start,
        end_date: start + Duration::days(6),
        venue: None,
        birthday_player_id: Some(player.player_id),
        stroke_advantage: Some(stroke_advantage),
        advantage_rounds: Some(DEFAULT_ADVANTAGE_ROUNDS),
    })
}

/// Sort ascending by qualifying total and advance the top half, rounded
/// up. Everyone tied with the boundary total advances too, even when that
/// pushes the advancing set past the nominal 50%.
pub fn compute_cut(qualifying_totals: &[(Uuid, Decimal)]) -> HashSet<Uuid> {
    if qualifying_totals.is_empty() {
        return HashSet::new();
    }

    let mut sorted: Vec<(Uuid, Decimal)> = qualifying_totals.to_vec();
    sorted.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

    let advancing_count = sorted.len().div_ceil(2);
    let boundary = sorted[advancing_count - 1].1;

    sorted
        .into_iter()
        .filter(|(_, total)| *total <= boundary)
        .map(|(player, _)| player)
        .collect()
}

/// Generate and store a group's majors for a year. A second call for the
/// same year is answered with `AlreadyExists`.
pub async fn generate_and_store_majors(
    pool: &PgPool,
    group_id: Uuid,
    year: i32,
) -> Result<Vec<Tournament>> {
    let repo = TournamentRepository::new(pool);

    if !repo.majors_for_year(group_id, year).await?.is_empty() {
        return Err(StorageError::AlreadyExists(format!(
            "Majors already generated for {year}"
        )));
    }

    let templates = repo.major_templates_for(year).await?;
    let tournaments = generate_majors(group_id, year, &templates)?;

    repo.insert_many(&tournaments).await
}

/// Generate and store a player's birthday tournament for a year. Returns
/// `None` when the player has no birth date on file or has opted out, which
/// is a normal outcome rather than an error.
pub async fn generate_and_store_birthday(
    pool: &PgPool,
    player_id: Uuid,
    group_id: Uuid,
    year: i32,
) -> Result<Option<Tournament>> {
    let repo = TournamentRepository::new(pool);

    if repo.birthday_exists(group_id, player_id, year).await? {
        return Err(StorageError::AlreadyExists(format!(
            "Birthday tournament already generated for {year}"
        )));
    }

    let players = PlayerRepository::new(pool);
    let player = players.find_by_id(player_id).await?;
    let prefs = players.birthday_preferences(player_id, group_id).await?;

    let major_windows: Vec<(NaiveDate, NaiveDate)> = repo
        .majors_for_year(group_id, year)
        .await?
        .into_iter()
        .map(|t| (t.start_date, t.end_date))
        .collect();

    let Some(tournament) = generate_birthday(group_id, &player, prefs.as_ref(), year, &major_windows)
    else {
        return Ok(None);
    };

    let inserted = repo.insert_many(std::slice::from_ref(&tournament)).await?;
    Ok(inserted.into_iter().next())
}

/// Daily sweep flipping `is_active` from the calendar. Idempotent, so
/// overlapping runs are harmless.
pub async fn sweep_activation(pool: &PgPool, as_of: NaiveDate) -> Result<(u64, u64)> {
    TournamentRepository::new(pool).update_activation(as_of).await
}

/// Apply the cut once the Friday boundary has passed: compute qualifying
/// totals from rounds 1-4, advance the top half (ties included), and write
/// each player's made_cut flag. Participants whose cut has already been
/// applied are left untouched by the store.
pub async fn apply_cut(pool: &PgPool, tournament_id: Uuid, as_of: NaiveDate) -> Result<Vec<Uuid>> {
    let repo = TournamentRepository::new(pool);
    let tournament = repo.find_by_id(tournament_id).await?;

    if as_of <= cut_day(tournament.start_date) {
        return Err(StorageError::InvalidInput(format!(
            "Cut day {} has not passed as of {as_of}",
            cut_day(tournament.start_date)
        )));
    }

    let records = ScoreRepository::new(pool)
        .scores_in_window(tournament.group_id, tournament.start_date, tournament.end_date)
        .await?;

    let totals = tournament_leaderboard::qualifying_totals(&tournament, &records);
    let advancing = compute_cut(&totals);

    for (player_id, total) in &totals {
        repo.apply_cut_for_player(tournament_id, *player_id, *total, advancing.contains(player_id))
            .await?;
    }

    let mut advancing: Vec<Uuid> = advancing.into_iter().collect();
    advancing.sort();
    Ok(advancing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn player(id: u128, name: &str, month: Option<i16>, day: Option<i16>) -> Player {
        Player {
            player_id: Uuid::from_u128(id),
            display_name: name.to_string(),
            birth_month: month,
            birth_day: day,
            created_at: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    fn template(year: i32, name: &str, month: i16, day: i16, order: i16) -> MajorTemplate {
        MajorTemplate {
            template_id: Uuid::from_u128(order as u128),
            template_year: year,
            name: name.to_string(),
            venue: Some(format!("{name} Club")),
            start_month: month,
            start_day: day,
            sort_order: order,
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn week_maps_to_rounds_with_friday_cut() {
        let start = date(2025, 4, 7); // a Monday

        assert_eq!(day_of(start, date(2025, 4, 7)), Some(TournamentDay::Qualifying(1)));
        assert_eq!(day_of(start, date(2025, 4, 10)), Some(TournamentDay::Qualifying(4)));
        assert_eq!(day_of(start, date(2025, 4, 11)), Some(TournamentDay::CutDay));
        assert_eq!(day_of(start, date(2025, 4, 12)), Some(TournamentDay::Championship(5)));
        assert_eq!(day_of(start, date(2025, 4, 13)), Some(TournamentDay::Championship(6)));
        assert_eq!(day_of(start, date(2025, 4, 14)), None);
        assert_eq!(day_of(start, date(2025, 4, 6)), None);
    }

    #[test]
    fn friday_has_no_round_for_any_start() {
        for offset in 0..10 {
            let start = date(2025, 1, 6) + Duration::weeks(offset);
            assert_eq!(round_of(start, cut_day(start)), None);
        }
    }

    #[test]
    fn weekend_round_ids_are_distinct_from_qualifying() {
        let start = date(2025, 4, 7);
        let saturday = round_of(start, date(2025, 4, 12)).unwrap();
        let sunday = round_of(start, date(2025, 4, 13)).unwrap();
        let thursday = round_of(start, date(2025, 4, 10)).unwrap();

        assert_ne!(saturday, sunday);
        assert_ne!(saturday, thursday);
        assert_ne!(sunday, thursday);
        assert_eq!((saturday, sunday), (5, 6));
    }

    #[test]
    fn majors_advance_template_years_preserving_day_of_month() {
        let group = Uuid::from_u128(9);
        let templates = vec![
            template(2024, "The Masters", 4, 8, 1),
            template(2024, "The Open", 7, 15, 2),
        ];

        let majors = generate_majors(group, 2026, &templates).unwrap();

        assert_eq!(majors.len(), 2);
        assert_eq!(majors[0].start_date, date(2026, 4, 8));
        assert_eq!(majors[0].end_date, date(2026, 4, 14));
        assert_eq!(majors[1].start_date, date(2026, 7, 15));
        assert_eq!(majors[0].tournament_type, TournamentType::Major);
        assert_eq!(majors[0].venue.as_deref(), Some("The Masters Club"));
    }

    #[test]
    fn majors_require_a_template() {
        let result = generate_majors(Uuid::from_u128(9), 2026, &[]);
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));
    }

    #[test]
    fn birthday_starts_monday_of_birthday_week() {
        // 2025-06-18 is a Wednesday; its week starts Monday 2025-06-16.
        let p = player(1, "Maya", Some(6), Some(18));
        let t = generate_birthday(Uuid::from_u128(9), &p, None, 2025, &[]).unwrap();

        assert_eq!(t.start_date, date(2025, 6, 16));
        assert_eq!(t.end_date, date(2025, 6, 22));
        assert_eq!(t.name, "Maya's Birthday Championship");
        assert_eq!(t.stroke_advantage, Some(dec("0.5")));
        assert_eq!(t.birthday_player_id, Some(p.player_id));
    }

    #[test]
    fn birthday_skipped_without_birth_date() {
        let p = player(1, "Maya", None, Some(18));
        assert!(generate_birthday(Uuid::from_u128(9), &p, None, 2025, &[]).is_none());
    }

    #[test]
    fn birthday_skipped_when_disabled() {
        let p = player(1, "Maya", Some(6), Some(18));
        let prefs = BirthdayPreferences {
            player_id: p.player_id,
            group_id: Uuid::from_u128(9),
            enabled: false,
            custom_name: None,
            week_offset: 0,
            stroke_advantage: None,
        };
        assert!(generate_birthday(Uuid::from_u128(9), &p, Some(&prefs), 2025, &[]).is_none());
    }

    #[test]
    fn birthday_honors_week_offset_and_custom_name() {
        let p = player(1, "Maya", Some(6), Some(18));
        let prefs = BirthdayPreferences {
            player_id: p.player_id,
            group_id: Uuid::from_u128(9),
            enabled: true,
            custom_name: Some("The Maya Invitational".to_string()),
            week_offset: -2,
            stroke_advantage: Some(dec("1.0")),
        };

        let t = generate_birthday(Uuid::from_u128(9), &p, Some(&prefs), 2025, &[]).unwrap();

        assert_eq!(t.start_date, date(2025, 6, 2));
        assert_eq!(t.name, "The Maya Invitational");
        assert_eq!(t.stroke_advantage, Some(dec("1.0")));
    }

    #[test]
    fn birthday_shifts_back_one_week_on_major_collision() {
        // Birthday week would be 2025-06-16..22; a major occupies it.
        let p = player(1, "Maya", Some(6), Some(18));
        let majors = vec![(date(2025, 6, 16), date(2025, 6, 22))];

        let t = generate_birthday(Uuid::from_u128(9), &p, None, 2025, &majors).unwrap();

        assert_eq!(t.start_date, date(2025, 6, 9));
        assert_eq!(t.end_date, date(2025, 6, 15));
    }

    #[test]
    fn birthday_second_collision_is_accepted() {
        // Majors occupy both the birthday week and the week before; the
        // single retry lands on the earlier week and stays there.
        let p = player(1, "Maya", Some(6), Some(18));
        let majors = vec![
            (date(2025, 6, 16), date(2025, 6, 22)),
            (date(2025, 6, 9), date(2025, 6, 15)),
        ];

        let t = generate_birthday(Uuid::from_u128(9), &p, None, 2025, &majors).unwrap();

        assert_eq!(t.start_date, date(2025, 6, 9));
    }

    #[test]
    fn birthday_generation_is_deterministic() {
        let p = player(1, "Maya", Some(6), Some(18));
        let majors = vec![(date(2025, 6, 16), date(2025, 6, 22))];

        let a = generate_birthday(Uuid::from_u128(9), &p, None, 2025, &majors);
        let b = generate_birthday(Uuid::from_u128(9), &p, None, 2025, &majors);

        assert_eq!(a, b);
    }

    #[test]
    fn leap_day_birthday_falls_back_to_feb_28() {
        let p = player(1, "Maya", Some(2), Some(29));
        let t = generate_birthday(Uuid::from_u128(9), &p, None, 2025, &[]).unwrap();
        // 2025-02-28 is a Friday; its week starts Monday 2025-02-24.
        assert_eq!(t.start_date, date(2025, 2, 24));
    }

    #[test]
    fn cut_advances_top_half() {
        let totals = vec![
            (Uuid::from_u128(1), dec("-2")),
            (Uuid::from_u128(2), dec("0")),
            (Uuid::from_u128(3), dec("3")),
            (Uuid::from_u128(4), dec("5")),
        ];

        let advancing = compute_cut(&totals);

        assert_eq!(advancing.len(), 2);
        assert!(advancing.contains(&Uuid::from_u128(1)));
        assert!(advancing.contains(&Uuid::from_u128(2)));
    }

    #[test]
    fn cut_rounds_up_on_odd_fields() {
        let totals = vec![
            (Uuid::from_u128(1), dec("-2")),
            (Uuid::from_u128(2), dec("0")),
            (Uuid::from_u128(3), dec("3")),
        ];

        let advancing = compute_cut(&totals);

        assert_eq!(advancing.len(), 2);
    }

    #[test]
    fn cut_ties_at_boundary_all_advance() {
        let totals = vec![
            (Uuid::from_u128(1), dec("-1")),
            (Uuid::from_u128(2), dec("2")),
            (Uuid::from_u128(3), dec("2")),
            (Uuid::from_u128(4), dec("2")),
            (Uuid::from_u128(5), dec("6")),
            (Uuid::from_u128(6), dec("8")),
        ];

        // Nominal cut is 3, but players 2-4 share the boundary total.
        let advancing = compute_cut(&totals);

        assert_eq!(advancing.len(), 4);
        assert!(!advancing.contains(&Uuid::from_u128(5)));
        assert!(!advancing.contains(&Uuid::from_u128(6)));
    }

    #[test]
    fn cut_of_empty_field_is_empty() {
        assert!(compute_cut(&[]).is_empty());
    }

    #[test]
    fn advantage_mask_covers_configured_rounds() {
        assert!(advantage_applies(DEFAULT_ADVANTAGE_ROUNDS, 1));
        assert!(advantage_applies(DEFAULT_ADVANTAGE_ROUNDS, 6));

        // Monday-only configuration.
        let monday_only = 1 << 1;
        assert!(advantage_applies(monday_only, 1));
        assert!(!advantage_applies(monday_only, 2));
        assert!(!advantage_applies(monday_only, 5));
    }

    #[test]
    fn monday_of_week_is_identity_on_mondays() {
        let monday = date(2025, 4, 7);
        assert_eq!(monday_of_week(monday), monday);
        assert_eq!(monday_of_week(date(2025, 4, 13)), monday);
    }
}
