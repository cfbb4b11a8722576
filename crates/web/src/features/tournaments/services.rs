use chrono::NaiveDate;
use sqlx::PgPool;
use storage::{
    dto::tournament::{BirthdayPreferencesRequest, TournamentLeaderboardResponse, TournamentStanding},
    error::Result,
    models::{BirthdayPreferences, Tournament},
    repository::{player::PlayerRepository, tournament::TournamentRepository},
    services::{tournament_leaderboard, tournament_schedule},
};
use uuid::Uuid;

/// List a group's tournaments, optionally restricted to one year
pub async fn list_tournaments(
    pool: &PgPool,
    group_id: Uuid,
    year: Option<i32>,
) -> Result<Vec<Tournament>> {
    TournamentRepository::new(pool).list(group_id, year).await
}

/// Generate and store the year's four majors for a group
pub async fn generate_majors(pool: &PgPool, group_id: Uuid, year: i32) -> Result<Vec<Tournament>> {
    tournament_schedule::generate_and_store_majors(pool, group_id, year).await
}

/// Generate and store a player's birthday tournament for a year
pub async fn generate_birthday(
    pool: &PgPool,
    player_id: Uuid,
    group_id: Uuid,
    year: i32,
) -> Result<Option<Tournament>> {
    tournament_schedule::generate_and_store_birthday(pool, player_id, group_id, year).await
}

/// Tournament standings as of an explicit date
pub async fn tournament_leaderboard(
    pool: &PgPool,
    tournament_id: Uuid,
    as_of: NaiveDate,
) -> Result<TournamentLeaderboardResponse> {
    tournament_leaderboard::leaderboard(pool, tournament_id, as_of).await
}

/// Apply the post-Friday cut
pub async fn apply_cut(pool: &PgPool, tournament_id: Uuid, as_of: NaiveDate) -> Result<Vec<Uuid>> {
    tournament_schedule::apply_cut(pool, tournament_id, as_of).await
}

/// Persist final standings for a completed tournament
pub async fn finalize(
    pool: &PgPool,
    tournament_id: Uuid,
    as_of: NaiveDate,
    winner_prize: Option<&str>,
) -> Result<Vec<TournamentStanding>> {
    tournament_leaderboard::finalize(pool, tournament_id, as_of, winner_prize).await
}

/// Daily activation sweep
pub async fn sweep_activation(pool: &PgPool, as_of: NaiveDate) -> Result<(u64, u64)> {
    tournament_schedule::sweep_activation(pool, as_of).await
}

/// Store a player's birthday tournament preferences
pub async fn upsert_birthday_preferences(
    pool: &PgPool,
    request: &BirthdayPreferencesRequest,
) -> Result<BirthdayPreferences> {
    PlayerRepository::new(pool)
        .upsert_birthday_preferences(request)
        .await
}
