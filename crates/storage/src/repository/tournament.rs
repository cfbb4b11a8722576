use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{MajorTemplate, NewTournament, Tournament, TournamentParticipant};

const TOURNAMENT_COLUMNS: &str = "tournament_id, group_id, name, tournament_type, year, \
     start_date, end_date, venue, is_active, birthday_player_id, stroke_advantage, \
     advantage_rounds, created_at";

const PARTICIPANT_COLUMNS: &str = "participant_id, tournament_id, player_id, qualifying_total, \
     made_cut, cut_applied, weekend_total, final_total, final_position, prize, created_at";

/// Repository for Tournament database operations
pub struct TournamentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TournamentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, tournament_id: Uuid) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            r#"
            SELECT {TOURNAMENT_COLUMNS}
            FROM tournaments
            WHERE tournament_id = $1
            "#
        ))
        .bind(tournament_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tournament)
    }

    pub async fn list(&self, group_id: Uuid, year: Option<i32>) -> Result<Vec<Tournament>> {
        let tournaments = match year {
            Some(year) => {
                sqlx::query_as::<_, Tournament>(&format!(
                    r#"
                    SELECT {TOURNAMENT_COLUMNS}
                    FROM tournaments
                    WHERE group_id = $1 AND year = $2
                    ORDER BY start_date
                    "#
                ))
                .bind(group_id)
                .bind(year)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Tournament>(&format!(
                    r#"
                    SELECT {TOURNAMENT_COLUMNS}
                    FROM tournaments
                    WHERE group_id = $1
                    ORDER BY start_date
                    "#
                ))
                .bind(group_id)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(tournaments)
    }

    /// Major tournaments of a group for one year, in calendar order.
    pub async fn majors_for_year(&self, group_id: Uuid, year: i32) -> Result<Vec<Tournament>> {
        let tournaments = sqlx::query_as::<_, Tournament>(&format!(
            r#"
            SELECT {TOURNAMENT_COLUMNS}
            FROM tournaments
            WHERE group_id = $1 AND year = $2 AND tournament_type = 'major'
            ORDER BY start_date
            "#
        ))
        .bind(group_id)
        .bind(year)
        .fetch_all(self.pool)
        .await?;

        Ok(tournaments)
    }

    pub async fn birthday_exists(
        &self,
        group_id: Uuid,
        player_id: Uuid,
        year: i32,
    ) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM tournaments
            WHERE group_id = $1 AND birthday_player_id = $2 AND year = $3
              AND tournament_type = 'birthday'
            "#,
        )
        .bind(group_id)
        .bind(player_id)
        .bind(year)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Insert a batch of generated tournaments atomically. A duplicate in
    /// the batch (same group/year/name, or same honoree and year) rolls the
    /// whole batch back and surfaces as `AlreadyExists`.
    pub async fn insert_many(&self, tournaments: &[NewTournament]) -> Result<Vec<Tournament>> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(tournaments.len());

        for t in tournaments {
            let row = sqlx::query_as::<_, Tournament>(&format!(
                r#"
                INSERT INTO tournaments (
                    group_id, name, tournament_type, year, start_date, end_date,
                    venue, is_active, birthday_player_id, stroke_advantage, advantage_rounds
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8, $9, $10)
                RETURNING {TOURNAMENT_COLUMNS}
                "#
            ))
            .bind(t.group_id)
            .bind(&t.name)
            .bind(t.tournament_type.as_str())
            .bind(t.year)
            .bind(t.start_date)
            .bind(t.end_date)
            .bind(t.venue.as_deref())
            .bind(t.birthday_player_id)
            .bind(t.stroke_advantage)
            .bind(t.advantage_rounds)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                StorageError::from(e).or_already_exists("Tournament already generated")
            })?;

            inserted.push(row);
        }

        tx.commit().await?;

        Ok(inserted)
    }

    /// Daily activation sweep: a tournament is active exactly while `as_of`
    /// is inside its window. Safe to run any number of times.
    pub async fn update_activation(&self, as_of: NaiveDate) -> Result<(u64, u64)> {
        let activated = sqlx::query(
            r#"
            UPDATE tournaments
            SET is_active = TRUE
            WHERE is_active = FALSE AND start_date <= $1 AND end_date >= $1
            "#,
        )
        .bind(as_of)
        .execute(self.pool)
        .await?
        .rows_affected();

        let deactivated = sqlx::query(
            r#"
            UPDATE tournaments
            SET is_active = FALSE
            WHERE is_active = TRUE AND (end_date < $1 OR start_date > $1)
            "#,
        )
        .bind(as_of)
        .execute(self.pool)
        .await?
        .rows_affected();

        Ok((activated, deactivated))
    }

    pub async fn participants(&self, tournament_id: Uuid) -> Result<Vec<TournamentParticipant>> {
        let participants = sqlx::query_as::<_, TournamentParticipant>(&format!(
            r#"
            SELECT {PARTICIPANT_COLUMNS}
            FROM tournament_participants
            WHERE tournament_id = $1
            "#
        ))
        .bind(tournament_id)
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    /// Record the cut for one player. The `cut_applied` guard makes the
    /// made_cut flag immutable after its first write.
    pub async fn apply_cut_for_player(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
        qualifying_total: Decimal,
        made_cut: bool,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tournament_participants (
                tournament_id, player_id, qualifying_total, made_cut, cut_applied
            )
            VALUES ($1, $2, $3, $4, TRUE)
            ON CONFLICT (tournament_id, player_id) DO UPDATE SET
                qualifying_total = EXCLUDED.qualifying_total,
                made_cut = EXCLUDED.made_cut,
                cut_applied = TRUE
            WHERE tournament_participants.cut_applied = FALSE
            "#,
        )
        .bind(tournament_id)
        .bind(player_id)
        .bind(qualifying_total)
        .bind(made_cut)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Persist final standings once a tournament has completed.
    pub async fn record_final_standing(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
        weekend_total: Decimal,
        final_total: Decimal,
        final_position: i32,
        prize: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tournament_participants (
                tournament_id, player_id, weekend_total, final_total, final_position, prize
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (tournament_id, player_id) DO UPDATE SET
                weekend_total = EXCLUDED.weekend_total,
                final_total = EXCLUDED.final_total,
                final_position = EXCLUDED.final_position,
                prize = COALESCE(EXCLUDED.prize, tournament_participants.prize)
            "#,
        )
        .bind(tournament_id)
        .bind(player_id)
        .bind(weekend_total)
        .bind(final_total)
        .bind(final_position)
        .bind(prize)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// The newest major-tournament template at or before `year`.
    pub async fn major_templates_for(&self, year: i32) -> Result<Vec<MajorTemplate>> {
        let templates = sqlx::query_as::<_, MajorTemplate>(
            r#"
            SELECT template_id, template_year, name, venue, start_month, start_day, sort_order
            FROM major_templates
            WHERE template_year = (
                SELECT MAX(template_year) FROM major_templates WHERE template_year <= $1
            )
            ORDER BY sort_order
            "#,
        )
        .bind(year)
        .fetch_all(self.pool)
        .await?;

        Ok(templates)
    }
}
