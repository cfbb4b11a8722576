use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::leaderboard::ScoreWithPlayer;
use crate::error::Result;
use crate::models::ScoreRecord;

const SCORE_COLUMNS: &str = "score_id, player_id, group_id, puzzle_date, puzzle_number, \
     attempts, score_label, raw_score, admin_submitted, created_at";

/// Repository for ScoreRecord database operations
pub struct ScoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoreRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a freshly submitted score. The unique key on
    /// (player_id, group_id, puzzle_date) is the authoritative duplicate
    /// guard; a violation surfaces as `AlreadyExists`.
    pub async fn insert(
        &self,
        player_id: Uuid,
        group_id: Uuid,
        puzzle_date: NaiveDate,
        puzzle_number: i32,
        attempts: i16,
        score_label: &str,
        raw_score: i16,
    ) -> Result<ScoreRecord> {
        let record = sqlx::query_as::<_, ScoreRecord>(&format!(
            r#"
            INSERT INTO score_records (
                player_id, group_id, puzzle_date, puzzle_number,
                attempts, score_label, raw_score, admin_submitted
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE)
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(player_id)
        .bind(group_id)
        .bind(puzzle_date)
        .bind(puzzle_number)
        .bind(attempts)
        .bind(score_label)
        .bind(raw_score)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            crate::error::StorageError::from(e)
                .or_already_exists("Score already submitted for this puzzle day")
        })?;

        Ok(record)
    }

    /// Replace (or create) a score through the administrative override path.
    pub async fn upsert_override(
        &self,
        player_id: Uuid,
        group_id: Uuid,
        puzzle_date: NaiveDate,
        puzzle_number: i32,
        attempts: i16,
        score_label: &str,
        raw_score: i16,
    ) -> Result<ScoreRecord> {
        let record = sqlx::query_as::<_, ScoreRecord>(&format!(
            r#"
            INSERT INTO score_records (
                player_id, group_id, puzzle_date, puzzle_number,
                attempts, score_label, raw_score, admin_submitted
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
            ON CONFLICT (player_id, group_id, puzzle_date) DO UPDATE SET
                puzzle_number = EXCLUDED.puzzle_number,
                attempts = EXCLUDED.attempts,
                score_label = EXCLUDED.score_label,
                raw_score = EXCLUDED.raw_score,
                admin_submitted = TRUE
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(player_id)
        .bind(group_id)
        .bind(puzzle_date)
        .bind(puzzle_number)
        .bind(attempts)
        .bind(score_label)
        .bind(raw_score)
        .fetch_one(self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_player_date(
        &self,
        player_id: Uuid,
        group_id: Uuid,
        puzzle_date: NaiveDate,
    ) -> Result<Option<ScoreRecord>> {
        let record = sqlx::query_as::<_, ScoreRecord>(&format!(
            r#"
            SELECT {SCORE_COLUMNS}
            FROM score_records
            WHERE player_id = $1 AND group_id = $2 AND puzzle_date = $3
            "#
        ))
        .bind(player_id)
        .bind(group_id)
        .bind(puzzle_date)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Most recent raw scores for a player in a group, newest first.
    pub async fn recent_raw_scores(
        &self,
        player_id: Uuid,
        group_id: Uuid,
        limit: i64,
    ) -> Result<Vec<i16>> {
        let scores = sqlx::query_scalar::<_, i16>(
            r#"
            SELECT raw_score
            FROM score_records
            WHERE player_id = $1 AND group_id = $2
            ORDER BY puzzle_date DESC
            LIMIT $3
            "#,
        )
        .bind(player_id)
        .bind(group_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(scores)
    }

    pub async fn count_games(&self, player_id: Uuid, group_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM score_records
            WHERE player_id = $1 AND group_id = $2
            "#,
        )
        .bind(player_id)
        .bind(group_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// All of a group's scores with puzzle dates in [start, end], joined
    /// with the player for display.
    pub async fn scores_in_window(
        &self,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScoreWithPlayer>> {
        let rows = sqlx::query_as::<_, ScoreWithPlayer>(
            r#"
            SELECT s.player_id, p.display_name, s.puzzle_date, s.raw_score
            FROM score_records s
            INNER JOIN players p ON p.player_id = s.player_id
            WHERE s.group_id = $1 AND s.puzzle_date BETWEEN $2 AND $3
            ORDER BY s.puzzle_date, p.display_name
            "#,
        )
        .bind(group_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Page through a group's score history, newest first, optionally for
    /// one player.
    pub async fn list_history(
        &self,
        group_id: Uuid,
        player_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ScoreRecord>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM score_records
            WHERE group_id = $1 AND ($2::uuid IS NULL OR player_id = $2)
            "#,
        )
        .bind(group_id)
        .bind(player_id)
        .fetch_one(self.pool)
        .await?;

        let records = sqlx::query_as::<_, ScoreRecord>(&format!(
            r#"
            SELECT {SCORE_COLUMNS}
            FROM score_records
            WHERE group_id = $1 AND ($2::uuid IS NULL OR player_id = $2)
            ORDER BY puzzle_date DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(group_id)
        .bind(player_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok((records, total))
    }

    pub async fn all_scores(&self, group_id: Uuid) -> Result<Vec<ScoreWithPlayer>> {
        let rows = sqlx::query_as::<_, ScoreWithPlayer>(
            r#"
            SELECT s.player_id, p.display_name, s.puzzle_date, s.raw_score
            FROM score_records s
            INNER JOIN players p ON p.player_id = s.player_id
            WHERE s.group_id = $1
            ORDER BY s.puzzle_date, p.display_name
            "#,
        )
        .bind(group_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
