use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::HandicapRecord;

/// Repository for HandicapRecord database operations
pub struct HandicapRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HandicapRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert the rolling handicap for a (player, group).
    pub async fn upsert(
        &self,
        player_id: Uuid,
        group_id: Uuid,
        handicap: Decimal,
        games_played: i32,
    ) -> Result<HandicapRecord> {
        let record = sqlx::query_as::<_, HandicapRecord>(
            r#"
            INSERT INTO handicap_records (player_id, group_id, handicap, games_played, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (player_id, group_id) DO UPDATE SET
                handicap = EXCLUDED.handicap,
                games_played = EXCLUDED.games_played,
                updated_at = NOW()
            RETURNING player_id, group_id, handicap, games_played, updated_at
            "#,
        )
        .bind(player_id)
        .bind(group_id)
        .bind(handicap)
        .bind(games_played)
        .fetch_one(self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find(&self, player_id: Uuid, group_id: Uuid) -> Result<HandicapRecord> {
        let record = sqlx::query_as::<_, HandicapRecord>(
            r#"
            SELECT player_id, group_id, handicap, games_played, updated_at
            FROM handicap_records
            WHERE player_id = $1 AND group_id = $2
            "#,
        )
        .bind(player_id)
        .bind(group_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(record)
    }

    /// All current handicaps in a group, for leaderboard math.
    pub async fn for_group(&self, group_id: Uuid) -> Result<Vec<HandicapRecord>> {
        let records = sqlx::query_as::<_, HandicapRecord>(
            r#"
            SELECT player_id, group_id, handicap, games_played, updated_at
            FROM handicap_records
            WHERE group_id = $1
            "#,
        )
        .bind(group_id)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }
}
