use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::tournament::BirthdayPreferencesRequest;
use crate::error::{Result, StorageError};
use crate::models::{BirthdayPreferences, Player};

/// Repository for Player and BirthdayPreferences database operations
pub struct PlayerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PlayerRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, player_id: Uuid) -> Result<Player> {
        let player = sqlx::query_as::<_, Player>(
            r#"
            SELECT player_id, display_name, birth_month, birth_day, created_at
            FROM players
            WHERE player_id = $1
            "#,
        )
        .bind(player_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(player)
    }

    pub async fn birthday_preferences(
        &self,
        player_id: Uuid,
        group_id: Uuid,
    ) -> Result<Option<BirthdayPreferences>> {
        let prefs = sqlx::query_as::<_, BirthdayPreferences>(
            r#"
            SELECT player_id, group_id, enabled, custom_name, week_offset, stroke_advantage
            FROM birthday_preferences
            WHERE player_id = $1 AND group_id = $2
            "#,
        )
        .bind(player_id)
        .bind(group_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(prefs)
    }

    pub async fn upsert_birthday_preferences(
        &self,
        req: &BirthdayPreferencesRequest,
    ) -> Result<BirthdayPreferences> {
        let prefs = sqlx::query_as::<_, BirthdayPreferences>(
            r#"
            INSERT INTO birthday_preferences (
                player_id, group_id, enabled, custom_name, week_offset, stroke_advantage
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (player_id, group_id) DO UPDATE SET
                enabled = EXCLUDED.enabled,
                custom_name = EXCLUDED.custom_name,
                week_offset = EXCLUDED.week_offset,
                stroke_advantage = EXCLUDED.stroke_advantage
            RETURNING player_id, group_id, enabled, custom_name, week_offset, stroke_advantage
            "#,
        )
        .bind(req.player_id)
        .bind(req.group_id)
        .bind(req.enabled)
        .bind(req.custom_name.as_deref())
        .bind(req.week_offset)
        .bind(req.stroke_advantage)
        .fetch_one(self.pool)
        .await?;

        Ok(prefs)
    }
}
