//! Repository for the single-row `settings` table.

use promptlib_core::settings::SiteSettings;
use sqlx::PgPool;

/// The fixed ID of the one settings row.
const SETTINGS_ROW_ID: i64 = 1;

/// Provides read-with-default-fallback and upsert for site settings.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Fetch the effective settings. An absent row (or a blob that no longer
    /// deserializes) yields the defaults.
    pub async fn fetch(pool: &PgPool) -> Result<SiteSettings, sqlx::Error> {
        let stored = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT data FROM settings WHERE id = $1",
        )
        .bind(SETTINGS_ROW_ID)
        .fetch_optional(pool)
        .await?;

        Ok(match stored {
            Some(value) => SiteSettings::from_stored(value),
            None => SiteSettings::default(),
        })
    }

    /// Upsert the settings blob. Creates the row on first save.
    pub async fn save(pool: &PgPool, data: &serde_json::Value) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO settings (id, data) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()",
        )
        .bind(SETTINGS_ROW_ID)
        .bind(data)
        .execute(pool)
        .await?;
        Ok(())
    }
}
