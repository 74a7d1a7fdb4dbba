//! User preference queries.

use chrono::{DateTime, Utc};
use gd_protocol::{PreferenceSet, StoredPreferenceRecord, normalize};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

/// Preference row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PreferenceRow {
    pub user_id: String,
    pub preferences: Value,
    pub last_updated: DateTime<Utc>,
}

impl PreferenceRow {
    /// Convert to a record, re-normalizing the stored JSON.
    ///
    /// Rows written by older schema versions may lack fields or hold values
    /// that are no longer in-domain.
    pub fn into_record(self) -> StoredPreferenceRecord {
        let preferences = match &self.preferences {
            Value::Object(map) => normalize(map),
            _ => normalize(&Default::default()),
        };
        StoredPreferenceRecord {
            user_id: self.user_id,
            preferences,
            last_updated: self.last_updated,
        }
    }
}

/// Get the latest preferences for a user.
pub async fn get_latest(pool: &PgPool, user_id: &str) -> Result<Option<PreferenceRow>, sqlx::Error> {
    sqlx::query_as::<_, PreferenceRow>(
        "SELECT user_id, preferences, last_updated FROM user_preferences WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Insert or fully replace a user's preferences, stamping `last_updated`.
pub async fn upsert(
    pool: &PgPool,
    user_id: &str,
    preferences: &PreferenceSet,
) -> Result<PreferenceRow, sqlx::Error> {
    sqlx::query_as::<_, PreferenceRow>(
        "INSERT INTO user_preferences (user_id, preferences, last_updated)
         VALUES ($1, $2, now())
         ON CONFLICT (user_id)
         DO UPDATE SET
             preferences = EXCLUDED.preferences,
             last_updated = now()
         RETURNING user_id, preferences, last_updated",
    )
    .bind(user_id)
    .bind(Json(preferences))
    .fetch_one(pool)
    .await
}
