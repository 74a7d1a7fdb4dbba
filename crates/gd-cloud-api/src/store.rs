//! Preference repository: latest preferences per user identity.
//!
//! Two backends behind one trait:
//! - **PostgreSQL** ([`PgStore`]) for production.
//! - **In-memory** ([`MemoryStore`]) for tests and development.
//!
//! Upserts replace the whole record. Concurrent writes for one identity are
//! not ordered; whichever commits last wins.

use std::collections::HashMap;

use async_trait::async_trait;
use gd_protocol::{PreferenceSet, StoredPreferenceRecord};
use sqlx::PgPool;
use tokio::sync::RwLock;

/// Storage-layer failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed upsert/lookup of the latest preferences per user.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Insert or fully replace the record for `user_id`.
    async fn upsert(
        &self,
        user_id: &str,
        preferences: &PreferenceSet,
    ) -> Result<StoredPreferenceRecord, StoreError>;

    /// Latest record for `user_id`, or `None` if there is none.
    async fn get_latest(&self, user_id: &str)
    -> Result<Option<StoredPreferenceRecord>, StoreError>;
}

/// In-memory store backed by `RwLock<HashMap>`.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, StoredPreferenceRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn upsert(
        &self,
        user_id: &str,
        preferences: &PreferenceSet,
    ) -> Result<StoredPreferenceRecord, StoreError> {
        let record = StoredPreferenceRecord::new(user_id, preferences.clone());
        self.records
            .write()
            .await
            .insert(user_id.to_string(), record.clone());
        Ok(record)
    }

    async fn get_latest(
        &self,
        user_id: &str,
    ) -> Result<Option<StoredPreferenceRecord>, StoreError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }
}

/// PostgreSQL-backed store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceStore for PgStore {
    async fn upsert(
        &self,
        user_id: &str,
        preferences: &PreferenceSet,
    ) -> Result<StoredPreferenceRecord, StoreError> {
        let row = crate::db::preferences::upsert(&self.pool, user_id, preferences).await?;
        Ok(row.into_record())
    }

    async fn get_latest(
        &self,
        user_id: &str,
    ) -> Result<Option<StoredPreferenceRecord>, StoreError> {
        let row = crate::db::preferences::get_latest(&self.pool, user_id).await?;
        Ok(row.map(|r| r.into_record()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gd_protocol::{DEFAULT_PREFERENCES, FontSize, Theme};

    fn dark() -> PreferenceSet {
        PreferenceSet {
            theme: Theme::Dark,
            ..DEFAULT_PREFERENCES
        }
    }

    fn large() -> PreferenceSet {
        PreferenceSet {
            font_size: FontSize::Large,
            ..DEFAULT_PREFERENCES
        }
    }

    #[tokio::test]
    async fn unknown_user_returns_none() {
        let store = MemoryStore::new();
        assert!(store.get_latest("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_creates_record() {
        let store = MemoryStore::new();
        let record = store.upsert("u1", &dark()).await.unwrap();
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.preferences, dark());
        assert_eq!(store.get_latest("u1").await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = MemoryStore::new();
        let first = store.upsert("u1", &dark()).await.unwrap();
        let second = store.upsert("u1", &large()).await.unwrap();

        let latest = store.get_latest("u1").await.unwrap().unwrap();
        assert_eq!(latest.preferences, large());
        // full replacement, no field-level merge
        assert_eq!(latest.preferences.theme, DEFAULT_PREFERENCES.theme);
        assert!(latest.last_updated >= first.last_updated);
        assert_eq!(latest.last_updated, second.last_updated);
        assert_eq!(store.records.read().await.len(), 1);
    }

    #[tokio::test]
    async fn identities_are_isolated() {
        let store = MemoryStore::new();
        store.upsert("u1", &dark()).await.unwrap();
        store.upsert("u2", &large()).await.unwrap();

        assert_eq!(store.get_latest("u1").await.unwrap().unwrap().preferences, dark());
        assert_eq!(store.get_latest("u2").await.unwrap().unwrap().preferences, large());
    }
}
