use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::preferences::PreferenceSet;

/// The latest preferences stored for one user identity.
///
/// Serialized flat: the preference fields sit alongside `userId` and
/// `lastUpdated`, matching what dashboard clients merge over their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPreferenceRecord {
    /// Opaque caller identity.
    pub user_id: String,
    #[serde(flatten)]
    pub preferences: PreferenceSet,
    /// When the record was last written.
    pub last_updated: DateTime<Utc>,
}

impl StoredPreferenceRecord {
    pub fn new(user_id: impl Into<String>, preferences: PreferenceSet) -> Self {
        Self {
            user_id: user_id.into(),
            preferences,
            last_updated: Utc::now(),
        }
    }
}
