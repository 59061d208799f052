//! Storage seam for reconciled characters

use crate::db::characters;
use crate::summary::CharacterSummary;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use std::fmt;
use uuid::Uuid;

/// Key used to deduplicate imports of the same character
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    /// Stable client-side character id
    Guid(String),
    /// Fallback when the export carries no guid
    NameRealm { name: String, realm: String },
}

impl IdentityKey {
    /// Non-empty guid wins, otherwise the `(name, realm)` pair
    pub fn for_summary(summary: &CharacterSummary) -> Self {
        match summary.guid.as_deref().map(str::trim) {
            Some(guid) if !guid.is_empty() => IdentityKey::Guid(guid.to_string()),
            _ => IdentityKey::NameRealm {
                name: summary.name.clone(),
                realm: summary.realm.clone(),
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            IdentityKey::Guid(_) => "guid",
            IdentityKey::NameRealm { .. } => "name_realm",
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Guid(guid) => write!(f, "guid:{}", guid),
            IdentityKey::NameRealm { name, realm } => write!(f, "{}-{}", name, realm),
        }
    }
}

/// Everything written for one character
#[derive(Debug, Clone, Copy)]
pub struct CharacterFields<'a> {
    pub summary: &'a CharacterSummary,
    /// `summary.exported_at` parsed; `None` when absent or unparseable
    pub exported_at: Option<DateTime<Utc>>,
    /// Full decoded document
    pub payload: &'a Value,
}

/// Atomic insert-or-update keyed on [`IdentityKey`]
///
/// Implementations must be race-free: two concurrent upserts with the same
/// key end up as one record.
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Returns the id of the inserted or updated record
    async fn upsert_character(
        &self,
        key: &IdentityKey,
        fields: &CharacterFields<'_>,
    ) -> tbcr_common::Result<Uuid>;
}

/// [`CharacterStore`] backed by the shared SQLite database
#[derive(Debug, Clone)]
pub struct SqliteCharacterStore {
    pool: SqlitePool,
}

impl SqliteCharacterStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CharacterStore for SqliteCharacterStore {
    async fn upsert_character(
        &self,
        key: &IdentityKey,
        fields: &CharacterFields<'_>,
    ) -> tbcr_common::Result<Uuid> {
        characters::upsert_character(&self.pool, key, fields).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize;
    use serde_json::json;

    #[test]
    fn test_guid_key_preferred() {
        let summary = summarize(&json!({"character": {"core": {
            "guid": "Player-1-0001", "name": "Thrall", "realm": "Everlook"
        }}}));
        assert_eq!(
            IdentityKey::for_summary(&summary),
            IdentityKey::Guid("Player-1-0001".to_string())
        );
    }

    #[test]
    fn test_name_realm_fallback() {
        let mut summary = summarize(&json!({"character": {"core": {
            "name": "Thrall", "realm": "Everlook"
        }}}));
        let expected = IdentityKey::NameRealm {
            name: "Thrall".to_string(),
            realm: "Everlook".to_string(),
        };
        assert_eq!(IdentityKey::for_summary(&summary), expected);

        summary.guid = Some("   ".to_string());
        assert_eq!(IdentityKey::for_summary(&summary), expected);
        assert_eq!(expected.kind(), "name_realm");
        assert_eq!(expected.to_string(), "Thrall-Everlook");
    }
}
