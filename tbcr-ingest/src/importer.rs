//! Character export import: decode, summarize, reconcile
//!
//! The single entry point is [`CharacterImporter::import_export`]. Decoding
//! and summarizing are pure; the only side effect is one atomic upsert
//! through the [`CharacterStore`]. Nothing is retried here. Re-running a
//! failed import is safe because the upsert is idempotent per identity.

use crate::envelope::decode_export;
use crate::error::{ImportError, ImportResult};
use crate::realm::{RealmAllowList, RealmPolicy};
use crate::store::{CharacterFields, CharacterStore, IdentityKey, SqliteCharacterStore};
use crate::summary::{summarize, CharacterSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use tbcr_common::config::ImportConfig;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Result of a successful import
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub record_id: Uuid,
    pub summary: CharacterSummary,
}

/// Parse `exportedAt`: RFC 3339, or `YYYY-MM-DD HH:MM:SS±hh:mm`
///
/// Anything else reads as absent; a bad timestamp never fails an import.
pub fn parse_exported_at(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%#z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Import pipeline bound to a store and a realm policy
#[derive(Debug, Clone)]
pub struct CharacterImporter<S = SqliteCharacterStore, P = RealmAllowList> {
    store: S,
    realms: P,
}

impl CharacterImporter {
    /// SQLite-backed importer with the configured realm allow-list
    pub fn from_config(pool: SqlitePool, config: &ImportConfig) -> Self {
        Self::new(
            SqliteCharacterStore::new(pool),
            RealmAllowList::from_config(config),
        )
    }
}

impl<S: CharacterStore, P: RealmPolicy> CharacterImporter<S, P> {
    pub fn new(store: S, realms: P) -> Self {
        Self { store, realms }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decode an export string and persist the character it describes
    pub async fn import_export(&self, raw: &str) -> ImportResult<ImportOutcome> {
        let document = decode_export(raw)?;
        let summary = summarize(&document);

        debug!(
            name = %summary.name,
            realm = %summary.realm,
            class = ?summary.class_file,
            spec = ?summary.spec,
            role = %summary.role,
            "Export summarized"
        );

        let record_id = self.reconcile(&summary, &document).await?;

        Ok(ImportOutcome { record_id, summary })
    }

    /// Validate identity and policy, then upsert
    pub async fn reconcile(&self, summary: &CharacterSummary, document: &Value) -> ImportResult<Uuid> {
        if summary.name.trim().is_empty() {
            info!("Import rejected: export has no character name");
            return Err(ImportError::MissingIdentity("name"));
        }
        if summary.realm.trim().is_empty() {
            info!(name = %summary.name, "Import rejected: export has no realm");
            return Err(ImportError::MissingIdentity("realm"));
        }

        if !self.realms.is_allowed(&summary.realm) {
            warn!(name = %summary.name, realm = %summary.realm, "Import rejected: realm not allowed");
            return Err(ImportError::RealmNotAllowed(summary.realm.clone()));
        }

        let exported_at = summary.exported_at.as_deref().and_then(|text| {
            let parsed = parse_exported_at(text);
            if parsed.is_none() {
                debug!(exported_at = %text, "Ignoring unparseable exportedAt");
            }
            parsed
        });

        let key = IdentityKey::for_summary(summary);
        let fields = CharacterFields {
            summary,
            exported_at,
            payload: document,
        };

        match self.store.upsert_character(&key, &fields).await {
            Ok(record_id) => {
                info!(
                    record_id = %record_id,
                    key_kind = key.kind(),
                    name = %summary.name,
                    realm = %summary.realm,
                    "Character import stored"
                );
                Ok(record_id)
            }
            Err(e) => {
                error!(key = %key, error = %e, "Character import failed to store");
                Err(ImportError::Storage(e))
            }
        }
    }
}
