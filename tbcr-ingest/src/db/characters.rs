//! Character import database operations
//!
//! The upsert is one `INSERT ... ON CONFLICT ... DO UPDATE ... RETURNING id`
//! statement in its own transaction; guid-keyed upserts first merge a
//! conflicting guid-less row inside that transaction. SQLite's unique
//! constraints on `guid` and `(name, realm)` make concurrent imports of the
//! same character collapse into one row; the last committed write wins.

use crate::store::{CharacterFields, IdentityKey};
use chrono::Utc;
use sqlx::SqlitePool;
use tbcr_common::db::{CharacterRecord, CHARACTER_COLUMNS};
use tbcr_common::{Error, Result};
use tracing::debug;
use uuid::Uuid;

/// Upsert keyed on `guid`
///
/// A row already holding the same `(name, realm)` is taken over (its guid
/// rewritten), so a character first imported without a guid stays one
/// record once its guid becomes known.
const UPSERT_BY_GUID: &str = r#"
    INSERT INTO character_imports (
        id, guid, name, realm, level, class_file, race_file, faction, guild_name,
        spec, role, professions, language, exported_at, payload, created_at, updated_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(guid) DO UPDATE SET
        name = excluded.name,
        realm = excluded.realm,
        level = excluded.level,
        class_file = excluded.class_file,
        race_file = excluded.race_file,
        faction = excluded.faction,
        guild_name = excluded.guild_name,
        spec = excluded.spec,
        role = excluded.role,
        professions = excluded.professions,
        language = excluded.language,
        exported_at = excluded.exported_at,
        payload = excluded.payload,
        updated_at = excluded.updated_at
    ON CONFLICT(name, realm) DO UPDATE SET
        guid = excluded.guid,
        level = excluded.level,
        class_file = excluded.class_file,
        race_file = excluded.race_file,
        faction = excluded.faction,
        guild_name = excluded.guild_name,
        spec = excluded.spec,
        role = excluded.role,
        professions = excluded.professions,
        language = excluded.language,
        exported_at = excluded.exported_at,
        payload = excluded.payload,
        updated_at = excluded.updated_at
    RETURNING id
"#;

/// Drop a guid-less row holding the target `(name, realm)` when another row
/// already owns the guid
///
/// Runs before [`UPSERT_BY_GUID`] in the same transaction so a renamed guid
/// row can take the name without violating `UNIQUE(name, realm)`.
const MERGE_GUIDLESS_DUPLICATE: &str = r#"
    DELETE FROM character_imports
    WHERE name = ? AND realm = ? AND guid IS NULL
      AND EXISTS (SELECT 1 FROM character_imports WHERE guid = ?)
"#;

/// Upsert keyed on `(name, realm)`; an existing guid is left untouched
const UPSERT_BY_NAME_REALM: &str = r#"
    INSERT INTO character_imports (
        id, guid, name, realm, level, class_file, race_file, faction, guild_name,
        spec, role, professions, language, exported_at, payload, created_at, updated_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(name, realm) DO UPDATE SET
        level = excluded.level,
        class_file = excluded.class_file,
        race_file = excluded.race_file,
        faction = excluded.faction,
        guild_name = excluded.guild_name,
        spec = excluded.spec,
        role = excluded.role,
        professions = excluded.professions,
        language = excluded.language,
        exported_at = excluded.exported_at,
        payload = excluded.payload,
        updated_at = excluded.updated_at
    RETURNING id
"#;

/// Insert or update one character; returns the record id
pub async fn upsert_character(
    pool: &SqlitePool,
    key: &IdentityKey,
    fields: &CharacterFields<'_>,
) -> Result<Uuid> {
    let summary = fields.summary;
    let (sql, guid) = match key {
        IdentityKey::Guid(guid) => (UPSERT_BY_GUID, Some(guid.as_str())),
        IdentityKey::NameRealm { .. } => (UPSERT_BY_NAME_REALM, None),
    };

    let professions = serde_json::to_string(&summary.professions)?;
    let payload = serde_json::to_string(fields.payload)?;
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    if let Some(guid) = guid {
        let merged = sqlx::query(MERGE_GUIDLESS_DUPLICATE)
            .bind(&summary.name)
            .bind(&summary.realm)
            .bind(guid)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if merged > 0 {
            debug!(key = %key, name = %summary.name, realm = %summary.realm, "Merged guid-less duplicate into guid record");
        }
    }

    let id: String = sqlx::query_scalar(sql)
        .bind(Uuid::new_v4().to_string())
        .bind(guid)
        .bind(&summary.name)
        .bind(&summary.realm)
        .bind(summary.level)
        .bind(&summary.class_file)
        .bind(&summary.race_file)
        .bind(&summary.faction)
        .bind(&summary.guild_name)
        .bind(&summary.spec)
        .bind(summary.role.as_str())
        .bind(&professions)
        .bind(&summary.language)
        .bind(fields.exported_at)
        .bind(&payload)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    debug!(record_id = %id, key = %key, "Character row upserted");

    parse_record_id(&id)
}

fn parse_record_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id)
        .map_err(|e| Error::InvalidInput(format!("Stored record id '{}': {}", id, e)))
}

/// Load one character by record id
pub async fn load_character(pool: &SqlitePool, id: Uuid) -> Result<Option<CharacterRecord>> {
    let sql = format!("SELECT {} FROM character_imports WHERE id = ?", CHARACTER_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(CharacterRecord::from_row).transpose()
}

/// Record id currently stored under `key`, if any
pub async fn find_character_id(pool: &SqlitePool, key: &IdentityKey) -> Result<Option<Uuid>> {
    let id: Option<String> = match key {
        IdentityKey::Guid(guid) => {
            sqlx::query_scalar("SELECT id FROM character_imports WHERE guid = ?")
                .bind(guid)
                .fetch_optional(pool)
                .await?
        }
        IdentityKey::NameRealm { name, realm } => {
            sqlx::query_scalar("SELECT id FROM character_imports WHERE name = ? AND realm = ?")
                .bind(name)
                .bind(realm)
                .fetch_optional(pool)
                .await?
        }
    };

    id.as_deref().map(parse_record_id).transpose()
}

/// Number of stored characters
pub async fn count_characters(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM character_imports")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
