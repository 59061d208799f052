//! Database models

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Column list shared by every `character_imports` SELECT
pub const CHARACTER_COLUMNS: &str = "id, guid, name, realm, level, class_file, race_file, \
     faction, guild_name, spec, role, professions, language, exported_at, payload, \
     created_at, updated_at";

/// Persisted character import (one row of `character_imports`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: Uuid,
    pub guid: Option<String>,
    pub name: String,
    pub realm: String,
    pub level: Option<i64>,
    pub class_file: Option<String>,
    pub race_file: Option<String>,
    pub faction: Option<String>,
    pub guild_name: Option<String>,
    pub spec: Option<String>,
    /// `DPS`, `Tank` or `Heal`
    pub role: String,
    pub professions: Vec<String>,
    pub language: String,
    pub exported_at: Option<DateTime<Utc>>,
    /// Full decoded export document, kept for fields not yet extracted
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CharacterRecord {
    /// Build a record from a row selected with [`CHARACTER_COLUMNS`]
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        let id_str: String = row.try_get("id")?;
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| Error::InvalidInput(format!("Stored record id '{}': {}", id_str, e)))?;

        let professions_json: String = row.try_get("professions")?;
        let payload_json: String = row.try_get("payload")?;

        Ok(Self {
            id,
            guid: row.try_get("guid")?,
            name: row.try_get("name")?,
            realm: row.try_get("realm")?,
            level: row.try_get("level")?,
            class_file: row.try_get("class_file")?,
            race_file: row.try_get("race_file")?,
            faction: row.try_get("faction")?,
            guild_name: row.try_get("guild_name")?,
            spec: row.try_get("spec")?,
            role: row.try_get("role")?,
            professions: serde_json::from_str(&professions_json)?,
            language: row.try_get("language")?,
            exported_at: row.try_get("exported_at")?,
            payload: serde_json::from_str(&payload_json)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
