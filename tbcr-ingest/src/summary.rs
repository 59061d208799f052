//! Flat character summary derived from an export document
//!
//! Extraction never fails. Absent or oddly typed values become absent
//! summary fields; the importer decides whether the result is importable.

use crate::document::{at, int_at, non_blank, text_at, text_or_field};
use crate::heuristics::{infer_role, infer_spec, normalize_locale, normalize_professions, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const CORE: [&str; 2] = ["character", "core"];

/// Normalized projection of a character export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub guid: Option<String>,
    /// Empty when the export carries no name
    pub name: String,
    /// Empty when the export carries no realm
    pub realm: String,
    pub level: Option<i64>,
    pub class_file: Option<String>,
    pub race_file: Option<String>,
    pub faction: Option<String>,
    pub guild_name: Option<String>,
    /// Raw `exportedAt` text; parsed at persistence time
    pub exported_at: Option<String>,
    pub spec: Option<String>,
    pub role: Role,
    pub professions: Vec<String>,
    pub language: String,
}

fn core_field<'a>(document: &'a Value, key: &str) -> Option<&'a Value> {
    at(document, &CORE).and_then(|core| core.get(key))
}

/// Client GUIDs are normally strings; numeric ids are rendered as text
fn guid(document: &Value) -> Option<String> {
    match core_field(document, "guid")? {
        Value::Number(n) => Some(n.to_string()),
        other => non_blank(other),
    }
}

/// Talent tabs live under `character.talents.tabs`; some exporters emit the
/// tab list directly as `character.talents`
fn talent_tabs(document: &Value) -> Option<&Value> {
    let talents = at(document, &["character", "talents"])?;
    if talents.is_array() {
        Some(talents)
    } else {
        talents.get("tabs")
    }
}

/// Derive the flat summary from a decoded export document
pub fn summarize(document: &Value) -> CharacterSummary {
    let class_file = text_or_field(core_field(document, "class"), "file");
    let spec = infer_spec(talent_tabs(document));
    let role = infer_role(class_file.as_deref(), spec.as_deref());

    CharacterSummary {
        guid: guid(document),
        name: text_at(document, &["character", "core", "name"]).unwrap_or_default(),
        realm: text_at(document, &["character", "core", "realm"]).unwrap_or_default(),
        level: int_at(document, &["character", "core", "level"]),
        race_file: text_or_field(core_field(document, "race"), "file"),
        faction: text_or_field(core_field(document, "faction"), "name"),
        guild_name: text_at(document, &["guild", "summary", "name"]),
        exported_at: text_at(document, &["meta", "exportedAt"]),
        professions: normalize_professions(at(document, &["character", "professions"])),
        language: normalize_locale(text_at(document, &["meta", "locale"]).as_deref()),
        class_file,
        spec,
        role,
    }
}
