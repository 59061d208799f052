//! Classification heuristics over raw export data
//!
//! Pure functions: no storage access and no I/O, so each is testable alone.

use crate::document::{as_int, non_blank, text_or_field};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Raid role derived from class and specialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "DPS")]
    Dps,
    Tank,
    Heal,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Dps => "DPS",
            Role::Tank => "Tank",
            Role::Heal => "Heal",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a profession list
///
/// Accepts strings and `{"name": ...}` objects in any mix. Blank entries are
/// dropped, source order is kept. Anything other than a list yields nothing.
pub fn normalize_professions(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| text_or_field(Some(entry), "name"))
                .collect()
        })
        .unwrap_or_default()
}

/// Infer the specialization from talent tabs
///
/// Each tab's points are the sum of its talents' `rank` (missing or
/// non-numeric ranks count as 0). The label of the labelled tab with the
/// strictly greatest positive sum wins; on a tie the earlier tab is kept.
pub fn infer_spec(tabs: Option<&Value>) -> Option<String> {
    let tabs = tabs?.as_array()?;

    let mut best: Option<(String, i64)> = None;
    for tab in tabs {
        let Some(label) = tab_label(tab) else {
            continue;
        };
        let points = tab_points(tab);
        if points <= 0 {
            continue;
        }
        // Strictly greater: an equal later tab never displaces the first
        let improves = best
            .as_ref()
            .map_or(true, |(_, best_points)| points > *best_points);
        if improves {
            best = Some((label, points));
        }
    }

    best.map(|(label, _)| label)
}

fn tab_label(tab: &Value) -> Option<String> {
    tab.get("name")
        .and_then(non_blank)
        .or_else(|| tab.get("label").and_then(non_blank))
}

fn tab_points(tab: &Value) -> i64 {
    tab.get("talents")
        .and_then(Value::as_array)
        .map(|talents| {
            talents
                .iter()
                .map(|talent| talent.get("rank").and_then(as_int).unwrap_or(0))
                .fold(0i64, i64::saturating_add)
        })
        .unwrap_or(0)
}

/// Map class and specialization to a role (case-insensitive)
///
/// Druid `Feral` counts as Tank.
pub fn infer_role(class_file: Option<&str>, spec: Option<&str>) -> Role {
    let class = class_file.map(|c| c.trim().to_ascii_uppercase());
    let spec = spec.map(|s| s.trim().to_ascii_lowercase());
    let spec = spec.as_deref();

    match class.as_deref() {
        Some("WARRIOR") => match spec {
            Some("protection") => Role::Tank,
            _ => Role::Dps,
        },
        Some("PALADIN") => match spec {
            Some("holy") => Role::Heal,
            Some("protection") => Role::Tank,
            _ => Role::Dps,
        },
        Some("PRIEST") => match spec {
            Some("shadow") => Role::Dps,
            _ => Role::Heal,
        },
        Some("DRUID") => match spec {
            Some("restoration") => Role::Heal,
            Some("feral") => Role::Tank,
            _ => Role::Dps,
        },
        Some("SHAMAN") => match spec {
            Some("restoration") => Role::Heal,
            _ => Role::Dps,
        },
        _ => Role::Dps,
    }
}

/// Locale used when the export carries none
pub const DEFAULT_LANGUAGE: &str = "DE";

/// Canonicalize a client locale code
///
/// Known client locales map to two-letter codes; absent or blank input
/// yields [`DEFAULT_LANGUAGE`]; unknown codes pass through trimmed.
pub fn normalize_locale(locale: Option<&str>) -> String {
    let Some(raw) = locale.map(str::trim).filter(|l| !l.is_empty()) else {
        return DEFAULT_LANGUAGE.to_string();
    };

    let canonical = match raw {
        "enUS" | "enGB" | "EN" => "EN",
        "deDE" | "DE" => "DE",
        "frFR" | "FR" => "FR",
        "esES" | "esMX" | "ES" => "ES",
        "ruRU" | "RU" => "RU",
        other => other,
    };
    canonical.to_string()
}
