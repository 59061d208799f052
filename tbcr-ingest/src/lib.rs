//! tbcr-ingest library interface
//!
//! Turns a character export string (`WPE2J|<json>` or `WPE2|<base64>`)
//! into one reconciled, persisted character record.

pub mod db;
pub mod decompress;
pub mod document;
pub mod envelope;
pub mod error;
pub mod heuristics;
pub mod importer;
pub mod realm;
pub mod store;
pub mod summary;

pub use crate::envelope::{decode_export, parse_envelope, ExportFormat};
pub use crate::error::{ImportError, ImportResult};
pub use crate::heuristics::{infer_role, infer_spec, normalize_locale, normalize_professions, Role};
pub use crate::importer::{CharacterImporter, ImportOutcome};
pub use crate::realm::{RealmAllowList, RealmPolicy};
pub use crate::store::{CharacterStore, IdentityKey, SqliteCharacterStore};
pub use crate::summary::{summarize, CharacterSummary};
