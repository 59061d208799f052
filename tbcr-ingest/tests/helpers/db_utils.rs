//! Database Test Utilities

use anyhow::Result;
use sqlx::SqlitePool;
use tbcr_common::db::init_database;
use tbcr_ingest::{CharacterImporter, RealmAllowList, SqliteCharacterStore};
use tempfile::TempDir;

/// Create an on-disk test database with the schema applied
///
/// Returns (TempDir, SqlitePool) - TempDir must be kept alive for duration of test
pub async fn create_test_db() -> Result<(TempDir, SqlitePool)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test_tbcr.db");
    let pool = init_database(&db_path).await?;
    Ok((temp_dir, pool))
}

/// Importer over `pool` that accepts any realm
pub fn create_test_importer(pool: &SqlitePool) -> CharacterImporter {
    CharacterImporter::new(
        SqliteCharacterStore::new(pool.clone()),
        RealmAllowList::allow_any(),
    )
}
