//! Database initialization
//!
//! Opens (or creates) the shared SQLite database and makes sure the schema
//! exists. Every step is idempotent, so calling [`init_database`] on an
//! existing database is safe.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Current schema version recorded in `schema_version`
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// How long a writer waits for the SQLite write lock before failing.
/// WAL mode lets readers continue while one import holds the lock.
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Pragmas set through connect options apply to every pooled connection
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create every table used by the import pipeline
///
/// Exposed separately so tests can prepare an in-memory pool.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_character_imports_table(pool).await?;
    record_schema_version(pool).await?;
    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn record_schema_version(pool: &SqlitePool) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(CURRENT_SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the character_imports table
///
/// `guid` is unique when present (SQLite allows any number of NULLs in a
/// UNIQUE column); `(name, realm)` is unique for every row.
pub async fn create_character_imports_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS character_imports (
            id TEXT PRIMARY KEY,
            guid TEXT UNIQUE,
            name TEXT NOT NULL,
            realm TEXT NOT NULL,
            level INTEGER,
            class_file TEXT,
            race_file TEXT,
            faction TEXT,
            guild_name TEXT,
            spec TEXT,
            role TEXT NOT NULL,
            professions TEXT NOT NULL DEFAULT '[]',
            language TEXT NOT NULL,
            exported_at TIMESTAMP,
            payload TEXT NOT NULL DEFAULT '{}',
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL,
            UNIQUE (name, realm)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_character_imports_realm ON character_imports(realm)")
        .execute(pool)
        .await?;

    Ok(())
}
