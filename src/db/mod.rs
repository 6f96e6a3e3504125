//! SQLite store for scraped papers.

pub mod papers;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::error::Result;

pub use papers::*;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS papers (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        conference  TEXT    NOT NULL,
        year        INTEGER NOT NULL,
        title       TEXT    NOT NULL,
        authors     TEXT    NOT NULL DEFAULT '',
        abstract    TEXT    NOT NULL DEFAULT '',
        created_at  TEXT    NOT NULL,
        updated_at  TEXT    NOT NULL,
        UNIQUE (conference, year, title)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_papers_conference_year ON papers (conference, year)",
];

/// Open the database at `database_url`, creating the file (and its parent
/// directory) if needed, and make sure the schema exists.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    if !in_memory {
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    // every connection to an in-memory database gets its own empty database,
    // so keep exactly one alive for the lifetime of the pool
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(4)
    };
    let pool = pool_options.connect_with(options).await?;

    init_schema(&pool).await?;
    debug!("Opened paper database at {}", database_url);
    Ok(pool)
}

/// Create tables and indexes that do not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
