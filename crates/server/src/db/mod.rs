//! Database operations for the cafe store.
//!
//! # Database: SQLite
//!
//! ## Tables
//!
//! - `cafe` - The only table. `id` is `AUTOINCREMENT` so ids of deleted rows
//!   are never handed out again; `name` is `UNIQUE`.
//!
//! # Schema
//!
//! There are no migrations. [`init_schema`] runs an idempotent
//! `CREATE TABLE IF NOT EXISTS` at startup.

pub mod cafes;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use cafes::CafeRepository;

/// How long a connection waits on a locked database before failing a write.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_CAFE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS cafe (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        name           VARCHAR(250) NOT NULL UNIQUE,
        map_url        VARCHAR(500) NOT NULL,
        img_url        VARCHAR(500) NOT NULL,
        location       VARCHAR(250) NOT NULL,
        seats          VARCHAR(250) NOT NULL,
        has_toilet     BOOLEAN NOT NULL,
        has_wifi       BOOLEAN NOT NULL,
        has_sockets    BOOLEAN NOT NULL,
        can_take_calls BOOLEAN NOT NULL,
        coffee_price   VARCHAR(250)
    )
";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (duplicate name or missing required field).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A random pick was requested but the table has no rows.
    #[error("no cafes in the store")]
    EmptyStore,
}

/// Create a SQLite connection pool, creating the database file if missing.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be opened.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a pool over a private in-memory database.
///
/// Every SQLite connection to `:memory:` opens its own empty database, so the
/// pool is pinned to a single connection that is never idled out or recycled.
/// Data is lost when the pool is closed.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}

/// Create the `cafe` table if it does not exist yet.
///
/// # Errors
///
/// Returns `sqlx::Error` if the statement fails.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_CAFE_TABLE).execute(pool).await?;
    tracing::debug!("cafe schema ready");
    Ok(())
}
