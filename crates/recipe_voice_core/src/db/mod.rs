//! SQLite storage bootstrap, schema migrations and the shared connection.
//!
//! # Responsibility
//! - Open and configure the document-store connection.
//! - Apply schema migrations in deterministic order.
//! - Hold the single process-wide connection handle.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read application data before migrations succeed.
//! - At most one connection is established per `ConnectionHolder`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod holder;
pub mod migrations;
mod open;

pub use holder::{ConnectionHolder, Database, RECIPES_COLLECTION};
pub use open::{open_store, open_store_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    ConnectTimeout {
        elapsed_ms: u128,
        timeout_ms: u128,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::ConnectTimeout {
                elapsed_ms,
                timeout_ms,
            } => write!(
                f,
                "connection not established within {timeout_ms}ms (took {elapsed_ms}ms)"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::ConnectTimeout { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
