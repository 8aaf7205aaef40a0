//! Process-scoped store connection.
//!
//! # Responsibility
//! - Own the one live store connection for the process lifetime.
//! - Hand out an immutable, shareable handle to every dispatch call.
//!
//! # Invariants
//! - A `ConnectionHolder` connects at most once; later calls reuse the handle.
//! - `Database` is never mutated after construction; driver access is
//!   serialized internally because `rusqlite::Connection` is not `Sync`.
//! - The session closes when the last `Arc<Database>` drops.

use super::open::{open_store, open_store_in_memory};
use super::DbResult;
use crate::config::{StoreConfig, DEFAULT_DATABASE_NAME};
use log::info;
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Name of the collection holding recipe documents.
pub const RECIPES_COLLECTION: &str = "recipes";

/// Live handle to one logical database of the document store.
pub struct Database {
    name: String,
    session_id: Uuid,
    conn: Mutex<Connection>,
}

impl Database {
    /// Establishes a new session using `config`.
    ///
    /// Fails when the URI cannot be opened or the bootstrap exceeds the
    /// configured connect timeout. No retry is attempted.
    pub fn connect(config: &StoreConfig) -> DbResult<Self> {
        let conn = open_store(config)?;
        Ok(Self::from_connection(config.database_name.clone(), conn))
    }

    /// Establishes an in-memory session bound to the default database name.
    pub fn in_memory() -> DbResult<Self> {
        let conn = open_store_in_memory()?;
        Ok(Self::from_connection(DEFAULT_DATABASE_NAME.to_string(), conn))
    }

    fn from_connection(name: String, conn: Connection) -> Self {
        let session_id = Uuid::new_v4();
        info!(
            "event=db_session module=db status=ok database={} session_id={}",
            name, session_id
        );
        Self {
            name,
            session_id,
            conn: Mutex::new(conn),
        }
    }

    /// Logical database this handle is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity of the underlying session; stable for the handle's lifetime.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Serialized access to the driver connection.
    ///
    /// Store operations are read-only, so a poisoned lock still guards a
    /// consistent connection and is recovered.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Debug for Database {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

/// Lazily-or-eagerly initialized holder for the process-wide `Database`.
#[derive(Debug, Default)]
pub struct ConnectionHolder {
    cell: OnceCell<Arc<Database>>,
}

impl ConnectionHolder {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns the held database, connecting on first use.
    ///
    /// A failed attempt leaves the holder empty; the caller treats it as fatal.
    pub fn get_or_connect(&self, config: &StoreConfig) -> DbResult<Arc<Database>> {
        self.cell
            .get_or_try_init(|| Database::connect(config).map(Arc::new))
            .map(Arc::clone)
    }

    /// Returns the held database if a connection was already established.
    pub fn get(&self) -> Option<Arc<Database>> {
        self.cell.get().cloned()
    }
}
