//! Connection bootstrap for the recipe document store.
//!
//! # Responsibility
//! - Open a store connection from a configured SQLite path or `file:` URI.
//! - Configure pragmas and bound the whole bootstrap by the connect timeout.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have migrations fully applied.
//! - Bootstrap that outlives the connect timeout is reported as failure.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use crate::config::StoreConfig;
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::time::{Duration, Instant};

const MAX_BUSY_TIMEOUT: Duration = Duration::from_millis(i32::MAX as u64);

/// Opens the store named by `config.uri` and applies pending migrations.
///
/// # Side effects
/// - Opens a database session that lives until the connection drops.
/// - Emits `db_open` logging events with duration and status.
///
/// # Errors
/// - `DbError::Sqlite` when the URI cannot be opened or bootstrapped.
/// - `DbError::ConnectTimeout` when bootstrap exceeds `connect_timeout`.
///
/// Lock waits are capped at `i32::MAX` milliseconds whatever the timeout.
pub fn open_store(config: &StoreConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start mode=uri database={}",
        config.database_name
    );

    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let opened = Connection::open_with_flags(config.uri.as_str(), flags).map_err(DbError::from);
    finish_open("uri", opened, config.connect_timeout, started_at)
}

/// Opens an in-memory store with migrations applied.
///
/// Used by tests and local tooling; behaves like a freshly provisioned store.
pub fn open_store_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let opened = Connection::open_in_memory().map_err(DbError::from);
    finish_open(
        "memory",
        opened,
        crate::config::DEFAULT_CONNECT_TIMEOUT,
        started_at,
    )
}

fn finish_open(
    mode: &str,
    opened: DbResult<Connection>,
    timeout: Duration,
    started_at: Instant,
) -> DbResult<Connection> {
    let mut conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
    };

    match bootstrap_connection(&mut conn, timeout, started_at) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(
    conn: &mut Connection,
    timeout: Duration,
    started_at: Instant,
) -> DbResult<()> {
    // rusqlite takes the busy timeout as `i32` milliseconds.
    conn.busy_timeout(timeout.min(MAX_BUSY_TIMEOUT))?;
    apply_migrations(conn)?;

    let elapsed = started_at.elapsed();
    if elapsed > timeout {
        return Err(DbError::ConnectTimeout {
            elapsed_ms: elapsed.as_millis(),
            timeout_ms: timeout.as_millis(),
        });
    }
    Ok(())
}
