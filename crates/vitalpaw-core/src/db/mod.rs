//! Database layer for the clinic directory store.

mod schema;
mod users;
mod pets;
mod appointments;
mod medical_records;
mod shop;

pub use schema::*;
pub use shop::CheckoutOutcome;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// SQLite store for users, pets, appointments, records and the shop.
///
/// All clinic state lives behind this one connection; callers that share it
/// across threads wrap it in a mutex.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the clinic store at `path`, creating the file and schema if missing.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Fresh clinic store that lives only as long as the connection.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Apply the clinic schema; safe on an existing file.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Underlying connection, for ad-hoc queries in tests and tooling.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
