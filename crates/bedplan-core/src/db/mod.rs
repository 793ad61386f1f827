//! SQLite storage of committed bed occupations.
//!
//! The planning engines never touch the database. [`Database`] only stores
//! occupations that went through a bed timeline successfully, and rebuilds
//! timelines from them.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod occupation_queries;

/// Connection to the occupations store.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the store at `path` and brings its schema up to
    /// date.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            Connection::open(path).db_context("Failed to open occupations database")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
