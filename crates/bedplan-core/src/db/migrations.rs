//! Schema versioning through SQLite's `user_version` pragma.

use log::debug;

use crate::error::{DatabaseResultExt, PlannerError, Result};

/// Version written by this build after the schema is applied.
const SCHEMA_VERSION: i64 = 1;

impl super::Database {
    pub(super) fn initialize_schema(&self) -> Result<()> {
        let version: i64 = self
            .connection
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .db_context("Failed to read schema version")?;

        if version > SCHEMA_VERSION {
            return Err(PlannerError::Configuration {
                message: format!(
                    "database schema version {version} is newer than supported version {SCHEMA_VERSION}"
                ),
            });
        }
        if version == SCHEMA_VERSION {
            return Ok(());
        }

        debug!("Upgrading occupations schema from version {version} to {SCHEMA_VERSION}");
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;
        self.connection
            .pragma_update(None, "user_version", SCHEMA_VERSION)
            .db_context("Failed to record schema version")
    }
}
