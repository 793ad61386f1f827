//! Construction of [`Garden`] facades.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::task;

use super::Garden;
use crate::{
    catalog::Catalog,
    db::Database,
    error::{PlannerError, Result},
    events::{default_sink, EventSink},
};

/// Configures where a [`Garden`] stores commitments, which catalog it plans
/// from and where its planning events go.
#[derive(Clone, Default)]
pub struct GardenBuilder {
    database_path: Option<PathBuf>,
    catalog: Option<Catalog>,
    events: Option<Arc<dyn EventSink>>,
}

impl GardenBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores commitments at `path`. `None` keeps the XDG data location,
    /// `$XDG_DATA_HOME/bedplan/bedplan.db`.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses `catalog` instead of the built-in one.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_events(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Builds the configured garden.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::FileSystem` if the database directory cannot be
    /// created, `PlannerError::Serialization` if the built-in catalog is
    /// malformed and `PlannerError::Database` if database initialization
    /// fails.
    pub async fn build(self) -> Result<Garden> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PlannerError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Catalog::builtin()?,
        };

        // Create the schema up front so a bad path fails here, not on the
        // first commit.
        let schema_path = db_path.clone();
        task::spawn_blocking(move || Database::new(&schema_path).map(drop))
        .await
        .map_err(PlannerError::join)??;

        Ok(Garden::new(
            db_path,
            catalog,
            self.events.unwrap_or_else(default_sink),
        ))
    }

    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("bedplan")
            .place_data_file("bedplan.db")
            .map_err(|e| PlannerError::XdgDirectory(e.to_string()))
    }
}
