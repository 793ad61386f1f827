//! High-level garden API.
//!
//! A [`Garden`] ties the planning engines to reference data and to the
//! database of committed occupations. Planning handlers are synchronous and
//! never touch the database; occupation operations are async and run their
//! SQLite work on the blocking thread pool.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │ Plan handlers   │    │ Occupation ops  │    │    Database     │
//! │ (demand, retro) │───▶│ (commit, release│───▶│   (via db/)     │
//! │                 │    │  bed timelines) │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ```rust,no_run
//! use bedplan_core::{params::PlanCrop, GardenBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let garden = GardenBuilder::new()
//!     .with_database_path(Some("/tmp/bedplan.db"))
//!     .build()
//!     .await?;
//!
//! let report = garden.plan_crop(&PlanCrop::new("lettuce"))?;
//! let commits = garden.commit_plan(&report.plan, "main", 1).await?;
//! println!("{} series committed", commits.committed().count());
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc};

pub mod builder;
pub mod occupation_ops;
pub mod plan_handlers;

pub use builder::GardenBuilder;

use crate::{catalog::Catalog, config::PlannerConfig, events::EventSink};

/// Main entry point for planning against a garden.
pub struct Garden {
    pub(crate) db_path: PathBuf,
    pub(crate) catalog: Catalog,
    pub(crate) config: PlannerConfig,
    pub(crate) events: Arc<dyn EventSink>,
}

impl Garden {
    pub(crate) fn new(db_path: PathBuf, catalog: Catalog, events: Arc<dyn EventSink>) -> Self {
        let config = catalog.planner_config();
        Self {
            db_path,
            catalog,
            config,
            events,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Soil preparation buffer applied to every bed timeline.
    pub fn buffer_weeks(&self) -> u32 {
        self.config.soil_preparation_weeks()
    }
}
