//! Core library for the bedplan vegetable-bed planner.
//!
//! The crate sizes market-garden beds for a demand curve, lays successive
//! series out over those beds, retro-plans sowing and transplanting from a
//! target harvest week, and tracks which beds are occupied when.
//!
//! # Architecture
//!
//! - **Engines**: [`timeline`] (per-bed occupation intervals), [`retro`]
//!   (date derivation and task scheduling) and [`demand`] (bed sizing and
//!   plan validation) are pure computations over [`models`] and a
//!   [`PlannerConfig`]. They report fallbacks through [`events`].
//! - **Reference data**: a [`Catalog`] of crops, climate zones, gardens and
//!   demand, loaded from JSON.
//! - **Garden facade**: [`Garden`] resolves catalog identifiers, runs the
//!   engines and persists committed occupations in SQLite through [`db`].
//! - **Display**: models render as markdown (see [`display`]).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bedplan_core::{params::PlanCrop, GardenBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let garden = GardenBuilder::new()
//!     .with_database_path(Some("bedplan.db"))
//!     .build()
//!     .await?;
//!
//! let mut params = PlanCrop::new("lettuce");
//! params.garden_id = Some("main".to_string());
//! let report = garden.plan_crop(&params)?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod db;
pub mod demand;
pub mod display;
pub mod error;
pub mod events;
pub mod garden;
pub mod models;
pub mod params;
pub mod retro;
pub mod timeline;

// Re-export commonly used types
pub use catalog::Catalog;
pub use config::{MaturityLevel, PlannerConfig};
pub use db::Database;
pub use demand::BedDemandCalculator;
pub use error::{PlannerError, Result};
pub use events::{EventSink, LogSink, NullSink, PlanningEvent, RecordingSink};
pub use garden::{Garden, GardenBuilder};
pub use models::{
    BedId, ClimateZone, ConflictResult, CropProfile, Occupation, Plan, ProtectionType,
    SeasonWindow, Series, Week,
};
pub use retro::RetroPlanner;
pub use timeline::{IntervalTimeline, TimelineRegistry};
