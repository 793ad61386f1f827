//! Data models for crops, seasons, bed occupations and plans.
//!
//! Reference data ([`CropProfile`], [`ClimateZone`], [`GardenInventory`]) is
//! immutable during a planning run. Everything else is derived: a [`Plan`] is
//! rebuilt from its inputs on every change, and [`FreeSpace`]s are computed
//! from a timeline's occupations whenever they are requested. Display
//! implementations live in [`crate::display::models`].
//!
//! All dates are integer week numbers ([`Week`]). Retro-planning may produce
//! weeks before week 1 (sowing in the previous year), so the type is signed.

pub mod commitment;
pub mod crop;
pub mod occupation;
pub mod plan;
pub mod season;
pub mod series;
pub mod task;
pub mod validation;


/// Week number within the planning year.
pub type Week = i32;

pub use commitment::{CommitOutcome, CommitReport, Commitment};
pub use crop::{CropProfile, CycleClass, InputProfile, ProtectionType, WeekWindow, YieldTable};
pub use occupation::{
    BedOverview, ConflictResult, FreeSpace, IntercropOption, IntercropSuggestion, Neighbour,
    OccupancyStats, Occupation,
};
pub use plan::{
    BedGap, BedSummary, GapKind, InputEstimate, Plan, PlanReport, Portfolio, Savings, SavingsLine,
    SizingMethod, SizingResult, StaggeredSeries,
};
pub use season::{BedId, ClimateZone, GardenInventory, SeasonWindow};
pub use series::{Anchor, DateSet, RetroReport, Series, SeriesStart};
pub use task::{Task, TaskSpec};
pub use validation::{
    AlertKind, PlanAlert, PlanValidation, Severity, WindowIssue, WindowIssueKind,
    WindowValidation,
};
