//! Parameter structures for garden operations.
//!
//! These structures carry the inputs of the [`Garden`](crate::garden::Garden)
//! handlers without any framework-specific derives, so every interface (the
//! CLI today) converts its own argument types into them:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │ Garden handlers │
//! │  (clap derives) │───▶│ (serde only)    │───▶│                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    config::MaturityLevel,
    models::{Anchor, ProtectionType, SeasonWindow, Week},
};

/// Parameters for planning one crop against its catalog demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanCrop {
    pub crop_id: String,
    /// Idle weeks between two series on the same bed
    pub fallow_gap_weeks: u32,
    pub season: SeasonWindow,
    #[serde(default)]
    pub maturity_level: MaturityLevel,
    /// Garden whose bed length and bed count apply
    pub garden_id: Option<String>,
    #[serde(default)]
    pub protection: ProtectionType,
    /// Climate zone; the catalog's first zone when absent
    #[serde(default)]
    pub zone_id: Option<String>,
}

impl PlanCrop {
    pub fn new(crop_id: impl Into<String>) -> Self {
        Self {
            crop_id: crop_id.into(),
            fallow_gap_weeks: 2,
            season: SeasonWindow::default(),
            maturity_level: MaturityLevel::default(),
            garden_id: None,
            protection: ProtectionType::default(),
            zone_id: None,
        }
    }
}

/// Parameters for planning several crops together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanPortfolio {
    /// Crops to plan; every crop with catalog demand when empty
    #[serde(default)]
    pub crop_ids: Vec<String>,
    pub fallow_gap_weeks: u32,
    pub season: SeasonWindow,
    #[serde(default)]
    pub maturity_level: MaturityLevel,
}

/// A date edited by the grower, from which the series is re-derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateEdit {
    pub anchor: Anchor,
    pub week: Week,
}

/// Parameters for retro-planning a single series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeriveSeries {
    pub crop_id: String,
    pub harvest_start: Week,
    #[serde(default)]
    pub protection: ProtectionType,
    /// Climate zone; the catalog's first zone when absent
    pub zone_id: Option<String>,
    /// Optional edit applied after the initial derivation
    pub edit: Option<DateEdit>,
}

/// Parameters for committing a crop plan to consecutive garden beds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitPlan {
    #[serde(flatten)]
    pub plan: PlanCrop,
    pub garden_id: String,
    /// First bed of the run of beds receiving the plan, numbered from 1
    pub first_bed: u32,
}

/// Parameters identifying a committed series.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeriesRef {
    pub series_id: String,
}

/// Parameters for inspecting one bed over a range of weeks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BedQuery {
    pub garden_id: String,
    pub bed_index: u32,
    pub from: Week,
    pub to: Week,
}

/// Parameters for listing committed occupations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListCommitments {
    pub garden_id: Option<String>,
}
