//! Sizing results and per-crop plans.

use serde::{Deserialize, Serialize};

use super::{CycleClass, PlanValidation, SeasonWindow, Series, Week};

/// Formula used to size a crop's beds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SizingMethod {
    /// Weekly harvest capacity of a bed held all season (long crops)
    Capacity,
    /// Successive series per bed (medium and fast crops)
    Rotations,
}

impl SizingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizingMethod::Capacity => "capacity",
            SizingMethod::Rotations => "rotations",
        }
    }
}

/// How many beds a crop needs and what they are expected to produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizingResult {
    pub crop_id: String,
    pub cycle_class: CycleClass,
    pub method: SizingMethod,
    pub beds_needed: u32,
    /// Rotations achieved per bed, always at least one
    pub rotations: u32,
    /// Series required to meet demand
    pub series_needed: u32,
    /// Yield of one series on one bed before the maturity coefficient
    pub reference_yield_kg: f64,
    pub maturity_coefficient: f64,
    pub yield_per_bed_per_season_kg: f64,
    pub estimated_production_kg: f64,
    /// Capacity method only
    pub weekly_demand_kg: Option<f64>,
    /// Capacity method only
    pub weekly_capacity_per_bed_kg: Option<f64>,
    /// Rotation method only: cycle plus fallow gap
    pub effective_cycle_weeks: Option<u32>,
}

/// Occupation summary of one bed of a crop's allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BedSummary {
    pub bed_index: u32,
    pub series_count: u32,
    pub first_week: Week,
    pub last_occupied_week: Week,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    PreSeason,
    PostSeason,
}

/// Unused stretch `[start_week, end_week)` of a planned bed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BedGap {
    pub bed_index: u32,
    pub kind: GapKind,
    pub start_week: Week,
    pub end_week: Week,
    /// Long enough to host a filler crop
    pub intercrop_ready: bool,
}

impl BedGap {
    pub fn weeks(&self) -> i32 {
        self.end_week - self.start_week
    }
}

/// Series laid out over a crop's beds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaggeredSeries {
    pub series: Vec<Series>,
    pub beds: Vec<BedSummary>,
    pub gaps: Vec<BedGap>,
    /// Offset between parallel beds
    pub stagger_weeks: u32,
    /// Growth, harvest and fallow of one rotation
    pub rotation_weeks: u32,
}

/// Consumables derived from the number of series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputEstimate {
    pub seed_count: u32,
    pub seed_weight_g: f64,
    pub substrate_litres: f64,
    pub tray_count: u32,
    pub cost: f64,
}

/// Complete plan for one crop. Recomputed from scratch whenever an input
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub crop_id: String,
    pub crop_name: String,
    pub season: SeasonWindow,
    pub total_demand_kg: f64,
    pub sizing: SizingResult,
    pub series: Vec<Series>,
    pub beds: Vec<BedSummary>,
    pub gaps: Vec<BedGap>,
    pub inputs: InputEstimate,
    /// Estimated production over demand, in percent
    pub coverage_ratio: u32,
}

impl Plan {
    pub fn beds_needed(&self) -> u32 {
        self.sizing.beds_needed
    }

    pub fn in_season_series(&self) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(|series| !series.out_of_season)
    }
}

/// Bed savings attributed to one filler crop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsLine {
    pub crop_id: String,
    pub cap_fraction: f64,
    pub beds_saved: u32,
    pub description: String,
}

/// Heuristic estimate of beds saved by intercropping fillers under hosts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Savings {
    /// Host beds offering filler windows
    pub host_windows: u32,
    pub total_beds_saved: u32,
    pub lines: Vec<SavingsLine>,
}

/// A plan and its validation against the garden it targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanReport {
    pub plan: Plan,
    pub validation: PlanValidation,
}

/// Plans of several crops checked against the whole bed inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Portfolio {
    pub plans: Vec<Plan>,
    pub validation: PlanValidation,
    pub savings: Savings,
}
