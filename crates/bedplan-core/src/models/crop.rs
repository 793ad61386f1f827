//! Crop reference data: agronomic offsets, yields and valid week windows.

use std::{collections::BTreeMap, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Week;

/// Inclusive range of week numbers during which an action is allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekWindow {
    /// First allowed week
    pub start: Week,
    /// Last allowed week
    pub end: Week,
}

impl WeekWindow {
    pub fn new(start: Week, end: Week) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, week: Week) -> bool {
        week >= self.start && week <= self.end
    }
}

/// Rotation class of a crop.
///
/// Long crops hold their bed for most of the season and are sized on weekly
/// harvest capacity; medium and fast crops are sized on how many successive
/// series a bed can carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CycleClass {
    Long,
    Medium,
    Fast,
}

impl CycleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleClass::Long => "long",
            CycleClass::Medium => "medium",
            CycleClass::Fast => "fast",
        }
    }

    /// Whether crops of this class are sized by successive rotations.
    pub fn is_rotational(&self) -> bool {
        !matches!(self, CycleClass::Long)
    }
}

impl FromStr for CycleClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long" => Ok(CycleClass::Long),
            "medium" | "medium_rotation" => Ok(CycleClass::Medium),
            "fast" | "fast_rotation" => Ok(CycleClass::Fast),
            _ => Err(format!("Invalid cycle class: {s}")),
        }
    }
}

/// Cultivation protection, which modifies the time to maturity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionType {
    #[default]
    OpenField,
    Tunnel,
    Greenhouse,
}

impl ProtectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtectionType::OpenField => "open_field",
            ProtectionType::Tunnel => "tunnel",
            ProtectionType::Greenhouse => "greenhouse",
        }
    }
}

impl FromStr for ProtectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "open_field" | "open" | "field" => Ok(ProtectionType::OpenField),
            "tunnel" => Ok(ProtectionType::Tunnel),
            "greenhouse" => Ok(ProtectionType::Greenhouse),
            _ => Err(format!("Invalid protection type: {s}")),
        }
    }
}

/// Yield of one series on one bed, keyed by bed length in metres.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct YieldTable {
    /// Bed length the reference yield refers to
    pub reference_length_m: u32,
    /// Known yields (kg per series per bed) by bed length
    pub per_length_kg: BTreeMap<u32, f64>,
}

impl YieldTable {
    /// Table holding a single entry for the reference length.
    pub fn single(reference_length_m: u32, kg: f64) -> Self {
        Self {
            reference_length_m,
            per_length_kg: BTreeMap::from([(reference_length_m, kg)]),
        }
    }

    /// Yield for the reference bed length.
    pub fn reference(&self) -> f64 {
        self.for_length(self.reference_length_m)
    }

    /// Yield for a bed of `length_m` metres.
    ///
    /// Exact table entries win; otherwise the closest known length is scaled
    /// linearly. An empty table yields zero.
    pub fn for_length(&self, length_m: u32) -> f64 {
        if let Some(kg) = self.per_length_kg.get(&length_m) {
            return *kg;
        }
        self.per_length_kg
            .iter()
            .filter(|(len, _)| **len > 0)
            .min_by_key(|(len, _)| len.abs_diff(length_m))
            .map(|(len, kg)| kg * f64::from(length_m) / f64::from(*len))
            .unwrap_or(0.0)
    }
}

/// Per-series consumables used for input estimates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputProfile {
    /// Seeds sown for one series on one bed
    pub seeds_per_series: u32,
    /// Weight of a thousand seeds in grams
    pub thousand_seed_weight_g: f64,
    /// Cells per nursery tray
    pub cells_per_tray: u32,
    /// Substrate needed to fill one tray
    pub substrate_litres_per_tray: f64,
    /// Seed price per thousand seeds
    pub seed_cost_per_thousand: f64,
}

impl Default for InputProfile {
    fn default() -> Self {
        Self {
            seeds_per_series: 300,
            thousand_seed_weight_g: 2.0,
            cells_per_tray: 104,
            substrate_litres_per_tray: 4.5,
            seed_cost_per_thousand: 5.0,
        }
    }
}

fn one() -> u32 {
    1
}

/// Immutable agronomic profile of a crop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropProfile {
    /// Stable crop identity, e.g. `tomato`
    pub id: String,
    /// Display name
    pub name: String,
    /// Weeks the crop holds its bed
    pub cycle_duration_weeks: u32,
    /// Weeks from sowing (direct) or transplanting to first harvest
    pub maturity_offset_weeks: u32,
    /// Weeks spent in the nursery, zero when direct-sown
    #[serde(default)]
    pub nursery_weeks: u32,
    /// Weeks from first to last harvest
    pub harvest_window_weeks: u32,
    pub yields: YieldTable,
    /// Harvest cuts per cycle, for cut-and-come-again crops
    #[serde(default = "one")]
    pub cuts_per_cycle: u32,
    #[serde(default)]
    pub max_rotations_per_season: Option<u32>,
    #[serde(default)]
    pub sowing_window: Option<WeekWindow>,
    #[serde(default)]
    pub transplant_window: Option<WeekWindow>,
    /// Usual harvest period, outside of which harvests are flagged
    #[serde(default)]
    pub harvest_period: Option<WeekWindow>,
    /// Rotation class hint used when the identity is not classified
    #[serde(default)]
    pub cycle_class: Option<CycleClass>,
    #[serde(default)]
    pub inputs: InputProfile,
}

impl CropProfile {
    pub fn is_nursery_raised(&self) -> bool {
        self.nursery_weeks > 0
    }

    /// Yield of one series on a reference bed.
    pub fn reference_yield_kg(&self) -> f64 {
        self.yields.reference()
    }

    /// Total yield of one cycle, accounting for repeated cuts.
    pub fn cycle_yield_kg(&self, bed_length_m: u32) -> f64 {
        self.yields.for_length(bed_length_m) * f64::from(self.cuts_per_cycle.max(1))
    }

    /// Bed occupation in days.
    pub fn occupation_days(&self) -> u32 {
        self.cycle_duration_weeks * 7
    }
}
