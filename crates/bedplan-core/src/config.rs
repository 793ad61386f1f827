//! Planner configuration.
//!
//! Every lookup table the engines consult (maturity coefficients, rotation
//! classes, agronomic durations, task workloads, intercropping caps) lives in
//! [`PlannerConfig`], which is handed to the engines at construction. All
//! structs deserialize with defaults so a catalog file only needs to carry
//! the values it overrides.

use std::{
    collections::{BTreeMap, BTreeSet},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::models::{CropProfile, CycleClass, TaskSpec};

/// Grower experience, which scales expected yields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaturityLevel {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

impl MaturityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaturityLevel::Beginner => "beginner",
            MaturityLevel::Intermediate => "intermediate",
            MaturityLevel::Expert => "expert",
        }
    }
}

impl FromStr for MaturityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" | "debutant" => Ok(MaturityLevel::Beginner),
            "intermediate" => Ok(MaturityLevel::Intermediate),
            "expert" => Ok(MaturityLevel::Expert),
            _ => Err(format!("Invalid maturity level: {s}")),
        }
    }
}

/// Yield coefficient and description of a maturity level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaturityProfile {
    pub coefficient: f64,
    pub label: String,
    pub description: String,
}

impl MaturityProfile {
    fn new(coefficient: f64, label: &str, description: &str) -> Self {
        Self {
            coefficient,
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// Explicit crop-identity membership in each rotation class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CycleClassTable {
    pub long: BTreeSet<String>,
    pub medium: BTreeSet<String>,
    pub fast: BTreeSet<String>,
}

impl CycleClassTable {
    pub fn lookup(&self, crop_id: &str) -> Option<CycleClass> {
        if self.long.contains(crop_id) {
            Some(CycleClass::Long)
        } else if self.medium.contains(crop_id) {
            Some(CycleClass::Medium)
        } else if self.fast.contains(crop_id) {
            Some(CycleClass::Fast)
        } else {
            None
        }
    }

    fn with_defaults() -> Self {
        let set = |ids: &[&str]| ids.iter().map(|id| id.to_string()).collect();
        Self {
            long: set(&[
                "tomato", "eggplant", "pepper", "cucumber", "zucchini", "squash", "leek",
                "celeriac",
            ]),
            medium: set(&[
                "carrot", "beet", "cabbage", "fennel", "kohlrabi", "onion", "bean",
            ]),
            fast: set(&["radish", "lettuce", "spinach", "arugula", "mesclun", "turnip"]),
        }
    }
}

/// Per-class fallbacks: default rotation counts and the occupation
/// thresholds used when a crop is not listed in [`CycleClassTable`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassDefaults {
    pub long_rotations: u32,
    pub medium_rotations: u32,
    pub fast_rotations: u32,
    /// Occupation from which a crop counts as long
    pub long_threshold_days: u32,
    /// Occupation from which a crop counts as medium
    pub medium_threshold_days: u32,
}

impl ClassDefaults {
    pub fn rotations_for(&self, class: CycleClass) -> u32 {
        match class {
            CycleClass::Long => self.long_rotations,
            CycleClass::Medium => self.medium_rotations,
            CycleClass::Fast => self.fast_rotations,
        }
    }

    pub fn classify_days(&self, occupation_days: u32) -> CycleClass {
        if occupation_days >= self.long_threshold_days {
            CycleClass::Long
        } else if occupation_days >= self.medium_threshold_days {
            CycleClass::Medium
        } else {
            CycleClass::Fast
        }
    }
}

impl Default for ClassDefaults {
    fn default() -> Self {
        Self {
            long_rotations: 1,
            medium_rotations: 2,
            fast_rotations: 4,
            long_threshold_days: 90,
            medium_threshold_days: 45,
        }
    }
}

/// Agronomic overrides for one crop. Missing values fall back to the
/// crop profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct AgronomicEntry {
    pub nursery_days: Option<u32>,
    pub growth_days: Option<u32>,
    pub harvest_days: Option<u32>,
    pub rotations: Option<u32>,
}

/// Converts a day count to whole weeks, rounding up.
pub fn days_to_weeks(days: u32) -> u32 {
    days.div_ceil(7)
}

/// Agronomic durations of one crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropDurations {
    pub nursery_weeks: u32,
    /// Transplanting (or direct sowing) to first harvest, before any
    /// protection modifier
    pub growth_days: u32,
    pub harvest_weeks: u32,
}

/// Workload and colour of cultivation tasks, plus the default template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TaskCatalog {
    pub hours: BTreeMap<String, f64>,
    pub colors: BTreeMap<String, String>,
    pub default_hours: f64,
    pub default_color: String,
    pub template: Vec<TaskSpec>,
}

impl TaskCatalog {
    pub fn hours_for(&self, task: &str) -> f64 {
        self.hours.get(task).copied().unwrap_or(self.default_hours)
    }

    pub fn color_for(&self, task: &str) -> &str {
        self.colors
            .get(task)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }
}

impl Default for TaskCatalog {
    fn default() -> Self {
        let entries: [(&str, f64, &str); 6] = [
            ("bed preparation", 2.0, "#8d6e63"),
            ("transplanting", 3.0, "#4caf50"),
            ("weeding", 1.5, "#cddc39"),
            ("irrigation check", 0.5, "#03a9f4"),
            ("harvest", 4.0, "#ff9800"),
            ("clearing", 1.0, "#795548"),
        ];
        Self {
            hours: entries
                .iter()
                .map(|(name, hours, _)| (name.to_string(), *hours))
                .collect(),
            colors: entries
                .iter()
                .map(|(name, _, color)| (name.to_string(), color.to_string()))
                .collect(),
            default_hours: 1.0,
            default_color: "#9e9e9e".to_string(),
            template: vec![
                TaskSpec::new("bed preparation", -7),
                TaskSpec::new("transplanting", 0),
                TaskSpec::new("weeding", 14),
                TaskSpec::new("irrigation check", 21),
                TaskSpec::new("weeding", 35),
            ],
        }
    }
}

/// Share of host windows each filler crop may claim when estimating
/// intercropping savings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SavingsPolicy {
    pub filler_caps: BTreeMap<String, f64>,
}

impl Default for SavingsPolicy {
    fn default() -> Self {
        Self {
            filler_caps: BTreeMap::from([
                ("radish".to_string(), 0.40),
                ("lettuce".to_string(), 0.30),
                ("spinach".to_string(), 0.20),
            ]),
        }
    }
}

/// Unit costs used by input estimates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputCosts {
    pub substrate_cost_per_litre: f64,
}

impl Default for InputCosts {
    fn default() -> Self {
        Self {
            substrate_cost_per_litre: 0.12,
        }
    }
}

/// Configuration shared by every planning engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Minimum idle time between two occupations of a bed
    pub soil_preparation_days: u32,
    /// Weeks between end of harvest and bed release in retro-planning
    pub cleanup_buffer_weeks: u32,
    /// Series whose harvest starts later than this after the season are
    /// dropped
    pub late_harvest_tolerance_weeks: u32,
    /// Upper bound of the offset between parallel beds
    pub max_stagger_weeks: u32,
    /// Bed gaps at least this long are flagged for intercropping
    pub min_intercrop_gap_weeks: u32,
    /// Margin applied by the quick bed estimate
    pub safety_factor: f64,
    pub maturity_levels: BTreeMap<MaturityLevel, MaturityProfile>,
    pub cycle_classes: CycleClassTable,
    pub class_defaults: ClassDefaults,
    pub agronomy: BTreeMap<String, AgronomicEntry>,
    pub tasks: TaskCatalog,
    pub savings: SavingsPolicy,
    pub inputs: InputCosts,
}

impl PlannerConfig {
    /// Soil preparation buffer in whole weeks.
    pub fn soil_preparation_weeks(&self) -> u32 {
        days_to_weeks(self.soil_preparation_days)
    }

    /// Yield coefficient for `level`; unknown levels do not scale yields.
    pub fn maturity_coefficient(&self, level: MaturityLevel) -> f64 {
        self.maturity_levels
            .get(&level)
            .map(|profile| profile.coefficient)
            .unwrap_or(1.0)
    }

    pub fn agronomy_for(&self, crop_id: &str) -> Option<&AgronomicEntry> {
        self.agronomy.get(crop_id)
    }

    /// Durations of `crop`, from the agronomic table where it has them and
    /// from the crop profile otherwise.
    pub fn durations_for(&self, crop: &CropProfile) -> CropDurations {
        let entry = self.agronomy_for(&crop.id);
        CropDurations {
            nursery_weeks: entry
                .and_then(|e| e.nursery_days)
                .map_or(crop.nursery_weeks, days_to_weeks),
            growth_days: entry
                .and_then(|e| e.growth_days)
                .unwrap_or(crop.maturity_offset_weeks * 7),
            harvest_weeks: entry
                .and_then(|e| e.harvest_days)
                .map_or(crop.harvest_window_weeks, days_to_weeks),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let rotations = |n: u32| AgronomicEntry {
            rotations: Some(n),
            ..Default::default()
        };
        Self {
            soil_preparation_days: 14,
            cleanup_buffer_weeks: 1,
            late_harvest_tolerance_weeks: 6,
            max_stagger_weeks: 3,
            min_intercrop_gap_weeks: 3,
            safety_factor: 1.3,
            maturity_levels: BTreeMap::from([
                (
                    MaturityLevel::Beginner,
                    MaturityProfile::new(0.70, "Beginner", "First seasons, learning the crops"),
                ),
                (
                    MaturityLevel::Intermediate,
                    MaturityProfile::new(0.85, "Intermediate", "Established routines"),
                ),
                (
                    MaturityLevel::Expert,
                    MaturityProfile::new(1.00, "Expert", "Reference yields are reached"),
                ),
            ]),
            cycle_classes: CycleClassTable::with_defaults(),
            class_defaults: ClassDefaults::default(),
            agronomy: BTreeMap::from([
                ("tomato".to_string(), rotations(1)),
                ("carrot".to_string(), rotations(2)),
                ("lettuce".to_string(), rotations(4)),
                ("radish".to_string(), rotations(5)),
            ]),
            tasks: TaskCatalog::default(),
            savings: SavingsPolicy::default(),
            inputs: InputCosts::default(),
        }
    }
}
