//! Planting instances and their key dates.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{BedId, Occupation, ProtectionType, Task, Week, WindowValidation};
use crate::error::Result;

/// Key dates of one planting, all expressed as week numbers.
///
/// The bed is held from `transplant` (equal to `sow` for direct-sown crops)
/// until `bed_release`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateSet {
    pub sow: Week,
    pub transplant: Week,
    pub harvest_start: Week,
    pub harvest_end: Week,
    pub bed_release: Week,
}

impl DateSet {
    pub fn nursery_weeks(&self) -> i32 {
        self.transplant - self.sow
    }

    pub fn growth_weeks(&self) -> i32 {
        self.harvest_start - self.transplant
    }

    pub fn harvest_weeks(&self) -> i32 {
        self.harvest_end - self.harvest_start
    }

    pub fn occupation_weeks(&self) -> i32 {
        self.bed_release - self.transplant
    }

    pub fn bed_occupied_from(&self) -> Week {
        self.transplant
    }

    pub fn bed_occupied_until(&self) -> Week {
        self.bed_release
    }
}

/// Date a user may edit, from which the other dates are re-derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    HarvestStart,
    Transplant,
    Sow,
}

impl Anchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::HarvestStart => "harvest_start",
            Anchor::Transplant => "transplant",
            Anchor::Sow => "sow",
        }
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "harvest_start" | "harvest" => Ok(Anchor::HarvestStart),
            "transplant" => Ok(Anchor::Transplant),
            "sow" => Ok(Anchor::Sow),
            _ => Err(format!("Invalid anchor: {s}")),
        }
    }
}

/// One concrete planting of a crop on one bed of its allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    pub id: String,
    pub crop_id: String,
    /// Bed within the crop's allocation, numbered from 1
    pub bed_index: u32,
    /// Successive planting on the same bed, numbered from 0
    pub rotation_index: u32,
    pub protection: ProtectionType,
    pub dates: DateSet,
    /// Harvest starts after the season ends
    pub out_of_season: bool,
}

impl Series {
    /// Occupation this series places on its bed.
    ///
    /// The interval runs from transplant to the end of harvest; the fallow
    /// stretch up to `bed_release` is the gap checked against the soil
    /// preparation buffer.
    pub fn to_occupation(&self, label: impl Into<String>) -> Result<Occupation> {
        Occupation::new(
            self.id.clone(),
            self.crop_id.clone(),
            label,
            self.dates.transplant,
            self.dates.harvest_end.max(self.dates.transplant + 1),
        )
    }

    /// Identifier of this series once committed to `bed`.
    ///
    /// Plan series are numbered within the crop's own allocation, so the
    /// same plan committed to other beds needs the garden bed in its id.
    ///
    /// ```
    /// # use bedplan_core::models::{BedId, DateSet, ProtectionType, Series};
    /// # let series = Series {
    /// #     id: "lettuce-b1-r2".into(), crop_id: "lettuce".into(), bed_index: 1,
    /// #     rotation_index: 1, protection: ProtectionType::OpenField,
    /// #     dates: DateSet { sow: 21, transplant: 24, harvest_start: 30, harvest_end: 32, bed_release: 33 },
    /// #     out_of_season: false,
    /// # };
    /// assert_eq!(series.placement_id(&BedId::new("main", 3)), "lettuce-b1-r2@main/3");
    /// ```
    pub fn placement_id(&self, bed: &BedId) -> String {
        format!("{}@{bed}", self.id)
    }
}

/// Candidate planting produced by the season-wide retro-planning sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeriesStart {
    pub index: u32,
    pub dates: DateSet,
}

/// A retro-planned series with its window checks and task schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetroReport {
    pub crop_name: String,
    pub series: Series,
    pub validation: WindowValidation,
    pub tasks: Vec<Task>,
}
