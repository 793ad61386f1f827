//! Bed occupations and the values derived from them.

use serde::{Deserialize, Serialize};

use super::{BedId, Severity, Week};
use crate::error::{PlannerError, Result};

/// A half-open interval `[start_week, end_week)` during which a series
/// holds a bed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Occupation {
    pub series_id: String,
    pub crop_id: String,
    /// Human readable label shown next to free spaces and conflicts
    pub label: String,
    /// First occupied week (inclusive)
    pub start_week: Week,
    /// First free week after the occupation (exclusive)
    pub end_week: Week,
}

impl Occupation {
    /// Builds an occupation, rejecting empty or inverted intervals.
    pub fn new(
        series_id: impl Into<String>,
        crop_id: impl Into<String>,
        label: impl Into<String>,
        start_week: Week,
        end_week: Week,
    ) -> Result<Self> {
        if end_week <= start_week {
            return Err(PlannerError::invalid_input("end_week").with_reason(format!(
                "occupation must end after it starts ({start_week} >= {end_week})"
            )));
        }
        Ok(Self {
            series_id: series_id.into(),
            crop_id: crop_id.into(),
            label: label.into(),
            start_week,
            end_week,
        })
    }

    pub fn duration(&self) -> i32 {
        self.end_week - self.start_week
    }

    /// Weeks of this occupation falling inside `[from, to)`.
    pub fn overlap_with(&self, from: Week, to: Week) -> i32 {
        (self.end_week.min(to) - self.start_week.max(from)).max(0)
    }

    pub fn contains(&self, week: Week) -> bool {
        week >= self.start_week && week < self.end_week
    }
}

/// Reference to an occupation bounding a free space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Neighbour {
    pub series_id: String,
    pub label: String,
}

impl From<&Occupation> for Neighbour {
    fn from(occupation: &Occupation) -> Self {
        Self {
            series_id: occupation.series_id.clone(),
            label: occupation.label.clone(),
        }
    }
}

/// Idle stretch `[start_week, end_week)` of a bed. Derived on demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FreeSpace {
    pub start_week: Week,
    pub end_week: Week,
    /// Occupation ending where this space starts
    pub previous: Option<Neighbour>,
    /// Occupation starting where this space ends
    pub next: Option<Neighbour>,
}

impl FreeSpace {
    pub fn duration(&self) -> i32 {
        self.end_week - self.start_week
    }
}

/// Outcome of checking a candidate interval against a bed timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConflictResult {
    /// The candidate fits
    None,
    /// The candidate shares weeks with an existing occupation
    Overlap {
        series_id: String,
        label: String,
        overlap_start: Week,
        overlap_end: Week,
    },
    /// The candidate touches an occupation without leaving time to prepare
    /// the soil
    NonViableSuccession {
        series_id: String,
        label: String,
        available_gap_weeks: i32,
        required_gap_weeks: i32,
        missing_weeks: i32,
    },
}

impl ConflictResult {
    pub fn is_none(&self) -> bool {
        matches!(self, ConflictResult::None)
    }

    pub fn severity(&self) -> Severity {
        match self {
            ConflictResult::None => Severity::None,
            ConflictResult::Overlap { .. } => Severity::High,
            ConflictResult::NonViableSuccession { .. } => Severity::Medium,
        }
    }

    /// Series the candidate collides with, if any.
    pub fn conflicting_series(&self) -> Option<&str> {
        match self {
            ConflictResult::None => None,
            ConflictResult::Overlap { series_id, .. }
            | ConflictResult::NonViableSuccession { series_id, .. } => Some(series_id),
        }
    }
}

/// Occupancy statistics of a bed over a range of weeks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OccupancyStats {
    pub total_duration: i32,
    pub occupied_duration: i32,
    pub free_duration: i32,
    /// Occupied share of the range, rounded to one decimal
    pub ratio_percent: f64,
    /// Occupations touching the range
    pub count: usize,
}

/// One ranked filler crop for a free space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntercropOption {
    pub crop_id: String,
    pub name: String,
    pub cycle_weeks: u32,
    pub yield_per_week_kg: f64,
    /// Highest yield-per-week candidate for the space
    pub best: bool,
}

/// Filler crops that fit a free space once soil preparation is deducted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntercropSuggestion {
    pub free_space: FreeSpace,
    pub usable_weeks: i32,
    pub options: Vec<IntercropOption>,
}

/// Everything known about one bed over a range of weeks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BedOverview {
    pub bed: BedId,
    pub from: Week,
    pub to: Week,
    pub occupations: Vec<Occupation>,
    pub free_spaces: Vec<FreeSpace>,
    pub stats: OccupancyStats,
    pub intercrops: Vec<IntercropSuggestion>,
}
