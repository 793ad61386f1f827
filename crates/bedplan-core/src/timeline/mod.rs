//! Occupation timelines of individual beds.
//!
//! An [`IntervalTimeline`] owns the occupations of one bed, kept sorted by
//! start week at all times. Every mutation goes through
//! [`IntervalTimeline::add_occupation`], [`IntervalTimeline::move_occupation`]
//! or [`IntervalTimeline::remove_occupation`], and candidates are checked with
//! [`IntervalTimeline::detect_conflict`] before anything changes, so a stored
//! timeline never holds overlapping occupations nor successions shorter than
//! the soil preparation buffer.
//!
//! ```rust
//! use bedplan_core::{models::{BedId, Occupation}, timeline::IntervalTimeline};
//!
//! let mut bed = IntervalTimeline::new(BedId::new("north", 1), 2);
//! bed.add_occupation(Occupation::new("s1", "lettuce", "Lettuce", 10, 16)?).unwrap();
//!
//! // Week 17 leaves a single week to prepare the soil.
//! assert!(!bed.is_free(17, 22));
//! assert!(bed.is_free(18, 22));
//! # Ok::<(), bedplan_core::PlannerError>(())
//! ```

pub mod registry;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use registry::TimelineRegistry;

use crate::models::{
    BedId, ConflictResult, CropProfile, FreeSpace, IntercropOption, IntercropSuggestion,
    Neighbour, OccupancyStats, Occupation, Week,
};

/// First week considered by the whole-year queries.
pub const FIRST_WEEK: Week = 1;
/// Upper bound (exclusive) of the whole-year queries.
pub const LAST_WEEK: Week = 52;

/// Suggestions kept per free space.
const MAX_INTERCROP_OPTIONS: usize = 3;

/// Sorted, non-overlapping occupations of a single bed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntervalTimeline {
    bed: BedId,
    buffer_weeks: i32,
    occupations: Vec<Occupation>,
}

impl IntervalTimeline {
    /// Creates an empty timeline requiring `buffer_weeks` between
    /// successive occupations.
    pub fn new(bed: BedId, buffer_weeks: u32) -> Self {
        Self {
            bed,
            buffer_weeks: buffer_weeks as i32,
            occupations: Vec::new(),
        }
    }

    pub fn bed(&self) -> &BedId {
        &self.bed
    }

    pub fn buffer_weeks(&self) -> i32 {
        self.buffer_weeks
    }

    /// Occupations ordered by start week.
    pub fn occupations(&self) -> &[Occupation] {
        &self.occupations
    }

    pub fn len(&self) -> usize {
        self.occupations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupations.is_empty()
    }

    /// Inserts `candidate` at its sorted position if it conflicts with
    /// nothing. On rejection the timeline is left untouched and the conflict
    /// is returned.
    pub fn add_occupation(&mut self, candidate: Occupation) -> Result<(), ConflictResult> {
        let conflict = self.detect_conflict(candidate.start_week, candidate.end_week, None);
        if !conflict.is_none() {
            return Err(conflict);
        }
        self.insert_sorted(candidate);
        Ok(())
    }

    /// Removes the occupation of `series_id`. Returns whether one existed.
    pub fn remove_occupation(&mut self, series_id: &str) -> bool {
        let before = self.occupations.len();
        self.occupations.retain(|occ| occ.series_id != series_id);
        self.occupations.len() != before
    }

    /// Reschedules the occupation of `series_id` to `[start, end)`, checking
    /// conflicts against every other occupation. Returns `Ok(false)` when the
    /// series is not on this bed.
    pub fn move_occupation(
        &mut self,
        series_id: &str,
        start: Week,
        end: Week,
    ) -> Result<bool, ConflictResult> {
        let Some(position) = self
            .occupations
            .iter()
            .position(|occ| occ.series_id == series_id)
        else {
            return Ok(false);
        };
        let conflict = self.detect_conflict(start, end, Some(series_id));
        if !conflict.is_none() {
            return Err(conflict);
        }
        let mut moved = self.occupations.remove(position);
        moved.start_week = start;
        moved.end_week = end;
        self.insert_sorted(moved);
        Ok(true)
    }

    /// Checks `[start, end)` against every occupation except `exclude`.
    ///
    /// The first offending occupation wins. For each occupation an overlap
    /// is checked first, then a succession leaving less than the buffer.
    pub fn detect_conflict(&self, start: Week, end: Week, exclude: Option<&str>) -> ConflictResult {
        for occ in self
            .occupations
            .iter()
            .filter(|occ| exclude != Some(occ.series_id.as_str()))
        {
            if start < occ.end_week && occ.start_week < end {
                return ConflictResult::Overlap {
                    series_id: occ.series_id.clone(),
                    label: occ.label.clone(),
                    overlap_start: start.max(occ.start_week),
                    overlap_end: end.min(occ.end_week),
                };
            }

            let gap = if start >= occ.end_week {
                start - occ.end_week
            } else {
                occ.start_week - end
            };
            if gap < self.buffer_weeks {
                return ConflictResult::NonViableSuccession {
                    series_id: occ.series_id.clone(),
                    label: occ.label.clone(),
                    available_gap_weeks: gap,
                    required_gap_weeks: self.buffer_weeks,
                    missing_weeks: self.buffer_weeks - gap,
                };
            }
        }
        ConflictResult::None
    }

    /// Whether `[start, end)` can be occupied without any conflict.
    pub fn is_free(&self, start: Week, end: Week) -> bool {
        self.detect_conflict(start, end, None).is_none()
    }

    /// First occupation holding the bed during `week`.
    pub fn occupation_at(&self, week: Week) -> Option<&Occupation> {
        self.occupations.iter().find(|occ| occ.contains(week))
    }

    /// Idle stretches of `[from, to)`, each carrying the labels of the
    /// occupations around it.
    pub fn find_free_spaces(&self, from: Week, to: Week) -> Vec<FreeSpace> {
        let mut spaces = Vec::new();
        let mut cursor = from;
        let mut previous: Option<&Occupation> = None;

        for occ in self
            .occupations
            .iter()
            .filter(|occ| occ.end_week > from && occ.start_week < to)
        {
            if occ.start_week > cursor {
                spaces.push(FreeSpace {
                    start_week: cursor,
                    end_week: occ.start_week,
                    previous: previous.map(Neighbour::from),
                    next: Some(Neighbour::from(occ)),
                });
            }
            if occ.end_week > cursor {
                cursor = occ.end_week;
                previous = Some(occ);
            }
        }

        if cursor < to {
            spaces.push(FreeSpace {
                start_week: cursor,
                end_week: to,
                previous: previous.map(Neighbour::from),
                next: None,
            });
        }
        spaces
    }

    /// Free spaces over the whole year.
    pub fn free_spaces_in_year(&self) -> Vec<FreeSpace> {
        self.find_free_spaces(FIRST_WEEK, LAST_WEEK)
    }

    /// Ranks multi-cycle filler crops for each free space.
    ///
    /// One buffer is deducted on each side of a space. Crops that
    /// `rotations` resolves to a single rotation per season are never
    /// proposed as fillers. When `free_spaces` is `None` the whole year is
    /// scanned.
    pub fn suggest_intercrops<F>(
        &self,
        candidates: &[CropProfile],
        free_spaces: Option<&[FreeSpace]>,
        rotations: F,
    ) -> Vec<IntercropSuggestion>
    where
        F: Fn(&CropProfile) -> u32,
    {
        let spaces = match free_spaces {
            Some(spaces) => spaces.to_vec(),
            None => self.free_spaces_in_year(),
        };
        let fillers: Vec<&CropProfile> = candidates
            .iter()
            .filter(|crop| crop.cycle_duration_weeks > 0 && rotations(crop) >= 2)
            .collect();

        spaces
            .into_iter()
            .filter_map(|space| {
                let usable_weeks = space.duration() - 2 * self.buffer_weeks;
                if usable_weeks <= 0 {
                    return None;
                }

                let mut options: Vec<IntercropOption> = fillers
                    .iter()
                    .filter(|crop| crop.cycle_duration_weeks as i32 <= usable_weeks)
                    .map(|crop| IntercropOption {
                        crop_id: crop.id.clone(),
                        name: crop.name.clone(),
                        cycle_weeks: crop.cycle_duration_weeks,
                        yield_per_week_kg: crop.reference_yield_kg()
                            / f64::from(crop.cycle_duration_weeks),
                        best: false,
                    })
                    .collect();
                if options.is_empty() {
                    return None;
                }

                options.sort_by(|a, b| b.yield_per_week_kg.total_cmp(&a.yield_per_week_kg));
                options.truncate(MAX_INTERCROP_OPTIONS);
                options[0].best = true;

                Some(IntercropSuggestion {
                    free_space: space,
                    usable_weeks,
                    options,
                })
            })
            .collect()
    }

    /// Occupancy of `[from, to)`.
    pub fn occupancy_rate(&self, from: Week, to: Week) -> OccupancyStats {
        let total_duration = (to - from).max(0);
        let (occupied_duration, count) = self
            .occupations
            .iter()
            .map(|occ| occ.overlap_with(from, to))
            .filter(|weeks| *weeks > 0)
            .fold((0, 0), |(sum, count), weeks| (sum + weeks, count + 1));

        let ratio_percent = if total_duration > 0 {
            (f64::from(occupied_duration) / f64::from(total_duration) * 1000.0).round() / 10.0
        } else {
            0.0
        };

        OccupancyStats {
            total_duration,
            occupied_duration,
            free_duration: total_duration - occupied_duration,
            ratio_percent,
            count,
        }
    }

    /// Occupancy over the whole year.
    pub fn occupancy_in_year(&self) -> OccupancyStats {
        self.occupancy_rate(FIRST_WEEK, LAST_WEEK)
    }

    /// Inserts a stored occupation without checking it. Stored occupations
    /// were checked when they were committed.
    pub(crate) fn restore_occupation(&mut self, occupation: Occupation) {
        self.insert_sorted(occupation);
    }

    fn insert_sorted(&mut self, occupation: Occupation) {
        let at = self
            .occupations
            .partition_point(|occ| occ.start_week <= occupation.start_week);
        self.occupations.insert(at, occupation);
    }
}
