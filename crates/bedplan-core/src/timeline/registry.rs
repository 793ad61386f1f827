//! One timeline per bed, across every garden.

use std::collections::BTreeMap;

use super::IntervalTimeline;
use crate::models::{BedId, GardenInventory, Week};

/// Registry of bed timelines keyed by stable bed identifier.
#[derive(Debug, Clone, Default)]
pub struct TimelineRegistry {
    buffer_weeks: u32,
    timelines: BTreeMap<BedId, IntervalTimeline>,
}

impl TimelineRegistry {
    pub fn new(buffer_weeks: u32) -> Self {
        Self {
            buffer_weeks,
            timelines: BTreeMap::new(),
        }
    }

    /// Creates an empty timeline for every bed of every garden.
    pub fn from_inventory(gardens: &[GardenInventory], buffer_weeks: u32) -> Self {
        let mut registry = Self::new(buffer_weeks);
        for garden in gardens {
            for bed in garden.bed_ids() {
                registry.get_or_create(&bed);
            }
        }
        registry
    }

    /// Timeline of `bed`, created empty on first access.
    pub fn get_or_create(&mut self, bed: &BedId) -> &mut IntervalTimeline {
        let buffer_weeks = self.buffer_weeks;
        self.timelines
            .entry(bed.clone())
            .or_insert_with(|| IntervalTimeline::new(bed.clone(), buffer_weeks))
    }

    pub fn get(&self, bed: &BedId) -> Option<&IntervalTimeline> {
        self.timelines.get(bed)
    }

    /// Replaces the timeline of its bed.
    pub fn insert(&mut self, timeline: IntervalTimeline) {
        self.timelines.insert(timeline.bed().clone(), timeline);
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    pub fn timelines(&self) -> impl Iterator<Item = &IntervalTimeline> {
        self.timelines.values()
    }

    /// Beds able to take `[start, end)` without conflict, optionally
    /// restricted to one garden.
    pub fn find_available_beds(&self, start: Week, end: Week, garden_id: Option<&str>) -> Vec<&BedId> {
        self.timelines
            .iter()
            .filter(|(bed, _)| garden_id.is_none_or(|garden| bed.garden_id == garden))
            .filter(|(_, timeline)| timeline.is_free(start, end))
            .map(|(bed, _)| bed)
            .collect()
    }

    /// Removes the occupation of `series_id` wherever it is. Returns the bed
    /// it was found on.
    pub fn remove_series(&mut self, series_id: &str) -> Option<BedId> {
        self.timelines
            .iter_mut()
            .find_map(|(bed, timeline)| timeline.remove_occupation(series_id).then(|| bed.clone()))
    }
}
