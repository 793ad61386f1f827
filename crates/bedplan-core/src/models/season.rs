//! Season, climate and bed inventory types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ProtectionType, Week};

/// Inclusive span of weeks in which production is expected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonWindow {
    pub start: Week,
    pub end: Week,
}

impl SeasonWindow {
    pub fn new(start: Week, end: Week) -> Self {
        Self { start, end }
    }

    /// Number of weeks in the season, both ends included.
    pub fn duration(&self) -> u32 {
        (self.end - self.start + 1).max(0) as u32
    }

    pub fn contains(&self, week: Week) -> bool {
        week >= self.start && week <= self.end
    }

    /// Iterates every week of the season.
    pub fn weeks(&self) -> impl Iterator<Item = Week> {
        self.start..=self.end
    }
}

impl Default for SeasonWindow {
    fn default() -> Self {
        Self { start: 14, end: 44 }
    }
}

/// Frost dates and protection modifiers of a climate zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClimateZone {
    pub id: String,
    pub name: String,
    /// Week of the last spring frost
    pub last_frost_week: Week,
    /// Week of the first autumn frost
    pub first_frost_week: Week,
    /// Relative change of the time to maturity per protection type,
    /// e.g. `-0.15` for a greenhouse shortening maturity by 15%
    #[serde(default)]
    pub maturity_modifiers: BTreeMap<ProtectionType, f64>,
}

impl ClimateZone {
    /// Maturity modifier for `protection`, zero when not configured.
    pub fn modifier(&self, protection: ProtectionType) -> f64 {
        self.maturity_modifiers
            .get(&protection)
            .copied()
            .unwrap_or(0.0)
    }
}

impl Default for ClimateZone {
    fn default() -> Self {
        Self {
            id: "temperate".to_string(),
            name: "Temperate".to_string(),
            last_frost_week: 17,
            first_frost_week: 43,
            maturity_modifiers: BTreeMap::from([
                (ProtectionType::OpenField, 0.0),
                (ProtectionType::Tunnel, -0.10),
                (ProtectionType::Greenhouse, -0.15),
            ]),
        }
    }
}

/// A garden and its beds, as provided by the bed inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GardenInventory {
    pub id: String,
    pub bed_count: u32,
    pub bed_length_m: u32,
}

impl GardenInventory {
    /// Identifiers of every bed of this garden, numbered from 1.
    pub fn bed_ids(&self) -> impl Iterator<Item = BedId> + '_ {
        (1..=self.bed_count).map(|index| BedId::new(&self.id, index))
    }
}

/// Stable bed identifier derived from its garden and 1-based index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BedId {
    pub garden_id: String,
    pub index: u32,
}

impl BedId {
    pub fn new(garden_id: impl Into<String>, index: u32) -> Self {
        Self {
            garden_id: garden_id.into(),
            index,
        }
    }
}
