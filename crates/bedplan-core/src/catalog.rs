//! Reference data: crops, climate zones, gardens and weekly demand.
//!
//! A catalog is a JSON document. Every section is optional, and the
//! `config` section only needs the planner settings it overrides. A default
//! catalog is compiled into the library so callers can plan without a file.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    config::PlannerConfig,
    error::{PlannerError, Result},
    models::{ClimateZone, CropProfile, GardenInventory, Week},
};

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.json");

/// Market demand for one crop, in kg per week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct WeeklyDemand {
    /// Demand for weeks without a specific figure
    pub weekly_kg: f64,
    /// Per-week figures overriding `weekly_kg`
    pub weeks: BTreeMap<Week, f64>,
}

impl WeeklyDemand {
    pub fn kg_for(&self, week: Week) -> f64 {
        self.weeks.get(&week).copied().unwrap_or(self.weekly_kg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Catalog {
    pub crops: Vec<CropProfile>,
    pub zones: Vec<ClimateZone>,
    pub gardens: Vec<GardenInventory>,
    pub demand: BTreeMap<String, WeeklyDemand>,
    pub config: Option<PlannerConfig>,
}

impl Catalog {
    /// The catalog shipped with the library.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PlannerError::FileSystem {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Loads `path` when given, the built-in catalog otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    pub fn crop(&self, id: &str) -> Result<&CropProfile> {
        self.crops
            .iter()
            .find(|crop| crop.id == id)
            .ok_or_else(|| PlannerError::CropNotFound { id: id.to_string() })
    }

    pub fn zone(&self, id: &str) -> Result<&ClimateZone> {
        self.zones
            .iter()
            .find(|zone| zone.id == id)
            .ok_or_else(|| PlannerError::ZoneNotFound { id: id.to_string() })
    }

    /// Zone `id`, or the first zone of the catalog when `id` is `None`.
    /// A catalog without zones falls back to [`ClimateZone::default`].
    pub fn zone_or_default(&self, id: Option<&str>) -> Result<ClimateZone> {
        match id {
            Some(id) => self.zone(id).cloned(),
            None => Ok(self.zones.first().cloned().unwrap_or_default()),
        }
    }

    pub fn garden(&self, id: &str) -> Result<&GardenInventory> {
        self.gardens
            .iter()
            .find(|garden| garden.id == id)
            .ok_or_else(|| PlannerError::GardenNotFound { id: id.to_string() })
    }

    /// Planner configuration, with the catalog's overrides if any.
    pub fn planner_config(&self) -> PlannerConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Demand of every crop in `week`.
    pub fn demand_for(&self, week: Week) -> BTreeMap<String, f64> {
        self.demand
            .iter()
            .map(|(crop_id, demand)| (crop_id.clone(), demand.kg_for(week)))
            .collect()
    }

    /// Weekly demand curve of one crop, zero for crops without demand.
    pub fn demand_curve<'a>(&'a self, crop_id: &str) -> impl Fn(Week) -> f64 + 'a {
        let demand = self.demand.get(crop_id);
        move |week| demand.map_or(0.0, |demand| demand.kg_for(week))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.crop("tomato").is_ok());
        assert!(catalog.crop("lettuce").unwrap().is_nursery_raised());
        assert!(!catalog.gardens.is_empty());
        assert_eq!(catalog.zone_or_default(None).unwrap().id, "temperate");
    }

    #[test]
    fn test_unknown_ids() {
        let catalog = Catalog::builtin().unwrap();
        assert!(matches!(
            catalog.crop("okra"),
            Err(PlannerError::CropNotFound { .. })
        ));
        assert!(matches!(
            catalog.zone("arctic"),
            Err(PlannerError::ZoneNotFound { .. })
        ));
        assert!(matches!(
            catalog.garden("nowhere"),
            Err(PlannerError::GardenNotFound { .. })
        ));
    }

    #[test]
    fn test_demand_curve_prefers_week_figures() {
        let catalog = Catalog::from_json(
            r#"{"demand": {"carrot": {"weekly_kg": 12.0, "weeks": {"20": 30.0}}}}"#,
        )
        .unwrap();
        let curve = catalog.demand_curve("carrot");
        assert_eq!(curve(19), 12.0);
        assert_eq!(curve(20), 30.0);
        assert_eq!(catalog.demand_curve("leek")(20), 0.0);
        assert_eq!(catalog.demand_for(20).get("carrot"), Some(&30.0));
    }

    #[test]
    fn test_partial_config_override() {
        let catalog =
            Catalog::from_json(r#"{"config": {"soil_preparation_days": 21}}"#).unwrap();
        let config = catalog.planner_config();
        assert_eq!(config.soil_preparation_weeks(), 3);
        assert_eq!(config.safety_factor, 1.3);
        assert!(catalog.crops.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let result = Catalog::from_path("/nonexistent/catalog.json");
        assert!(matches!(result, Err(PlannerError::FileSystem { .. })));
    }
}
