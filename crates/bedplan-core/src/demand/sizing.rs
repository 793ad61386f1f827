//! Bed sizing by cycle class.

use serde::{Deserialize, Serialize};

use super::{ceil_ratio, BedDemandCalculator};
use crate::{
    config::MaturityLevel,
    events::PlanningEvent,
    models::{CropProfile, SizingMethod, SizingResult},
};

/// Grower and season parameters of a sizing run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SizingOptions {
    pub maturity_level: MaturityLevel,
    pub bed_length_m: u32,
    pub season_duration_weeks: u32,
    pub fallow_gap_weeks: u32,
}

impl Default for SizingOptions {
    fn default() -> Self {
        Self {
            maturity_level: MaturityLevel::default(),
            bed_length_m: 30,
            season_duration_weeks: 31,
            fallow_gap_weeks: 2,
        }
    }
}

impl BedDemandCalculator {
    /// Beds needed to produce `season_demand_kg` of `crop`.
    ///
    /// Long crops use the capacity formula, where beds are sized on weekly
    /// harvest and rotations are fixed at one. Other crops use the rotation
    /// formula: the season is divided into cycles of crop plus fallow and the
    /// required series are spread over the rotations that fit.
    pub fn size_beds(
        &self,
        crop: &CropProfile,
        season_demand_kg: f64,
        options: &SizingOptions,
    ) -> SizingResult {
        let cycle_class = self.classify_cycle(crop);
        let maturity_coefficient = self.config.maturity_coefficient(options.maturity_level);
        let reference_yield_kg = crop.cycle_yield_kg(options.bed_length_m);
        let series_yield_kg = reference_yield_kg * maturity_coefficient;
        let demand = season_demand_kg.max(0.0);

        if series_yield_kg <= 0.0 {
            self.events.emit(&PlanningEvent::MissingYield {
                crop_id: crop.id.clone(),
            });
        }

        let mut result = SizingResult {
            crop_id: crop.id.clone(),
            cycle_class,
            method: SizingMethod::Rotations,
            beds_needed: 0,
            rotations: 1,
            series_needed: 0,
            reference_yield_kg,
            maturity_coefficient,
            yield_per_bed_per_season_kg: 0.0,
            estimated_production_kg: 0.0,
            weekly_demand_kg: None,
            weekly_capacity_per_bed_kg: None,
            effective_cycle_weeks: None,
        };

        if cycle_class.is_rotational() {
            let max_rotations = self.resolve_rotations(crop);
            let effective_cycle = crop.cycle_duration_weeks + options.fallow_gap_weeks;
            let fitting = options
                .season_duration_weeks
                .checked_div(effective_cycle)
                .unwrap_or(max_rotations);
            result.rotations = max_rotations.min(fitting).max(1);
            result.series_needed = ceil_ratio(demand, series_yield_kg);
            result.beds_needed = result.series_needed.div_ceil(result.rotations);
            result.effective_cycle_weeks = Some(effective_cycle);
        } else {
            let weekly_demand = demand / f64::from(options.season_duration_weeks.max(1));
            let weekly_capacity = series_yield_kg / f64::from(crop.harvest_window_weeks.max(1));
            result.method = SizingMethod::Capacity;
            result.beds_needed = ceil_ratio(weekly_demand, weekly_capacity);
            result.series_needed = result.beds_needed;
            result.weekly_demand_kg = Some(weekly_demand);
            result.weekly_capacity_per_bed_kg = Some(weekly_capacity);
        }

        result.yield_per_bed_per_season_kg = series_yield_kg * f64::from(result.rotations);
        result.estimated_production_kg =
            f64::from(result.beds_needed) * result.yield_per_bed_per_season_kg;
        result
    }
}
