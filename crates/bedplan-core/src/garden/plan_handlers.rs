//! Planning handlers for the Garden.
//!
//! These handlers resolve catalog identifiers, run the engines with the
//! garden's configuration and event sink, and return plain results. They do
//! not touch the database.

use super::Garden;
use crate::{
    demand::{BedDemandCalculator, PlanOptions},
    error::{PlannerError, Result},
    models::{
        CommitReport, CropProfile, GardenInventory, Plan, PlanReport, Portfolio, RetroReport,
        SeasonWindow, Series,
    },
    params::{CommitPlan, DeriveSeries, PlanCrop, PlanPortfolio},
    retro::RetroPlanner,
};

impl Garden {
    /// Demand calculator sharing this garden's configuration and events.
    pub fn calculator(&self) -> BedDemandCalculator {
        BedDemandCalculator::new(self.config.clone()).with_events(self.events.clone())
    }

    /// Retro-planner for `zone_id`, or for the catalog's first zone.
    pub fn retro_planner(&self, zone_id: Option<&str>) -> Result<RetroPlanner> {
        let zone = self.catalog.zone_or_default(zone_id)?;
        Ok(RetroPlanner::new(zone, self.config.clone()).with_events(self.events.clone()))
    }

    /// Plans one crop for its catalog demand and validates it against the
    /// target garden, or against every garden when none is named.
    pub fn plan_crop(&self, params: &PlanCrop) -> Result<PlanReport> {
        check_season(params.season)?;
        let crop = self.catalog.crop(&params.crop_id)?;
        let garden = match params.garden_id.as_deref() {
            Some(id) => Some(self.catalog.garden(id)?),
            None => None,
        };

        let zone = self.catalog.zone_or_default(params.zone_id.as_deref())?;

        let calculator = self.calculator();
        let plan = self.build_plan(
            &calculator,
            crop,
            params.fallow_gap_weeks,
            PlanOptions {
                season: params.season,
                maturity_level: params.maturity_level,
                bed_length_m: garden.map_or(crop.yields.reference_length_m, |g| g.bed_length_m),
                protection: params.protection,
                zone,
            },
        );
        let validation = match garden {
            Some(garden) => calculator.validate_plan(&plan, garden.bed_count),
            None => calculator.validate_portfolio(std::slice::from_ref(&plan), &self.catalog.gardens),
        };
        Ok(PlanReport { plan, validation })
    }

    /// Plans several crops, checks them against the whole inventory and
    /// estimates intercropping savings.
    pub fn plan_portfolio(&self, params: &PlanPortfolio) -> Result<Portfolio> {
        check_season(params.season)?;
        let crop_ids: Vec<&str> = if params.crop_ids.is_empty() {
            self.catalog.demand.keys().map(String::as_str).collect()
        } else {
            params.crop_ids.iter().map(String::as_str).collect()
        };

        let zone = self.catalog.zone_or_default(None)?;
        let calculator = self.calculator();
        let plans = crop_ids
            .into_iter()
            .map(|crop_id| {
                let crop = self.catalog.crop(crop_id)?;
                Ok(self.build_plan(
                    &calculator,
                    crop,
                    params.fallow_gap_weeks,
                    PlanOptions {
                        season: params.season,
                        maturity_level: params.maturity_level,
                        bed_length_m: crop.yields.reference_length_m,
                        zone: zone.clone(),
                        ..PlanOptions::default()
                    },
                ))
            })
            .collect::<Result<Vec<Plan>>>()?;

        Ok(Portfolio {
            validation: calculator.validate_portfolio(&plans, &self.catalog.gardens),
            savings: calculator.estimate_intercropping_savings(&plans),
            plans,
        })
    }

    /// Retro-plans a series from its harvest start, applies the optional
    /// date edit, then checks windows and schedules tasks.
    pub fn derive_series(&self, params: &DeriveSeries) -> Result<RetroReport> {
        let crop = self.catalog.crop(&params.crop_id)?;
        let planner = self.retro_planner(params.zone_id.as_deref())?;

        let mut series = Series {
            id: format!("{}-w{}", crop.id, params.harvest_start),
            crop_id: crop.id.clone(),
            bed_index: 1,
            rotation_index: 0,
            protection: params.protection,
            dates: planner.derive_dates(params.harvest_start, crop, params.protection),
            out_of_season: false,
        };
        if let Some(edit) = params.edit {
            series = planner.recompute_cascade(&series, edit.week, edit.anchor, crop);
        }

        Ok(RetroReport {
            crop_name: crop.name.clone(),
            validation: planner.validate_windows(&series.dates, crop),
            tasks: planner.generate_tasks(&series.dates, crop, &self.config.tasks.template),
            series,
        })
    }

    /// Plans a crop for a garden and commits it to consecutive beds.
    pub async fn commit_crop(&self, params: &CommitPlan) -> Result<CommitReport> {
        let plan_params = PlanCrop {
            garden_id: Some(params.garden_id.clone()),
            ..params.plan.clone()
        };
        let report = self.plan_crop(&plan_params)?;
        self.commit_plan(&report.plan, &params.garden_id, params.first_bed)
            .await
    }

    /// Gardens of the inventory.
    pub fn gardens(&self) -> &[GardenInventory] {
        &self.catalog.gardens
    }

    fn build_plan(
        &self,
        calculator: &BedDemandCalculator,
        crop: &CropProfile,
        fallow_gap_weeks: u32,
        options: PlanOptions,
    ) -> Plan {
        calculator.build_full_plan(
            crop,
            self.catalog.demand_curve(&crop.id),
            fallow_gap_weeks,
            &options,
        )
    }
}

fn check_season(season: SeasonWindow) -> Result<()> {
    if season.end < season.start {
        return Err(PlannerError::invalid_input("season").with_reason(format!(
            "season ends in week {} before it starts in week {}",
            season.end, season.start
        )));
    }
    Ok(())
}
