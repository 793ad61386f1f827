//! Full crop plans and their validation against bed capacity.

use serde::{Deserialize, Serialize};

use super::{round1, BedDemandCalculator, SizingOptions};
use crate::{
    config::MaturityLevel,
    events::PlanningEvent,
    models::{
        AlertKind, ClimateZone, CropProfile, GardenInventory, Plan, PlanAlert, PlanValidation,
        ProtectionType, SeasonWindow, Severity, Week,
    },
};

/// Coverage below which a plan gets a soft alert, in percent.
const LOW_COVERAGE_PERCENT: u32 = 90;

/// Grower and season parameters of a full plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanOptions {
    pub season: SeasonWindow,
    pub maturity_level: MaturityLevel,
    pub bed_length_m: u32,
    pub protection: ProtectionType,
    /// Zone whose protection modifiers shift the series dates
    pub zone: ClimateZone,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            season: SeasonWindow::default(),
            maturity_level: MaturityLevel::default(),
            bed_length_m: 30,
            protection: ProtectionType::default(),
            zone: ClimateZone::default(),
        }
    }
}

impl BedDemandCalculator {
    /// Sizes, lays out and costs a crop for the demand returned by
    /// `demand_curve` over each week of the season.
    pub fn build_full_plan<F>(
        &self,
        crop: &CropProfile,
        demand_curve: F,
        fallow_gap_weeks: u32,
        options: &PlanOptions,
    ) -> Plan
    where
        F: Fn(Week) -> f64,
    {
        let total_demand_kg: f64 = options
            .season
            .weeks()
            .map(|week| demand_curve(week).max(0.0))
            .sum();

        let sizing = self.size_beds(
            crop,
            total_demand_kg,
            &SizingOptions {
                maturity_level: options.maturity_level,
                bed_length_m: options.bed_length_m,
                season_duration_weeks: options.season.duration(),
                fallow_gap_weeks,
            },
        );
        let layout =
            self.generate_staggered_series(crop, &sizing, sizing.beds_needed, fallow_gap_weeks, options);
        let inputs = self.estimate_inputs(crop, &layout.series);

        let coverage_ratio = if total_demand_kg <= 0.0 {
            100
        } else {
            (sizing.estimated_production_kg / total_demand_kg * 100.0).round() as u32
        };

        self.events.emit(&PlanningEvent::PlanBuilt {
            crop_id: crop.id.clone(),
            beds_needed: sizing.beds_needed,
            coverage_ratio,
        });

        Plan {
            crop_id: crop.id.clone(),
            crop_name: crop.name.clone(),
            season: options.season,
            total_demand_kg,
            sizing,
            series: layout.series,
            beds: layout.beds,
            gaps: layout.gaps,
            inputs,
            coverage_ratio,
        }
    }

    /// Checks a plan against the beds available to it.
    ///
    /// Only a shortage of beds invalidates the plan. Low coverage and
    /// series harvesting after the season are reported as soft alerts.
    pub fn validate_plan(&self, plan: &Plan, available_beds: u32) -> PlanValidation {
        let mut alerts = Vec::new();
        push_capacity_alert(&mut alerts, &plan.crop_name, plan.beds_needed(), available_beds);
        push_soft_alerts(&mut alerts, plan);
        finish(alerts, plan.beds_needed(), available_beds)
    }

    /// Checks several plans against the combined beds of `gardens`.
    pub fn validate_portfolio(&self, plans: &[Plan], gardens: &[GardenInventory]) -> PlanValidation {
        let required: u32 = plans.iter().map(Plan::beds_needed).sum();
        let available: u32 = gardens.iter().map(|garden| garden.bed_count).sum();

        let mut alerts = Vec::new();
        push_capacity_alert(&mut alerts, "All crops", required, available);
        for plan in plans {
            push_soft_alerts(&mut alerts, plan);
        }
        finish(alerts, required, available)
    }
}

fn push_capacity_alert(alerts: &mut Vec<PlanAlert>, subject: &str, required: u32, available: u32) {
    if required > available {
        alerts.push(PlanAlert {
            kind: AlertKind::Capacity,
            severity: Severity::High,
            blocking: true,
            message: format!(
                "{subject}: {required} beds required, {available} available ({} missing)",
                required - available
            ),
        });
    }
}

fn push_soft_alerts(alerts: &mut Vec<PlanAlert>, plan: &Plan) {
    if plan.total_demand_kg > 0.0 && plan.coverage_ratio < LOW_COVERAGE_PERCENT {
        alerts.push(PlanAlert {
            kind: AlertKind::LowCoverage,
            severity: Severity::Medium,
            blocking: false,
            message: format!(
                "{} covers {}% of demand ({:.0} kg planned for {:.0} kg)",
                plan.crop_name,
                plan.coverage_ratio,
                plan.sizing.estimated_production_kg,
                plan.total_demand_kg
            ),
        });
    }

    let late = plan.series.iter().filter(|s| s.out_of_season).count();
    if late > 0 {
        alerts.push(PlanAlert {
            kind: AlertKind::OutOfSeason,
            severity: Severity::Low,
            blocking: false,
            message: format!(
                "{}: {late} series start harvesting after week {}",
                plan.crop_name, plan.season.end
            ),
        });
    }
}

fn finish(alerts: Vec<PlanAlert>, required: u32, available: u32) -> PlanValidation {
    let utilization_percent =
        (available > 0).then(|| round1(f64::from(required) / f64::from(available) * 100.0));
    PlanValidation {
        valid: !alerts.iter().any(|alert| alert.blocking),
        alerts,
        utilization_percent,
    }
}
