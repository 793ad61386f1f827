//! Retro-planning: deriving a planting's dates backward from its harvest.
//!
//! The [`RetroPlanner`] carries the active [`ClimateZone`] and the planner
//! configuration; it holds no per-crop state. Given the week a grower wants
//! to start harvesting, it places transplanting and sowing before it using
//! the crop's maturity offset (adjusted for the protection type) and nursery
//! duration, then places harvest end and bed release after it.
//!
//! ```rust
//! use bedplan_core::{
//!     models::{CropProfile, ProtectionType, YieldTable},
//!     retro::RetroPlanner,
//!     ClimateZone, PlannerConfig,
//! };
//!
//! # let crop = CropProfile {
//! #     id: "lettuce".into(), name: "Lettuce".into(), cycle_duration_weeks: 8,
//! #     maturity_offset_weeks: 6, nursery_weeks: 3, harvest_window_weeks: 2,
//! #     yields: YieldTable::single(30, 60.0), cuts_per_cycle: 1,
//! #     max_rotations_per_season: Some(4), sowing_window: None,
//! #     transplant_window: None, harvest_period: None, cycle_class: None,
//! #     inputs: Default::default(),
//! # };
//! let planner = RetroPlanner::new(ClimateZone::default(), PlannerConfig::default());
//! let dates = planner.derive_dates(24, &crop, ProtectionType::OpenField);
//! assert_eq!(dates.transplant, 18);
//! assert_eq!(dates.sow, 15);
//! assert_eq!(dates.harvest_end, 26);
//! ```

mod cascade;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use self::cascade::{resolver, Anchors, Offsets};
use crate::{
    config::PlannerConfig,
    events::{default_sink, EventSink, PlanningEvent},
    models::{
        Anchor, ClimateZone, CropProfile, DateSet, ProtectionType, SeasonWindow, Series,
        SeriesStart, Severity, Task, TaskSpec, Week, WeekWindow, WindowIssue, WindowIssueKind,
        WindowValidation,
    },
};

/// Retro-planning engine for one climate zone.
pub struct RetroPlanner {
    zone: ClimateZone,
    config: PlannerConfig,
    events: Arc<dyn EventSink>,
}

impl RetroPlanner {
    pub fn new(zone: ClimateZone, config: PlannerConfig) -> Self {
        Self {
            zone,
            config,
            events: default_sink(),
        }
    }

    /// Routes diagnostic events to `sink`.
    pub fn with_events(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    pub fn zone(&self) -> &ClimateZone {
        &self.zone
    }

    /// Maturity offset in weeks once the zone's protection modifier is
    /// applied. The offset is scaled in days and rounded back to weeks.
    pub fn adjusted_maturity_weeks(&self, crop: &CropProfile, protection: ProtectionType) -> i32 {
        let days = f64::from(self.config.durations_for(crop).growth_days);
        let adjusted_days = (days * (1.0 + self.zone.modifier(protection))).round();
        ((adjusted_days / 7.0).round() as i32).max(0)
    }

    /// All dates of a planting whose harvest should start in
    /// `harvest_start`.
    pub fn derive_dates(
        &self,
        harvest_start: Week,
        crop: &CropProfile,
        protection: ProtectionType,
    ) -> DateSet {
        self.resolve(Anchor::HarvestStart, harvest_start, crop, protection)
    }

    /// Re-derives a series after one of its dates was edited.
    ///
    /// Whichever date is the anchor, the others are placed with the same
    /// offsets as [`RetroPlanner::derive_dates`]. The input is left untouched.
    pub fn recompute_cascade(
        &self,
        series: &Series,
        new_value: Week,
        anchor: Anchor,
        crop: &CropProfile,
    ) -> Series {
        Series {
            dates: self.resolve(anchor, new_value, crop, series.protection),
            ..series.clone()
        }
    }

    /// Checks derived dates against the crop's windows and the zone's frost
    /// dates.
    ///
    /// Sowing or transplanting outside the crop's windows is an error.
    /// Harvests outside the usual period and frost exposure are warnings.
    pub fn validate_windows(&self, dates: &DateSet, crop: &CropProfile) -> WindowValidation {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Some(window) = crop.sowing_window {
            if dates.sow < window.start {
                errors.push(issue(
                    WindowIssueKind::SowTooEarly,
                    Severity::High,
                    dates.sow,
                    Some(window.start),
                    format!("Sowing in week {} is before week {}", dates.sow, window.start),
                ));
            } else if dates.sow > window.end {
                errors.push(issue(
                    WindowIssueKind::SowTooLate,
                    Severity::High,
                    dates.sow,
                    Some(window.end),
                    format!("Sowing in week {} is after week {}", dates.sow, window.end),
                ));
            }
        }

        if let Some(window) = crop.transplant_window.filter(|_| crop.is_nursery_raised()) {
            if dates.transplant < window.start {
                errors.push(issue(
                    WindowIssueKind::TransplantTooEarly,
                    Severity::High,
                    dates.transplant,
                    Some(window.start),
                    format!(
                        "Transplanting in week {} is before week {}",
                        dates.transplant, window.start
                    ),
                ));
            } else if dates.transplant > window.end {
                errors.push(issue(
                    WindowIssueKind::TransplantTooLate,
                    Severity::High,
                    dates.transplant,
                    Some(window.end),
                    format!(
                        "Transplanting in week {} is after week {}",
                        dates.transplant, window.end
                    ),
                ));
            }
        }

        if let Some(period) = crop.harvest_period {
            if !period.contains(dates.harvest_start) {
                warnings.push(issue(
                    WindowIssueKind::HarvestStartOutsidePeriod,
                    Severity::Low,
                    dates.harvest_start,
                    Some(nearest(dates.harvest_start, period)),
                    format!(
                        "Harvest starting in week {} is outside the usual weeks {}-{}",
                        dates.harvest_start, period.start, period.end
                    ),
                ));
            }
            if !period.contains(dates.harvest_end) {
                warnings.push(issue(
                    WindowIssueKind::HarvestEndOutsidePeriod,
                    Severity::Low,
                    dates.harvest_end,
                    Some(nearest(dates.harvest_end, period)),
                    format!(
                        "Harvest ending in week {} is outside the usual weeks {}-{}",
                        dates.harvest_end, period.start, period.end
                    ),
                ));
            }
        }

        if dates.transplant < self.zone.last_frost_week {
            warnings.push(issue(
                WindowIssueKind::PlantingBeforeLastFrost,
                Severity::Medium,
                dates.transplant,
                Some(self.zone.last_frost_week),
                format!(
                    "Planting in week {} precedes the last frost (week {})",
                    dates.transplant, self.zone.last_frost_week
                ),
            ));
        }
        if dates.harvest_end > self.zone.first_frost_week {
            warnings.push(issue(
                WindowIssueKind::HarvestAfterFirstFrost,
                Severity::Medium,
                dates.harvest_end,
                Some(self.zone.first_frost_week),
                format!(
                    "Harvest ending in week {} follows the first frost (week {})",
                    dates.harvest_end, self.zone.first_frost_week
                ),
            ));
        }

        WindowValidation::from_issues(errors, warnings)
    }

    /// Schedules `template` relative to transplanting, ordered by week.
    pub fn generate_tasks(&self, dates: &DateSet, crop: &CropProfile, template: &[TaskSpec]) -> Vec<Task> {
        let catalog = &self.config.tasks;
        let mut tasks: Vec<Task> = template
            .iter()
            .map(|spec| Task {
                crop_id: crop.id.clone(),
                name: spec.name.clone(),
                week: dates.transplant + (f64::from(spec.offset_days) / 7.0).round() as i32,
                estimated_hours: catalog.hours_for(&spec.name),
                color: catalog.color_for(&spec.name).to_string(),
            })
            .collect();
        tasks.sort_by_key(|task| task.week);
        tasks
    }

    /// Quick bed estimate for a production target, with a safety margin.
    ///
    /// Uses the configured safety factor when `safety_factor` is `None`.
    pub fn beds_required(&self, target_kg: f64, crop: &CropProfile, safety_factor: Option<f64>) -> u32 {
        let per_bed = crop.cycle_yield_kg(crop.yields.reference_length_m);
        if per_bed <= 0.0 {
            self.events.emit(&PlanningEvent::MissingYield {
                crop_id: crop.id.clone(),
            });
            return 0;
        }
        let factor = safety_factor.unwrap_or(self.config.safety_factor);
        (target_kg.max(0.0) * factor / per_bed).ceil() as u32
    }

    /// Plantings spread over the season with half a cycle between harvest
    /// starts. Only plantings whose harvest ends within the season are kept.
    pub fn series_needed_for_season(
        &self,
        crop: &CropProfile,
        season: SeasonWindow,
        protection: ProtectionType,
    ) -> Vec<SeriesStart> {
        let step = crop.cycle_duration_weeks.div_ceil(2).max(1) as i32;
        (season.start..=season.end)
            .step_by(step as usize)
            .map(|week| self.derive_dates(week, crop, protection))
            .filter(|dates| dates.harvest_end <= season.end)
            .enumerate()
            .map(|(index, dates)| SeriesStart {
                index: index as u32,
                dates,
            })
            .collect()
    }

    /// Dates of a planting placed from `week` on the `anchor` date. Every
    /// derivation, backward or forward, goes through here.
    pub(crate) fn resolve(
        &self,
        anchor: Anchor,
        week: Week,
        crop: &CropProfile,
        protection: ProtectionType,
    ) -> DateSet {
        let durations = self.config.durations_for(crop);
        let offsets = Offsets {
            nursery: durations.nursery_weeks as i32,
            maturity: self.adjusted_maturity_weeks(crop, protection),
        };
        self.complete(resolver(anchor)(week, offsets), durations.harvest_weeks)
    }

    /// Places harvest end and bed release after harvest start.
    fn complete(&self, anchors: Anchors, harvest_weeks: u32) -> DateSet {
        let harvest_end = anchors.harvest_start + harvest_weeks as i32;
        DateSet {
            sow: anchors.sow,
            transplant: anchors.transplant,
            harvest_start: anchors.harvest_start,
            harvest_end,
            bed_release: harvest_end + self.config.cleanup_buffer_weeks as i32,
        }
    }
}

/// Closest week of `window` to `week`.
fn nearest(week: Week, window: WeekWindow) -> Week {
    if week < window.start {
        window.start
    } else {
        window.end
    }
}

fn issue(
    kind: WindowIssueKind,
    severity: Severity,
    week: Week,
    suggested_week: Option<Week>,
    message: String,
) -> WindowIssue {
    WindowIssue {
        kind,
        severity,
        week,
        suggested_week,
        message,
    }
}
