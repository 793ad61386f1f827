//! Tests for the retro-planning engine.

use super::*;
use crate::{
    events::RecordingSink,
    models::{WeekWindow, YieldTable},
};

fn tomato() -> CropProfile {
    CropProfile {
        id: "tomato".to_string(),
        name: "Tomato".to_string(),
        cycle_duration_weeks: 22,
        maturity_offset_weeks: 10,
        nursery_weeks: 6,
        harvest_window_weeks: 12,
        yields: YieldTable::single(30, 100.0),
        cuts_per_cycle: 1,
        max_rotations_per_season: Some(1),
        sowing_window: Some(WeekWindow::new(10, 16)),
        transplant_window: Some(WeekWindow::new(18, 24)),
        harvest_period: Some(WeekWindow::new(28, 40)),
        cycle_class: None,
        inputs: Default::default(),
    }
}

fn lettuce() -> CropProfile {
    CropProfile {
        id: "lettuce".to_string(),
        name: "Lettuce".to_string(),
        cycle_duration_weeks: 8,
        maturity_offset_weeks: 6,
        nursery_weeks: 3,
        harvest_window_weeks: 2,
        yields: YieldTable::single(30, 60.0),
        cuts_per_cycle: 1,
        max_rotations_per_season: Some(4),
        sowing_window: None,
        transplant_window: None,
        harvest_period: None,
        cycle_class: None,
        inputs: Default::default(),
    }
}

fn planner() -> RetroPlanner {
    RetroPlanner::new(ClimateZone::default(), PlannerConfig::default())
}

fn series_from(dates: DateSet, protection: ProtectionType) -> Series {
    Series {
        id: "tomato-b1-r1".to_string(),
        crop_id: "tomato".to_string(),
        bed_index: 1,
        rotation_index: 0,
        protection,
        dates,
        out_of_season: false,
    }
}

#[test]
fn test_derive_dates_backward_from_harvest() {
    let dates = planner().derive_dates(30, &tomato(), ProtectionType::OpenField);
    assert_eq!(
        dates,
        DateSet {
            sow: 14,
            transplant: 20,
            harvest_start: 30,
            harvest_end: 42,
            bed_release: 43,
        }
    );
    assert_eq!(dates.nursery_weeks(), 6);
    assert_eq!(dates.growth_weeks(), 10);
    assert_eq!(dates.harvest_weeks(), 12);
    assert_eq!(dates.occupation_weeks(), 23);
}

#[test]
fn test_greenhouse_shortens_maturity() {
    let planner = planner();
    // 70 days shortened by 15% is 59.5, rounded to 60 days, then 9 weeks.
    assert_eq!(planner.adjusted_maturity_weeks(&tomato(), ProtectionType::Greenhouse), 9);
    let dates = planner.derive_dates(30, &tomato(), ProtectionType::Greenhouse);
    assert_eq!(dates.transplant, 21);
    assert_eq!(dates.sow, 15);
}

#[test]
fn test_direct_sown_crop_sows_on_transplant_week() {
    let mut crop = lettuce();
    crop.nursery_weeks = 0;
    let dates = planner().derive_dates(24, &crop, ProtectionType::OpenField);
    assert_eq!(dates.sow, dates.transplant);
    assert_eq!(dates.transplant, 18);
}

#[test]
fn test_cascade_from_harvest_start_matches_fresh_derivation() {
    let planner = planner();
    for crop in [tomato(), lettuce()] {
        for protection in [
            ProtectionType::OpenField,
            ProtectionType::Tunnel,
            ProtectionType::Greenhouse,
        ] {
            for harvest_start in [20, 27, 35] {
                let fresh = planner.derive_dates(harvest_start, &crop, protection);
                let series = series_from(fresh, protection);
                let recomputed =
                    planner.recompute_cascade(&series, harvest_start, Anchor::HarvestStart, &crop);
                assert_eq!(recomputed.dates, fresh);
            }
        }
    }
}

#[test]
fn test_cascade_from_transplant_moves_everything_forward() {
    let planner = planner();
    let crop = tomato();
    let original = series_from(
        planner.derive_dates(30, &crop, ProtectionType::OpenField),
        ProtectionType::OpenField,
    );

    let updated = planner.recompute_cascade(&original, 22, Anchor::Transplant, &crop);
    assert_eq!(updated.dates.sow, 16);
    assert_eq!(updated.dates.transplant, 22);
    assert_eq!(updated.dates.harvest_start, 32);
    assert_eq!(updated.dates.harvest_end, 44);
    assert_eq!(updated.dates.bed_release, 45);

    // The input series is untouched.
    assert_eq!(original.dates.transplant, 20);
    assert_eq!(updated.id, original.id);
}

#[test]
fn test_cascade_from_sow() {
    let planner = planner();
    let crop = tomato();
    let original = series_from(
        planner.derive_dates(30, &crop, ProtectionType::OpenField),
        ProtectionType::OpenField,
    );

    let updated = planner.recompute_cascade(&original, 12, Anchor::Sow, &crop);
    assert_eq!(updated.dates.transplant, 18);
    assert_eq!(updated.dates.harvest_start, 28);
    assert_eq!(updated.dates.harvest_end, 40);
    assert!(updated.dates.harvest_start <= updated.dates.harvest_end);
    assert!(updated.dates.harvest_end <= updated.dates.bed_occupied_until());
}

#[test]
fn test_validate_windows_accepts_dates_with_soft_warning() {
    let planner = planner();
    let crop = tomato();
    let dates = planner.derive_dates(30, &crop, ProtectionType::OpenField);

    let validation = planner.validate_windows(&dates, &crop);
    assert!(validation.valid);
    assert!(validation.errors.is_empty());
    assert_eq!(validation.warnings.len(), 1);
    assert_eq!(
        validation.warnings[0].kind,
        WindowIssueKind::HarvestEndOutsidePeriod
    );
    assert_eq!(validation.warnings[0].suggested_week, Some(40));
    assert_eq!(validation.max_severity, Severity::Low);
}

#[test]
fn test_validate_windows_rejects_early_planting() {
    let planner = planner();
    let crop = tomato();
    let dates = planner.derive_dates(24, &crop, ProtectionType::OpenField);

    let validation = planner.validate_windows(&dates, &crop);
    assert!(!validation.valid);
    assert_eq!(validation.max_severity, Severity::High);

    let kinds: Vec<WindowIssueKind> = validation.errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![WindowIssueKind::SowTooEarly, WindowIssueKind::TransplantTooEarly]
    );
    assert_eq!(validation.errors[0].suggested_week, Some(10));
    assert_eq!(validation.errors[1].suggested_week, Some(18));

    assert!(validation
        .warnings
        .iter()
        .any(|w| w.kind == WindowIssueKind::PlantingBeforeLastFrost));
    assert!(validation
        .warnings
        .iter()
        .any(|w| w.kind == WindowIssueKind::HarvestStartOutsidePeriod));
}

#[test]
fn test_validate_windows_flags_late_harvest_frost() {
    let planner = planner();
    let crop = lettuce();
    let dates = planner.derive_dates(43, &crop, ProtectionType::OpenField);

    let validation = planner.validate_windows(&dates, &crop);
    assert!(validation.valid);
    assert_eq!(validation.warnings.len(), 1);
    assert_eq!(validation.warnings[0].kind, WindowIssueKind::HarvestAfterFirstFrost);
    assert_eq!(validation.max_severity, Severity::Medium);
}

#[test]
fn test_generate_tasks_sorted_with_lookups() {
    let planner = planner();
    let crop = tomato();
    let dates = planner.derive_dates(30, &crop, ProtectionType::OpenField);
    let template = vec![
        TaskSpec::new("staking", 60),
        TaskSpec::new("transplanting", 0),
        TaskSpec::new("bed preparation", -7),
        TaskSpec::new("pruning", 10),
    ];

    let tasks = planner.generate_tasks(&dates, &crop, &template);
    let schedule: Vec<(&str, Week)> = tasks.iter().map(|t| (t.name.as_str(), t.week)).collect();
    assert_eq!(
        schedule,
        vec![
            ("bed preparation", 19),
            ("transplanting", 20),
            ("pruning", 21),
            ("staking", 29),
        ]
    );
    assert_eq!(tasks[0].estimated_hours, 2.0);
    assert_eq!(tasks[2].estimated_hours, 1.0);
    assert_eq!(tasks[2].color, "#9e9e9e");
    assert!(tasks.iter().all(|t| t.crop_id == "tomato"));
}

#[test]
fn test_beds_required_with_safety_factor() {
    let planner = planner();
    let mut crop = tomato();
    assert_eq!(planner.beds_required(500.0, &crop, None), 7);
    assert_eq!(planner.beds_required(500.0, &crop, Some(1.0)), 5);

    crop.cuts_per_cycle = 3;
    assert_eq!(planner.beds_required(500.0, &crop, None), 3);
}

#[test]
fn test_beds_required_without_yield_reports_event() {
    let sink = RecordingSink::new();
    let planner = planner().with_events(sink.clone());
    let mut crop = tomato();
    crop.yields = YieldTable::default();

    assert_eq!(planner.beds_required(500.0, &crop, None), 0);
    assert_eq!(
        sink.events(),
        vec![PlanningEvent::MissingYield {
            crop_id: "tomato".to_string()
        }]
    );
}

#[test]
fn test_series_needed_for_season() {
    let planner = planner();
    let crop = lettuce();

    let starts = planner.series_needed_for_season(
        &crop,
        SeasonWindow::new(14, 40),
        ProtectionType::OpenField,
    );
    let harvests: Vec<Week> = starts.iter().map(|s| s.dates.harvest_start).collect();
    assert_eq!(harvests, vec![14, 18, 22, 26, 30, 34, 38]);
    assert_eq!(starts.last().map(|s| s.index), Some(6));

    let shorter = planner.series_needed_for_season(
        &crop,
        SeasonWindow::new(14, 39),
        ProtectionType::OpenField,
    );
    assert_eq!(shorter.len(), 6);
    assert!(shorter.iter().all(|s| s.dates.harvest_end <= 39));
}
