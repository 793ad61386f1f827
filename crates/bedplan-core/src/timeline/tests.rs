//! Tests for bed timelines and the registry.

use super::*;
use crate::models::{GardenInventory, Severity, YieldTable};

fn occ(series_id: &str, start: Week, end: Week) -> Occupation {
    Occupation::new(series_id, "crop", format!("Crop {series_id}"), start, end)
        .expect("valid occupation")
}

fn bed(buffer_weeks: u32) -> IntervalTimeline {
    IntervalTimeline::new(BedId::new("north", 1), buffer_weeks)
}

fn configured(crop: &CropProfile) -> u32 {
    crop.max_rotations_per_season.unwrap_or(1)
}

fn filler(id: &str, cycle_weeks: u32, yield_kg: f64, rotations: Option<u32>) -> CropProfile {
    CropProfile {
        id: id.to_string(),
        name: id.to_string(),
        cycle_duration_weeks: cycle_weeks,
        maturity_offset_weeks: cycle_weeks,
        nursery_weeks: 0,
        harvest_window_weeks: 1,
        yields: YieldTable::single(30, yield_kg),
        cuts_per_cycle: 1,
        max_rotations_per_season: rotations,
        sowing_window: None,
        transplant_window: None,
        harvest_period: None,
        cycle_class: None,
        inputs: Default::default(),
    }
}

#[test]
fn test_add_occupation_keeps_start_order() {
    let mut timeline = bed(0);
    timeline.add_occupation(occ("c", 30, 35)).unwrap();
    timeline.add_occupation(occ("a", 5, 10)).unwrap();
    timeline.add_occupation(occ("b", 15, 20)).unwrap();

    let ids: Vec<&str> = timeline
        .occupations()
        .iter()
        .map(|o| o.series_id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn test_overlap_is_rejected_without_mutation() {
    let mut timeline = bed(2);
    timeline.add_occupation(occ("a", 10, 20)).unwrap();

    let conflict = timeline.add_occupation(occ("b", 18, 25)).unwrap_err();
    assert_eq!(
        conflict,
        ConflictResult::Overlap {
            series_id: "a".to_string(),
            label: "Crop a".to_string(),
            overlap_start: 18,
            overlap_end: 20,
        }
    );
    assert_eq!(conflict.severity(), Severity::High);
    assert_eq!(timeline.len(), 1);
}

#[test]
fn test_short_succession_reports_missing_weeks() {
    let mut timeline = bed(2);
    timeline.add_occupation(occ("a", 10, 20)).unwrap();

    match timeline.detect_conflict(21, 30, None) {
        ConflictResult::NonViableSuccession {
            available_gap_weeks,
            required_gap_weeks,
            missing_weeks,
            ..
        } => {
            assert_eq!(available_gap_weeks, 1);
            assert_eq!(required_gap_weeks, 2);
            assert_eq!(missing_weeks, 1);
        }
        other => panic!("expected a succession conflict, got {other:?}"),
    }

    // Same check when the candidate ends right before the occupation.
    let before = timeline.detect_conflict(2, 10, None);
    assert_eq!(before.severity(), Severity::Medium);
    assert!(timeline.is_free(22, 30));
    assert!(timeline.is_free(2, 8));
}

#[test]
fn test_overlap_detection_is_symmetric() {
    let intervals = [(1, 5), (3, 8), (5, 9), (8, 12), (0, 20), (10, 11)];
    for &(a_start, a_end) in &intervals {
        for &(b_start, b_end) in &intervals {
            let mut holds_a = bed(0);
            holds_a.add_occupation(occ("a", a_start, a_end)).unwrap();
            let mut holds_b = bed(0);
            holds_b.add_occupation(occ("b", b_start, b_end)).unwrap();

            let a_then_b = matches!(
                holds_a.detect_conflict(b_start, b_end, None),
                ConflictResult::Overlap { .. }
            );
            let b_then_a = matches!(
                holds_b.detect_conflict(a_start, a_end, None),
                ConflictResult::Overlap { .. }
            );
            assert_eq!(a_then_b, b_then_a, "A={a_start}..{a_end} B={b_start}..{b_end}");
        }
    }
}

#[test]
fn test_accepted_occupations_never_overlap_and_respect_buffer() {
    let mut timeline = bed(2);
    let candidates = [
        (10, 15),
        (12, 18),
        (16, 20),
        (17, 22),
        (1, 8),
        (2, 9),
        (24, 30),
        (31, 40),
        (40, 44),
        (42, 50),
    ];
    for (i, (start, end)) in candidates.into_iter().enumerate() {
        let _ = timeline.add_occupation(occ(&format!("s{i}"), start, end));
    }

    for pair in timeline.occupations().windows(2) {
        assert!(pair[0].start_week <= pair[1].start_week);
        assert!(pair[0].end_week <= pair[1].start_week, "overlap in {pair:?}");
        assert!(pair[1].start_week - pair[0].end_week >= 2, "buffer in {pair:?}");
    }
    assert!(timeline.len() >= 4);
}

#[test]
fn test_exclude_series_ignores_itself() {
    let mut timeline = bed(2);
    timeline.add_occupation(occ("a", 10, 20)).unwrap();
    assert!(timeline.detect_conflict(12, 22, Some("a")).is_none());
}

#[test]
fn test_move_occupation() {
    let mut timeline = bed(2);
    timeline.add_occupation(occ("a", 10, 20)).unwrap();
    timeline.add_occupation(occ("b", 30, 35)).unwrap();

    assert_eq!(timeline.move_occupation("a", 12, 22), Ok(true));
    assert_eq!(timeline.occupations()[0].start_week, 12);

    let conflict = timeline.move_occupation("a", 25, 31).unwrap_err();
    assert_eq!(conflict.conflicting_series(), Some("b"));
    assert_eq!(timeline.occupations()[0].end_week, 22);

    assert_eq!(timeline.move_occupation("missing", 1, 2), Ok(false));

    assert_eq!(timeline.move_occupation("b", 2, 8), Ok(true));
    assert_eq!(timeline.occupations()[0].series_id, "b");
}

#[test]
fn test_remove_occupation() {
    let mut timeline = bed(2);
    timeline.add_occupation(occ("a", 10, 20)).unwrap();
    assert!(timeline.remove_occupation("a"));
    assert!(!timeline.remove_occupation("a"));
    assert!(timeline.is_empty());
}

#[test]
fn test_free_spaces_of_empty_bed() {
    let spaces = bed(2).find_free_spaces(1, 52);
    assert_eq!(spaces.len(), 1);
    assert_eq!(spaces[0].start_week, 1);
    assert_eq!(spaces[0].end_week, 52);
    assert_eq!(spaces[0].duration(), 51);
    assert!(spaces[0].previous.is_none() && spaces[0].next.is_none());
}

#[test]
fn test_free_spaces_carry_neighbour_labels() {
    let mut timeline = bed(2);
    timeline.add_occupation(occ("a", 10, 20)).unwrap();
    timeline.add_occupation(occ("b", 30, 40)).unwrap();

    let spaces = timeline.find_free_spaces(1, 52);
    let ranges: Vec<(Week, Week)> = spaces.iter().map(|s| (s.start_week, s.end_week)).collect();
    assert_eq!(ranges, vec![(1, 10), (20, 30), (40, 52)]);

    assert_eq!(spaces[0].next.as_ref().map(|n| n.label.as_str()), Some("Crop a"));
    assert_eq!(spaces[1].previous.as_ref().map(|n| n.label.as_str()), Some("Crop a"));
    assert_eq!(spaces[1].next.as_ref().map(|n| n.label.as_str()), Some("Crop b"));
    assert_eq!(spaces[2].previous.as_ref().map(|n| n.series_id.as_str()), Some("b"));
}

#[test]
fn test_free_space_complements_occupied_weeks() {
    let mut timeline = bed(2);
    for (id, start, end) in [("a", 3, 9), ("b", 12, 14), ("c", 20, 31), ("d", 40, 50)] {
        timeline.add_occupation(occ(id, start, end)).unwrap();
    }

    let (from, to) = (1, 52);
    let free: i32 = timeline
        .find_free_spaces(from, to)
        .iter()
        .map(FreeSpace::duration)
        .sum();
    let occupied: i32 = timeline
        .occupations()
        .iter()
        .map(|o| o.overlap_with(from, to))
        .sum();
    assert_eq!(free + occupied, to - from);

    let stats = timeline.occupancy_rate(from, to);
    assert_eq!(stats.occupied_duration, occupied);
    assert_eq!(stats.free_duration, free);
}

#[test]
fn test_occupancy_rate_clips_to_range() {
    let mut timeline = bed(0);
    timeline.add_occupation(occ("a", 5, 15)).unwrap();
    timeline.add_occupation(occ("b", 30, 40)).unwrap();

    let stats = timeline.occupancy_rate(10, 20);
    assert_eq!(stats.total_duration, 10);
    assert_eq!(stats.occupied_duration, 5);
    assert_eq!(stats.free_duration, 5);
    assert_eq!(stats.ratio_percent, 50.0);
    assert_eq!(stats.count, 1);

    let year = timeline.occupancy_in_year();
    assert_eq!(year.occupied_duration, 20);
    assert_eq!(year.ratio_percent, 39.2);
}

#[test]
fn test_occupation_at() {
    let mut timeline = bed(0);
    timeline.add_occupation(occ("a", 5, 15)).unwrap();
    assert_eq!(timeline.occupation_at(5).map(|o| o.series_id.as_str()), Some("a"));
    assert_eq!(timeline.occupation_at(14).map(|o| o.series_id.as_str()), Some("a"));
    assert!(timeline.occupation_at(15).is_none());
    assert!(timeline.occupation_at(4).is_none());
}

#[test]
fn test_suggest_intercrops_ranks_multi_cycle_fillers() {
    let mut timeline = bed(2);
    timeline.add_occupation(occ("a", 10, 20)).unwrap();
    timeline.add_occupation(occ("b", 30, 50)).unwrap();

    let candidates = vec![
        filler("radish", 4, 20.0, Some(5)),
        filler("lettuce", 6, 60.0, Some(4)),
        filler("spinach", 5, 30.0, Some(3)),
        filler("arugula", 3, 9.0, Some(4)),
        filler("cabbage", 5, 200.0, Some(1)),
        filler("squash", 9, 400.0, Some(2)),
    ];

    // The gap [20, 30) leaves 6 usable weeks once both buffers are deducted.
    let spaces = timeline.find_free_spaces(20, 30);
    let suggestions = timeline.suggest_intercrops(&candidates, Some(&spaces), configured);
    assert_eq!(suggestions.len(), 1);

    let suggestion = &suggestions[0];
    assert_eq!(suggestion.usable_weeks, 6);
    let ids: Vec<&str> = suggestion.options.iter().map(|o| o.crop_id.as_str()).collect();
    assert_eq!(ids, vec!["lettuce", "spinach", "radish"]);
    assert!(suggestion.options[0].best);
    assert!(!suggestion.options[1].best);
}

#[test]
fn test_suggest_intercrops_skips_small_spaces() {
    let mut timeline = bed(2);
    timeline.add_occupation(occ("a", 1, 20)).unwrap();
    timeline.add_occupation(occ("b", 24, 52)).unwrap();

    let candidates = vec![filler("radish", 1, 20.0, Some(5))];
    assert!(timeline
        .suggest_intercrops(&candidates, None, configured)
        .is_empty());
}

#[test]
fn test_suggest_intercrops_uses_resolved_rotations() {
    let mut timeline = bed(2);
    timeline.add_occupation(occ("a", 10, 20)).unwrap();
    timeline.add_occupation(occ("b", 30, 50)).unwrap();
    let spaces = timeline.find_free_spaces(20, 30);

    // No rotation count on the crop itself; its class allows four.
    let candidates = vec![filler("purslane", 6, 25.0, None)];
    assert!(timeline
        .suggest_intercrops(&candidates, Some(&spaces), configured)
        .is_empty());

    let suggestions = timeline.suggest_intercrops(&candidates, Some(&spaces), |_| 4);
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].options[0].crop_id, "purslane");
    assert!(suggestions[0].options[0].best);
}

#[test]
fn test_registry_finds_available_beds() {
    let gardens = vec![
        GardenInventory {
            id: "north".to_string(),
            bed_count: 3,
            bed_length_m: 30,
        },
        GardenInventory {
            id: "south".to_string(),
            bed_count: 2,
            bed_length_m: 15,
        },
    ];
    let mut registry = TimelineRegistry::from_inventory(&gardens, 2);
    assert_eq!(registry.len(), 5);

    registry
        .get_or_create(&BedId::new("north", 1))
        .add_occupation(occ("a", 10, 20))
        .unwrap();
    registry
        .get_or_create(&BedId::new("south", 2))
        .add_occupation(occ("b", 15, 25))
        .unwrap();

    let free: Vec<String> = registry
        .find_available_beds(12, 18, None)
        .into_iter()
        .map(|b| format!("{}-{}", b.garden_id, b.index))
        .collect();
    assert_eq!(free, vec!["north-2", "north-3", "south-1"]);

    let north = registry.find_available_beds(12, 18, Some("north"));
    assert_eq!(north.len(), 2);

    assert_eq!(registry.remove_series("b"), Some(BedId::new("south", 2)));
    assert_eq!(registry.find_available_beds(12, 18, Some("south")).len(), 2);
    assert_eq!(registry.remove_series("b"), None);
}
