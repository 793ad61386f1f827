mod common;

use bedplan_core::{
    models::{Anchor, BedId, CommitOutcome, ConflictResult, CycleClass, ProtectionType},
    params::{BedQuery, CommitPlan, DateEdit, DeriveSeries, ListCommitments, PlanCrop, PlanPortfolio},
    GardenBuilder, PlannerError, PlanningEvent, SeasonWindow,
};
use common::{create_test_garden, lettuce_series};

fn lettuce_in(garden_id: &str) -> PlanCrop {
    PlanCrop {
        garden_id: Some(garden_id.to_string()),
        ..PlanCrop::new("lettuce")
    }
}

#[tokio::test]
async fn test_plan_crop_validates_against_garden() {
    let (_temp_dir, garden, events) = create_test_garden().await;

    let report = garden.plan_crop(&lettuce_in("main")).unwrap();
    assert_eq!(report.plan.crop_name, "Lettuce");
    assert_eq!(report.plan.sizing.cycle_class, CycleClass::Fast);
    assert!(report.plan.beds_needed() >= 1);
    assert!(report.plan.beds_needed() <= 12);
    assert!(report.validation.valid);
    assert!(events
        .events()
        .iter()
        .any(|e| matches!(e, PlanningEvent::PlanBuilt { crop_id, .. } if crop_id == "lettuce")));
}

#[tokio::test]
async fn test_plan_crop_rejects_bad_input() {
    let (_temp_dir, garden, _events) = create_test_garden().await;

    let err = garden.plan_crop(&PlanCrop::new("artichoke")).unwrap_err();
    assert!(matches!(err, PlannerError::CropNotFound { ref id } if id == "artichoke"));

    let err = garden.plan_crop(&lettuce_in("orchard")).unwrap_err();
    assert!(matches!(err, PlannerError::GardenNotFound { .. }));

    let backwards = PlanCrop {
        season: SeasonWindow::new(30, 20),
        ..PlanCrop::new("lettuce")
    };
    let err = garden.plan_crop(&backwards).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput { ref field, .. } if field == "season"));
}

#[tokio::test]
async fn test_plan_portfolio_covers_all_demand() {
    let (_temp_dir, garden, _events) = create_test_garden().await;

    let portfolio = garden
        .plan_portfolio(&PlanPortfolio {
            crop_ids: vec![],
            fallow_gap_weeks: 2,
            season: SeasonWindow::default(),
            maturity_level: Default::default(),
        })
        .unwrap();

    assert_eq!(portfolio.plans.len(), garden.catalog().demand.len());
    assert!(portfolio.validation.utilization_percent.is_some());
    // Leeks and tomatoes host fillers, radish has a cap.
    assert!(portfolio.savings.host_windows > 0);
    assert!(portfolio
        .savings
        .lines
        .iter()
        .all(|line| line.beds_saved > 0));
}

#[tokio::test]
async fn test_derive_series_applies_edit() {
    let (_temp_dir, garden, _events) = create_test_garden().await;

    let mut params = DeriveSeries {
        crop_id: "lettuce".to_string(),
        harvest_start: 24,
        protection: Default::default(),
        zone_id: None,
        edit: None,
    };
    let report = garden.derive_series(&params).unwrap();
    assert_eq!(report.series.id, "lettuce-w24");
    assert_eq!(report.series.dates.transplant, 18);
    assert_eq!(report.series.dates.sow, 15);
    assert!(!report.tasks.is_empty());
    assert!(report.tasks.windows(2).all(|w| w[0].week <= w[1].week));

    params.edit = Some(DateEdit {
        anchor: Anchor::Sow,
        week: 10,
    });
    let edited = garden.derive_series(&params).unwrap();
    assert_eq!(edited.series.dates.sow, 10);
    assert_eq!(edited.series.dates.transplant, 13);
    assert_eq!(edited.series.dates.harvest_start, 19);

    params.zone_id = Some("arctic".to_string());
    assert!(matches!(
        garden.derive_series(&params).unwrap_err(),
        PlannerError::ZoneNotFound { .. }
    ));
}

#[tokio::test]
async fn test_commit_plan_places_consecutive_beds() {
    let (_temp_dir, garden, _events) = create_test_garden().await;
    let report = garden.plan_crop(&lettuce_in("main")).unwrap();
    let beds = report.plan.beds_needed();

    let commits = garden.commit_plan(&report.plan, "main", 3).await.unwrap();
    assert_eq!(commits.rejected_count(), 0);
    assert_eq!(
        commits.committed().count(),
        report.plan.in_season_series().count()
    );
    for commitment in commits.committed() {
        assert!(commitment.bed.index >= 3 && commitment.bed.index < 3 + beds);
    }

    let stored = garden
        .list_commitments(&ListCommitments {
            garden_id: Some("main".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(stored.len(), commits.outcomes.len());

    let registry = garden.load_registry(Some("main")).await.unwrap();
    assert_eq!(registry.len(), 12);
    assert!(!registry.get(&BedId::new("main", 3)).unwrap().is_empty());
    assert!(registry.get(&BedId::new("main", 1)).unwrap().is_empty());
}

#[tokio::test]
async fn test_same_plan_commits_to_two_bed_ranges() {
    let (_temp_dir, garden, _events) = create_test_garden().await;
    let report = garden.plan_crop(&lettuce_in("main")).unwrap();
    let beds = report.plan.beds_needed();
    assert!(2 * beds <= 12);

    let first = garden.commit_plan(&report.plan, "main", 1).await.unwrap();
    let second = garden
        .commit_plan(&report.plan, "main", 1 + beds)
        .await
        .unwrap();
    assert_eq!(first.rejected_count(), 0);
    assert_eq!(second.rejected_count(), 0);

    let first_series = &report.plan.series[0];
    let ids: Vec<&str> = first
        .committed()
        .chain(second.committed())
        .map(|c| c.occupation.series_id.as_str())
        .collect();
    assert!(ids.contains(&format!("{}@main/1", first_series.id).as_str()));
    assert!(ids.contains(&format!("{}@main/{}", first_series.id, 1 + beds).as_str()));

    let stored = garden
        .list_commitments(&ListCommitments { garden_id: None })
        .await
        .unwrap();
    assert_eq!(stored.len(), 2 * report.plan.in_season_series().count());
}

#[tokio::test]
async fn test_failed_commit_plan_stores_nothing() {
    let (_temp_dir, garden, _events) = create_test_garden().await;
    let report = garden.plan_crop(&lettuce_in("main")).unwrap();
    let all = ListCommitments { garden_id: None };

    let commits = garden.commit_plan(&report.plan, "main", 1).await.unwrap();
    let committed = commits.committed().count();
    assert!(committed > 1);
    let released = commits.committed().next().unwrap().occupation.series_id.clone();
    garden.release_series(&released).await.unwrap();

    // The released series would fit again, but the rest of the plan is
    // already committed.
    let err = garden
        .commit_plan(&report.plan, "main", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput { ref field, .. } if field == "series_id"));

    let stored = garden.list_commitments(&all).await.unwrap();
    assert_eq!(stored.len(), committed - 1);
    assert!(stored.iter().all(|c| c.occupation.series_id != released));
}

#[tokio::test]
async fn test_protection_shifts_planned_series() {
    let (_temp_dir, garden, _events) = create_test_garden().await;
    let tomato = |protection| PlanCrop {
        garden_id: Some("main".to_string()),
        protection,
        ..PlanCrop::new("tomato")
    };

    let open = garden.plan_crop(&tomato(ProtectionType::OpenField)).unwrap();
    let covered = garden.plan_crop(&tomato(ProtectionType::Greenhouse)).unwrap();
    let (open, covered) = (&open.plan.series[0], &covered.plan.series[0]);
    assert_eq!(covered.dates.transplant, open.dates.transplant);
    assert_eq!(covered.dates.harvest_start, open.dates.harvest_start - 1);

    // A planned series and one derived from its harvest date agree.
    let derived = garden
        .derive_series(&DeriveSeries {
            crop_id: "tomato".to_string(),
            harvest_start: covered.dates.harvest_start,
            protection: ProtectionType::Greenhouse,
            zone_id: None,
            edit: None,
        })
        .unwrap();
    assert_eq!(derived.series.dates, covered.dates);
}

#[tokio::test]
async fn test_commit_plan_rejects_beds_outside_garden() {
    let (_temp_dir, garden, _events) = create_test_garden().await;
    let report = garden.plan_crop(&lettuce_in("main")).unwrap();
    let first_bed = 12 - report.plan.beds_needed() + 2;

    let err = garden
        .commit_plan(&report.plan, "main", first_bed)
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput { ref field, .. } if field == "first_bed"));

    let err = garden.commit_plan(&report.plan, "main", 0).await.unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_short_fallow_is_rejected_by_timeline() {
    let (_temp_dir, garden, _events) = create_test_garden().await;

    // A one-week fallow is shorter than the two weeks of soil preparation,
    // so the second rotation on each bed cannot follow the first.
    let params = CommitPlan {
        plan: PlanCrop {
            fallow_gap_weeks: 1,
            ..PlanCrop::new("lettuce")
        },
        garden_id: "main".to_string(),
        first_bed: 1,
    };
    let commits = garden.commit_crop(&params).await.unwrap();

    assert!(commits.rejected_count() > 0);
    for outcome in &commits.outcomes {
        if let CommitOutcome::Rejected { conflict, .. } = outcome {
            assert!(matches!(conflict, ConflictResult::NonViableSuccession { .. }));
        }
    }
}

#[tokio::test]
async fn test_commit_series_conflict_leaves_bed_untouched() {
    let (_temp_dir, garden, events) = create_test_garden().await;
    let bed = BedId::new("main", 1);

    let first = garden
        .commit_series(&bed, &lettuce_series("a", 17, 25), "Lettuce")
        .await
        .unwrap();
    assert!(first.is_committed());

    let second = garden
        .commit_series(&bed, &lettuce_series("b", 22, 30), "Lettuce")
        .await
        .unwrap();
    let CommitOutcome::Rejected { conflict, .. } = second else {
        panic!("expected an overlap");
    };
    assert_eq!(conflict.conflicting_series(), Some("a"));

    let timeline = garden.bed_timeline(&bed).await.unwrap();
    assert_eq!(timeline.len(), 1);

    let recorded = events.events();
    assert!(recorded.iter().any(|e| matches!(
        e,
        PlanningEvent::OccupationAdded { bed, series_id } if bed == "main/1" && series_id == "a"
    )));
    assert!(recorded.iter().any(|e| matches!(
        e,
        PlanningEvent::OccupationRejected { series_id, .. } if series_id == "b"
    )));
}

#[tokio::test]
async fn test_commit_series_checks_bed_exists() {
    let (_temp_dir, garden, _events) = create_test_garden().await;
    let series = lettuce_series("a", 17, 25);

    let err = garden
        .commit_series(&BedId::new("tunnel", 5), &series, "")
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput { ref field, .. } if field == "bed_index"));

    let err = garden
        .commit_series(&BedId::new("orchard", 1), &series, "")
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::GardenNotFound { .. }));
}

#[tokio::test]
async fn test_release_series_frees_bed() {
    let (_temp_dir, garden, events) = create_test_garden().await;
    let bed = BedId::new("tunnel", 2);
    garden
        .commit_series(&bed, &lettuce_series("a", 17, 25), "Lettuce")
        .await
        .unwrap();

    let released = garden.release_series("a").await.unwrap();
    assert_eq!(released.bed, bed);
    assert!(garden.bed_timeline(&bed).await.unwrap().is_empty());
    assert!(events
        .events()
        .iter()
        .any(|e| matches!(e, PlanningEvent::OccupationRemoved { series_id, .. } if series_id == "a")));

    let err = garden.release_series("a").await.unwrap_err();
    assert!(matches!(err, PlannerError::SeriesNotFound { .. }));
}

#[tokio::test]
async fn test_bed_overview() {
    let (_temp_dir, garden, _events) = create_test_garden().await;
    let bed = BedId::new("main", 4);
    garden
        .commit_series(&bed, &lettuce_series("a", 17, 25), "Lettuce")
        .await
        .unwrap();

    let overview = garden
        .bed_overview(&BedQuery {
            garden_id: "main".to_string(),
            bed_index: 4,
            from: 1,
            to: 52,
        })
        .await
        .unwrap();

    assert_eq!(overview.occupations.len(), 1);
    assert_eq!(overview.free_spaces.len(), 2);
    assert_eq!(overview.free_spaces[0].end_week, 17);
    assert_eq!(overview.free_spaces[1].start_week, 25);
    assert_eq!(overview.stats.occupied_duration, 8);
    assert!(!overview.intercrops.is_empty());

    let err = garden
        .bed_overview(&BedQuery {
            garden_id: "main".to_string(),
            bed_index: 4,
            from: 20,
            to: 20,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput { ref field, .. } if field == "to"));
}

#[tokio::test]
async fn test_bed_overview_suggests_fillers_by_resolved_rotations() {
    let (_temp_dir, garden, _events) = create_test_garden().await;
    let bed = BedId::new("main", 2);
    garden
        .commit_series(&bed, &lettuce_series("a", 17, 25), "Lettuce")
        .await
        .unwrap();
    garden
        .commit_series(&bed, &lettuce_series("b", 35, 45), "Lettuce")
        .await
        .unwrap();

    let overview = garden
        .bed_overview(&BedQuery {
            garden_id: "main".to_string(),
            bed_index: 2,
            from: 1,
            to: 52,
        })
        .await
        .unwrap();

    // Six usable weeks between the two lettuces. Purslane has no rotation
    // count of its own and falls back to the four of fast crops.
    let between = overview
        .intercrops
        .iter()
        .find(|s| s.free_space.start_week == 25)
        .unwrap();
    assert_eq!(between.usable_weeks, 6);
    let ids: Vec<&str> = between.options.iter().map(|o| o.crop_id.as_str()).collect();
    assert_eq!(ids, vec!["radish", "purslane"]);
}

#[tokio::test]
async fn test_commitments_persist_across_gardens() {
    let (temp_dir, garden, _events) = create_test_garden().await;
    garden
        .commit_series(&BedId::new("main", 1), &lettuce_series("a", 17, 25), "Lettuce")
        .await
        .unwrap();
    drop(garden);

    let reopened = GardenBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .build()
        .await
        .expect("Failed to reopen garden");
    let stored = reopened
        .list_commitments(&ListCommitments::default())
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].occupation.label, "Lettuce");
}
