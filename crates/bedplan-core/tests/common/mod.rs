use std::sync::Arc;

use bedplan_core::{
    models::{DateSet, ProtectionType, Series},
    Garden, GardenBuilder, RecordingSink,
};
use tempfile::TempDir;

/// Helper function to create a garden on the built-in catalog with a
/// temporary database and a recording event sink
#[allow(dead_code)]
pub async fn create_test_garden() -> (TempDir, Garden, Arc<RecordingSink>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let events = RecordingSink::new();
    let garden = GardenBuilder::new()
        .with_database_path(Some(&db_path))
        .with_events(events.clone())
        .build()
        .await
        .expect("Failed to create garden");
    (temp_dir, garden, events)
}

/// A lettuce series holding its bed over `[transplant, harvest_end)`
#[allow(dead_code)]
pub fn lettuce_series(id: &str, transplant: i32, harvest_end: i32) -> Series {
    Series {
        id: id.to_string(),
        crop_id: "lettuce".to_string(),
        bed_index: 1,
        rotation_index: 0,
        protection: ProtectionType::OpenField,
        dates: DateSet {
            sow: transplant - 3,
            transplant,
            harvest_start: harvest_end - 2,
            harvest_end,
            bed_release: harvest_end + 1,
        },
        out_of_season: false,
    }
}
