//! Cultivation tasks scheduled relative to transplanting.

use serde::{Deserialize, Serialize};

use super::Week;

/// Template entry: a task and its offset in days from transplant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: String,
    pub offset_days: i32,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, offset_days: i32) -> Self {
        Self {
            name: name.into(),
            offset_days,
        }
    }
}

/// Scheduled task with its estimated workload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub crop_id: String,
    pub name: String,
    pub week: Week,
    pub estimated_hours: f64,
    /// Display colour, e.g. `#4caf50`
    pub color: String,
}
