//! Diagnostic events emitted by the planning engines.
//!
//! Engines never print. They report fallbacks and notable decisions to an
//! [`EventSink`]; the default [`LogSink`] forwards them to the `log` facade,
//! and [`RecordingSink`] keeps them for assertions in tests.

use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use crate::models::{CycleClass, Week};

/// Something worth reporting that happened during a computation.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanningEvent {
    /// Crop identity not classified; duration thresholds were used
    ClassFallback {
        crop_id: String,
        occupation_days: u32,
        class: CycleClass,
    },
    /// No rotation count configured; the class default was used
    RotationFallback {
        crop_id: String,
        class: CycleClass,
        rotations: u32,
    },
    /// Crop carries no usable yield figure
    MissingYield { crop_id: String },
    /// Series dropped because its harvest would start too late
    SeriesDiscarded {
        series_id: String,
        harvest_start: Week,
    },
    PlanBuilt {
        crop_id: String,
        beds_needed: u32,
        coverage_ratio: u32,
    },
    OccupationAdded { bed: String, series_id: String },
    OccupationRejected {
        bed: String,
        series_id: String,
        reason: String,
    },
    OccupationRemoved { bed: String, series_id: String },
}

/// Receiver of planning events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &PlanningEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &PlanningEvent) {
        match event {
            PlanningEvent::ClassFallback {
                crop_id,
                occupation_days,
                class,
            } => warn!(
                "crop '{crop_id}' has no configured cycle class, classified as {} from {occupation_days} days of occupation",
                class.as_str()
            ),
            PlanningEvent::RotationFallback {
                crop_id,
                class,
                rotations,
            } => warn!(
                "crop '{crop_id}' has no rotation count, using {rotations} ({} default)",
                class.as_str()
            ),
            PlanningEvent::MissingYield { crop_id } => {
                warn!("crop '{crop_id}' has no usable yield, sizing to zero beds")
            }
            PlanningEvent::SeriesDiscarded {
                series_id,
                harvest_start,
            } => debug!("series {series_id} discarded, harvest would start in week {harvest_start}"),
            PlanningEvent::PlanBuilt {
                crop_id,
                beds_needed,
                coverage_ratio,
            } => info!("plan for '{crop_id}': {beds_needed} beds, {coverage_ratio}% coverage"),
            PlanningEvent::OccupationAdded { bed, series_id } => {
                debug!("bed {bed}: added occupation {series_id}")
            }
            PlanningEvent::OccupationRejected {
                bed,
                series_id,
                reason,
            } => info!("bed {bed}: rejected occupation {series_id} ({reason})"),
            PlanningEvent::OccupationRemoved { bed, series_id } => {
                debug!("bed {bed}: removed occupation {series_id}")
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &PlanningEvent) {}
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PlanningEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<PlanningEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &PlanningEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Shared handle to the default sink.
pub fn default_sink() -> Arc<dyn EventSink> {
    Arc::new(LogSink)
}
