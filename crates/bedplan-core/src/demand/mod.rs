//! Bed demand calculation.
//!
//! The [`BedDemandCalculator`] turns a crop profile and a seasonal demand
//! into a [`Plan`](crate::models::Plan): it classifies the crop, sizes its
//! beds with the formula matching the class, lays out staggered series over
//! those beds and derives input needs. Each crop is planned independently
//! and every result is a fresh value, so plans for different crops can be
//! computed in any order or in parallel.
//!
//! # Sizing formulas
//!
//! - **Long** crops hold one bed all season. Beds are sized so that their
//!   combined weekly harvest covers the weekly demand; fallow gaps play no
//!   role.
//! - **Medium** and **fast** crops are sized on successive series. A longer
//!   fallow gap can lower the number of rotations a season allows and thus
//!   raise the number of beds, even though each series yields the same.

mod inputs;
mod plan;
mod savings;
mod sizing;
mod stagger;


use std::sync::Arc;

pub use plan::PlanOptions;
pub use sizing::SizingOptions;

use crate::{
    config::PlannerConfig,
    events::{default_sink, EventSink, PlanningEvent},
    models::{CropProfile, CycleClass},
};

/// Sizes and lays out crop plans from demand.
pub struct BedDemandCalculator {
    config: PlannerConfig,
    events: Arc<dyn EventSink>,
}

impl BedDemandCalculator {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            events: default_sink(),
        }
    }

    /// Routes diagnostic events to `sink`.
    pub fn with_events(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Rotation class of `crop`.
    ///
    /// The configured identity sets win, then the crop's own hint. Crops
    /// known to neither are classified on bed occupation: 90 days and more
    /// is long, 45 days and more medium, anything shorter fast.
    pub fn classify_cycle(&self, crop: &CropProfile) -> CycleClass {
        if let Some(class) = self.config.cycle_classes.lookup(&crop.id) {
            return class;
        }
        if let Some(class) = crop.cycle_class {
            return class;
        }

        let occupation_days = self.occupation_days(crop);
        let class = self.config.class_defaults.classify_days(occupation_days);
        self.events.emit(&PlanningEvent::ClassFallback {
            crop_id: crop.id.clone(),
            occupation_days,
            class,
        });
        class
    }

    /// Maximum rotations per season for `crop`, never below one.
    ///
    /// Looked up in the agronomic table, then on the crop, then taken from
    /// the default of its class.
    pub fn resolve_rotations(&self, crop: &CropProfile) -> u32 {
        let configured = self
            .config
            .agronomy_for(&crop.id)
            .and_then(|entry| entry.rotations)
            .or(crop.max_rotations_per_season);

        let rotations = match configured {
            Some(rotations) => rotations,
            None => {
                let class = self.classify_cycle(crop);
                let rotations = self.config.class_defaults.rotations_for(class);
                self.events.emit(&PlanningEvent::RotationFallback {
                    crop_id: crop.id.clone(),
                    class,
                    rotations,
                });
                rotations
            }
        };
        rotations.max(1)
    }

    fn occupation_days(&self, crop: &CropProfile) -> u32 {
        self.config
            .agronomy_for(&crop.id)
            .and_then(|entry| Some(entry.growth_days? + entry.harvest_days?))
            .unwrap_or_else(|| crop.occupation_days())
    }
}

/// `numerator / denominator` rounded up, ignoring floating-point noise just
/// above an integer.
pub(crate) fn ceil_ratio(numerator: f64, denominator: f64) -> u32 {
    if numerator <= 0.0 || denominator <= 0.0 {
        return 0;
    }
    (numerator / denominator - 1e-9).ceil().max(0.0) as u32
}

/// Rounds to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
