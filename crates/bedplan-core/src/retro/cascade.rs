//! Recomputation table for edited dates.
//!
//! Each editable anchor maps to one pure resolver that places sow,
//! transplant and harvest start around the edited week. Harvest end and bed
//! release are then always derived from harvest start, in
//! [`super::RetroPlanner::complete`].

use crate::models::{Anchor, Week};

/// Offsets between the anchor dates of a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Offsets {
    pub nursery: i32,
    pub maturity: i32,
}

/// Sow, transplant and harvest start of a planting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Anchors {
    pub sow: Week,
    pub transplant: Week,
    pub harvest_start: Week,
}

pub(crate) type Resolver = fn(Week, Offsets) -> Anchors;

/// Resolver for an edited `anchor`.
pub(crate) fn resolver(anchor: Anchor) -> Resolver {
    match anchor {
        Anchor::HarvestStart => from_harvest_start,
        Anchor::Transplant => from_transplant,
        Anchor::Sow => from_sow,
    }
}

fn from_harvest_start(harvest_start: Week, offsets: Offsets) -> Anchors {
    let transplant = harvest_start - offsets.maturity;
    Anchors {
        sow: transplant - offsets.nursery,
        transplant,
        harvest_start,
    }
}

fn from_transplant(transplant: Week, offsets: Offsets) -> Anchors {
    Anchors {
        sow: transplant - offsets.nursery,
        transplant,
        harvest_start: transplant + offsets.maturity,
    }
}

fn from_sow(sow: Week, offsets: Offsets) -> Anchors {
    let transplant = sow + offsets.nursery;
    Anchors {
        sow,
        transplant,
        harvest_start: transplant + offsets.maturity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSETS: Offsets = Offsets {
        nursery: 5,
        maturity: 8,
    };

    #[test]
    fn test_each_resolver_agrees_on_the_same_planting() {
        let expected = Anchors {
            sow: 10,
            transplant: 15,
            harvest_start: 23,
        };
        assert_eq!(resolver(Anchor::HarvestStart)(23, OFFSETS), expected);
        assert_eq!(resolver(Anchor::Transplant)(15, OFFSETS), expected);
        assert_eq!(resolver(Anchor::Sow)(10, OFFSETS), expected);
    }

    #[test]
    fn test_direct_sown_crop_sows_on_transplant() {
        let direct = Offsets {
            nursery: 0,
            maturity: 6,
        };
        let anchors = resolver(Anchor::HarvestStart)(20, direct);
        assert_eq!(anchors.sow, anchors.transplant);
        assert_eq!(anchors.transplant, 14);
    }
}
