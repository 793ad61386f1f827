//! Occupations committed to the garden database.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{BedId, ConflictResult, Occupation};

/// A stored occupation of a garden bed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commitment {
    pub id: u64,
    pub bed: BedId,
    pub occupation: Occupation,
    pub committed_at: Timestamp,
}

/// Result of committing one series to a bed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommitOutcome {
    Committed(Commitment),
    /// The bed's timeline refused the occupation; nothing was stored
    Rejected {
        bed: BedId,
        series_id: String,
        conflict: ConflictResult,
    },
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed(_))
    }
}

/// Outcomes of committing every series of a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CommitReport {
    pub outcomes: Vec<CommitOutcome>,
}

impl CommitReport {
    pub fn committed(&self) -> impl Iterator<Item = &Commitment> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            CommitOutcome::Committed(commitment) => Some(commitment),
            CommitOutcome::Rejected { .. } => None,
        })
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.is_committed())
            .count()
    }
}
