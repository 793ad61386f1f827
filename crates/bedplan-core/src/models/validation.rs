//! Structured validation outcomes surfaced to callers.

use serde::{Deserialize, Serialize};

use super::Week;

/// Ordered severity shared by conflicts, window issues and plan alerts.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WindowIssueKind {
    SowTooEarly,
    SowTooLate,
    TransplantTooEarly,
    TransplantTooLate,
    HarvestStartOutsidePeriod,
    HarvestEndOutsidePeriod,
    PlantingBeforeLastFrost,
    HarvestAfterFirstFrost,
}

/// A date falling outside what the crop or the climate allows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowIssue {
    pub kind: WindowIssueKind,
    pub severity: Severity,
    /// The offending week
    pub week: Week,
    /// Closest week that would satisfy the window, when one exists
    pub suggested_week: Option<Week>,
    pub message: String,
}

/// Result of checking derived dates against agronomic and climate windows.
///
/// Errors block acceptance of the dates; warnings are informational.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowValidation {
    pub valid: bool,
    pub errors: Vec<WindowIssue>,
    pub warnings: Vec<WindowIssue>,
    pub max_severity: Severity,
}

impl WindowValidation {
    pub fn from_issues(errors: Vec<WindowIssue>, warnings: Vec<WindowIssue>) -> Self {
        let max_severity = errors
            .iter()
            .chain(&warnings)
            .map(|issue| issue.severity)
            .max()
            .unwrap_or_default();
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            max_severity,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// More beds required than available
    Capacity,
    /// Estimated production falls short of demand
    LowCoverage,
    /// Some series harvest after the season ends
    OutOfSeason,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanAlert {
    pub kind: AlertKind,
    pub severity: Severity,
    /// Hard alerts make the plan invalid
    pub blocking: bool,
    pub message: String,
}

/// Result of checking one or more plans against bed capacity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanValidation {
    pub valid: bool,
    pub alerts: Vec<PlanAlert>,
    /// Required beds as a share of available beds, `None` without beds
    pub utilization_percent: Option<f64>,
}

impl PlanValidation {
    pub fn alerts_of(&self, kind: AlertKind) -> impl Iterator<Item = &PlanAlert> {
        self.alerts.iter().filter(move |alert| alert.kind == kind)
    }
}
