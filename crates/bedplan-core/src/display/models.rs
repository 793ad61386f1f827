//! Display implementations for domain models.
//!
//! Every implementation writes markdown so the CLI can render it with rich
//! formatting or print it as-is. Schedules with week columns go through
//! [`Calendar`] so the same layout serves dated and undated output.

use std::fmt;

use super::{calendar::Calendar, datetime::LocalDateTime};
use crate::{
    config::MaturityLevel,
    models::{
        Anchor, BedId, BedOverview, CommitOutcome, CommitReport, Commitment, ConflictResult,
        CropProfile, CycleClass, FreeSpace, GapKind, InputEstimate, IntercropSuggestion,
        OccupancyStats, Occupation, Plan, PlanAlert, PlanReport, PlanValidation, Portfolio,
        ProtectionType, RetroReport, Savings, Severity, SizingMethod, SizingResult, WindowIssue,
        WindowValidation,
    },
};

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(
    Anchor,
    CycleClass,
    MaturityLevel,
    ProtectionType,
    Severity,
    SizingMethod,
);

impl fmt::Display for GapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GapKind::PreSeason => "before first series",
            GapKind::PostSeason => "after last series",
        })
    }
}

impl fmt::Display for BedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.garden_id, self.index)
    }
}

impl fmt::Display for ConflictResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictResult::None => write!(f, "no conflict"),
            ConflictResult::Overlap {
                series_id,
                label,
                overlap_start,
                overlap_end,
            } => write!(
                f,
                "overlaps {label} ({series_id}) from week {overlap_start} to week {overlap_end}"
            ),
            ConflictResult::NonViableSuccession {
                series_id,
                label,
                available_gap_weeks,
                required_gap_weeks,
                missing_weeks,
            } => write!(
                f,
                "only {available_gap_weeks} weeks next to {label} ({series_id}), \
                 {required_gap_weeks} needed for soil preparation ({missing_weeks} missing)"
            ),
        }
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.label.is_empty() {
            &self.crop_id
        } else {
            &self.label
        };
        write!(
            f,
            "{name} (`{}`): weeks {} to {}",
            self.series_id, self.start_week, self.end_week
        )
    }
}

impl fmt::Display for FreeSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "weeks {} to {} ({} weeks)",
            self.start_week,
            self.end_week,
            self.duration()
        )?;
        match (&self.previous, &self.next) {
            (Some(prev), Some(next)) => write!(f, " between {} and {}", prev.label, next.label),
            (Some(prev), None) => write!(f, " after {}", prev.label),
            (None, Some(next)) => write!(f, " before {}", next.label),
            (None, None) => Ok(()),
        }
    }
}

impl fmt::Display for OccupancyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}% occupied ({} of {} weeks, {} occupations)",
            self.ratio_percent, self.occupied_duration, self.total_duration, self.count
        )
    }
}

impl fmt::Display for IntercropSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- {}, {} usable weeks:",
            self.free_space, self.usable_weeks
        )?;
        for option in &self.options {
            let best = if option.best { " **best**" } else { "" };
            writeln!(
                f,
                "  - {} ({} weeks, {:.2} kg/week){best}",
                option.name, option.cycle_weeks, option.yield_per_week_kg
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for CropProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (`{}`)", self.name, self.id)?;
        writeln!(f)?;
        write!(f, "- Cycle: {} weeks", self.cycle_duration_weeks)?;
        if let Some(class) = self.cycle_class {
            write!(f, " ({class})")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "- Maturity: {} weeks, harvest over {} weeks",
            self.maturity_offset_weeks, self.harvest_window_weeks
        )?;
        if self.is_nursery_raised() {
            writeln!(f, "- Nursery: {} weeks", self.nursery_weeks)?;
        } else {
            writeln!(f, "- Direct sown")?;
        }
        writeln!(
            f,
            "- Yield: {:.1} kg per {} m bed",
            self.reference_yield_kg(),
            self.yields.reference_length_m
        )?;
        if let Some(rotations) = self.max_rotations_per_season {
            writeln!(f, "- Rotations: up to {rotations} per season")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for SizingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Class: {} ({} method)", self.cycle_class, self.method)?;
        writeln!(f, "- Beds needed: **{}**", self.beds_needed)?;
        writeln!(
            f,
            "- Series: {} over {} rotations per bed",
            self.series_needed, self.rotations
        )?;
        if let (Some(demand), Some(capacity)) =
            (self.weekly_demand_kg, self.weekly_capacity_per_bed_kg)
        {
            writeln!(
                f,
                "- Weekly demand {demand:.1} kg against {capacity:.1} kg per bed"
            )?;
        }
        if let Some(weeks) = self.effective_cycle_weeks {
            writeln!(f, "- Effective cycle: {weeks} weeks")?;
        }
        writeln!(
            f,
            "- Yield: {:.1} kg per series (x{:.2}), {:.1} kg per bed per season",
            self.reference_yield_kg, self.maturity_coefficient, self.yield_per_bed_per_season_kg
        )?;
        writeln!(
            f,
            "- Estimated production: {:.1} kg",
            self.estimated_production_kg
        )
    }
}

impl fmt::Display for InputEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- Seeds: {} ({:.1} g)",
            self.seed_count, self.seed_weight_g
        )?;
        if self.tray_count > 0 {
            writeln!(
                f,
                "- Trays: {} ({:.1} L substrate)",
                self.tray_count, self.substrate_litres
            )?;
        }
        writeln!(f, "- Cost: {:.2}", self.cost)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Calendar::new(self))
    }
}

impl fmt::Display for PlanAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.blocking { "✗" } else { "!" };
        write!(f, "{marker} [{}] {}", self.severity, self.message)
    }
}

impl fmt::Display for PlanValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- Status: {}",
            if self.valid { "✓ valid" } else { "✗ invalid" }
        )?;
        if let Some(utilization) = self.utilization_percent {
            writeln!(f, "- Bed utilization: {utilization:.1}%")?;
        }
        for alert in &self.alerts {
            writeln!(f, "- {alert}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Calendar::new(self))
    }
}

impl fmt::Display for Savings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lines.is_empty() {
            return writeln!(f, "No intercropping savings.");
        }
        writeln!(
            f,
            "{} beds saved using {} host beds:",
            self.total_beds_saved, self.host_windows
        )?;
        writeln!(f)?;
        for line in &self.lines {
            writeln!(f, "- {}", line.description)?;
        }
        Ok(())
    }
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Portfolio")?;
        writeln!(f)?;
        writeln!(f, "| Crop | Class | Beds | Series | Coverage |")?;
        writeln!(f, "|:-|:-|-:|-:|-:|")?;
        for plan in &self.plans {
            writeln!(
                f,
                "| {} | {} | {} | {} | {}% |",
                plan.crop_name,
                plan.sizing.cycle_class,
                plan.beds_needed(),
                plan.sizing.series_needed,
                plan.coverage_ratio
            )?;
        }
        writeln!(f, "\n## Validation")?;
        writeln!(f)?;
        write!(f, "{}", self.validation)?;
        writeln!(f, "\n## Intercropping")?;
        writeln!(f)?;
        write!(f, "{}", self.savings)
    }
}

impl fmt::Display for WindowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)?;
        if let Some(week) = self.suggested_week {
            write!(f, " (try week {week})")?;
        }
        Ok(())
    }
}

impl fmt::Display for WindowValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return writeln!(f, "✓ All dates within their windows.");
        }
        for error in &self.errors {
            writeln!(f, "- ✗ {error}")?;
        }
        for warning in &self.warnings {
            writeln!(f, "- ! {warning}")?;
        }
        Ok(())
    }
}

impl fmt::Display for RetroReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Calendar::new(self))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on bed {} (committed {})",
            self.occupation,
            self.bed,
            LocalDateTime(&self.committed_at)
        )
    }
}

impl fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitOutcome::Committed(commitment) => write!(f, "✓ {commitment}"),
            CommitOutcome::Rejected {
                bed,
                series_id,
                conflict,
            } => write!(f, "✗ `{series_id}` rejected on bed {bed}: {conflict}"),
        }
    }
}

impl fmt::Display for CommitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.outcomes.is_empty() {
            return writeln!(f, "No series to commit.");
        }
        let committed = self.outcomes.len() - self.rejected_count();
        writeln!(
            f,
            "Committed {committed} of {} series.",
            self.outcomes.len()
        )?;
        writeln!(f)?;
        for outcome in &self.outcomes {
            writeln!(f, "- {outcome}")?;
        }
        Ok(())
    }
}

impl fmt::Display for BedOverview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# Bed {} (weeks {} to {})",
            self.bed, self.from, self.to
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.stats)?;

        writeln!(f, "\n## Occupations")?;
        writeln!(f)?;
        if self.occupations.is_empty() {
            writeln!(f, "None.")?;
        }
        for occupation in &self.occupations {
            writeln!(f, "- {occupation}")?;
        }

        writeln!(f, "\n## Free spaces")?;
        writeln!(f)?;
        if self.free_spaces.is_empty() {
            writeln!(f, "None.")?;
        }
        for space in &self.free_spaces {
            writeln!(f, "- {space}")?;
        }

        if !self.intercrops.is_empty() {
            writeln!(f, "\n## Intercropping")?;
            writeln!(f)?;
            for suggestion in &self.intercrops {
                write!(f, "{suggestion}")?;
            }
        }
        Ok(())
    }
}
