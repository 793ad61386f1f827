//! Week rendering, optionally anchored to a calendar year.
//!
//! Planning works on bare week numbers. When the grower names the season's
//! year, weeks are printed next to the Monday of the matching ISO week so the
//! output can be read against a wall calendar. Weeks outside `1..=52` are
//! counted from ISO week 1, so week 0 is the last week of the previous year.

use std::fmt;

use jiff::{
    civil::{Date, ISOWeekDate, Weekday},
    Span,
};

use crate::models::{Plan, PlanReport, RetroReport, Series, Week};

/// Monday of `week` counted from ISO week 1 of `year`.
///
/// Returns `None` when the year is outside the range jiff supports.
///
/// ```rust
/// use bedplan_core::display::iso_week_monday;
///
/// let monday = iso_week_monday(2026, 14).unwrap();
/// assert_eq!(monday.to_string(), "2026-03-30");
/// ```
pub fn iso_week_monday(year: i16, week: Week) -> Option<Date> {
    let first_monday = ISOWeekDate::new(year, 1, Weekday::Monday).ok()?.date();
    let offset = Span::new().try_weeks(i64::from(week) - 1).ok()?;
    first_monday.checked_add(offset).ok()
}

/// A week number, with its Monday when a year is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekLabel {
    pub week: Week,
    pub year: Option<i16>,
}

impl WeekLabel {
    pub fn new(week: Week, year: Option<i16>) -> Self {
        Self { week, year }
    }
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year.and_then(|year| iso_week_monday(year, self.week)) {
            Some(monday) => write!(f, "W{} ({})", self.week, monday),
            None => write!(f, "W{}", self.week),
        }
    }
}

/// Wrapper rendering a schedule-bearing value with dated weeks.
///
/// The plain `Display` of [`Plan`], [`PlanReport`] and [`RetroReport`] is the
/// same rendering without a year.
///
/// ```rust,no_run
/// use bedplan_core::{display::Calendar, models::RetroReport};
///
/// fn print(report: &RetroReport) {
///     println!("{}", Calendar::new(report).with_year(Some(2026)));
/// }
/// ```
pub struct Calendar<'a, T> {
    pub value: &'a T,
    pub year: Option<i16>,
}

impl<'a, T> Calendar<'a, T> {
    pub fn new(value: &'a T) -> Self {
        Self { value, year: None }
    }

    pub fn with_year(mut self, year: Option<i16>) -> Self {
        self.year = year;
        self
    }

    fn week(&self, week: Week) -> WeekLabel {
        WeekLabel::new(week, self.year)
    }

    fn fmt_series_table(&self, f: &mut fmt::Formatter<'_>, series: &[Series]) -> fmt::Result {
        writeln!(f, "| Series | Bed | Sow | Transplant | Harvest | Release |")?;
        writeln!(f, "|:-|-:|:-|:-|:-|:-|")?;
        for s in series {
            let flag = if s.out_of_season { " (late)" } else { "" };
            writeln!(
                f,
                "| {}{flag} | {} | {} | {} | {} to {} | {} |",
                s.id,
                s.bed_index,
                self.week(s.dates.sow),
                self.week(s.dates.transplant),
                self.week(s.dates.harvest_start),
                self.week(s.dates.harvest_end),
                self.week(s.dates.bed_release),
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Calendar<'_, Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.value;
        writeln!(f, "# {} (`{}`)", plan.crop_name, plan.crop_id)?;
        writeln!(f)?;
        writeln!(
            f,
            "- Season: {} to {}",
            self.week(plan.season.start),
            self.week(plan.season.end)
        )?;
        writeln!(f, "- Demand: {:.1} kg", plan.total_demand_kg)?;
        writeln!(f, "- Coverage: {}%", plan.coverage_ratio)?;
        writeln!(f)?;
        writeln!(f, "## Sizing")?;
        writeln!(f)?;
        write!(f, "{}", plan.sizing)?;

        if plan.series.is_empty() {
            writeln!(f, "\nNo series planned.")?;
        } else {
            writeln!(f, "\n## Series")?;
            writeln!(f)?;
            self.fmt_series_table(f, &plan.series)?;
        }

        if !plan.gaps.is_empty() {
            writeln!(f, "\n## Bed gaps")?;
            writeln!(f)?;
            for gap in &plan.gaps {
                let ready = if gap.intercrop_ready {
                    ", ready for intercropping"
                } else {
                    ""
                };
                writeln!(
                    f,
                    "- Bed {} {}: {} to {} ({} weeks{ready})",
                    gap.bed_index,
                    gap.kind,
                    self.week(gap.start_week),
                    self.week(gap.end_week),
                    gap.weeks()
                )?;
            }
        }

        writeln!(f, "\n## Inputs")?;
        writeln!(f)?;
        write!(f, "{}", plan.inputs)
    }
}

impl fmt::Display for Calendar<'_, PlanReport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Calendar::new(&self.value.plan).with_year(self.year))?;
        writeln!(f, "\n## Validation")?;
        writeln!(f)?;
        write!(f, "{}", self.value.validation)
    }
}

impl fmt::Display for Calendar<'_, RetroReport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.value;
        let dates = &report.series.dates;
        writeln!(f, "# {} (`{}`)", report.crop_name, report.series.id)?;
        writeln!(f)?;
        writeln!(f, "- Protection: {}", report.series.protection)?;
        writeln!(f, "- Sow: {}", self.week(dates.sow))?;
        writeln!(f, "- Transplant: {}", self.week(dates.transplant))?;
        writeln!(
            f,
            "- Harvest: {} to {}",
            self.week(dates.harvest_start),
            self.week(dates.harvest_end)
        )?;
        writeln!(f, "- Bed release: {}", self.week(dates.bed_release))?;

        writeln!(f, "\n## Windows")?;
        writeln!(f)?;
        write!(f, "{}", report.validation)?;

        if report.tasks.is_empty() {
            writeln!(f, "\nNo tasks scheduled.")
        } else {
            writeln!(f, "\n## Tasks")?;
            writeln!(f)?;
            writeln!(f, "| Week | Task | Hours |")?;
            writeln!(f, "|:-|:-|-:|")?;
            for task in &report.tasks {
                writeln!(
                    f,
                    "| {} | {} | {:.1} |",
                    self.week(task.week),
                    task.name,
                    task.estimated_hours
                )?;
            }
            Ok(())
        }
    }
}
