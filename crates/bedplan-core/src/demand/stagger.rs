//! Laying out series over a crop's beds.

use super::{BedDemandCalculator, PlanOptions};
use crate::{
    events::PlanningEvent,
    models::{
        Anchor, BedGap, BedSummary, CropProfile, GapKind, SeasonWindow, Series, SizingResult,
        StaggeredSeries, Week,
    },
    retro::RetroPlanner,
};

impl BedDemandCalculator {
    /// Series for every rotation on every bed, dated forward from the start
    /// of the season.
    ///
    /// Each series is placed from its sow week with the same offsets the
    /// retro-planner uses, including the zone's modifier for
    /// `options.protection`, so re-deriving a series from its harvest start
    /// gives back its dates. Parallel beds are offset so their harvests do
    /// not all land in the same weeks. Series harvesting too long after the
    /// season are dropped; those harvesting shortly after it are kept but
    /// flagged out of season.
    pub fn generate_staggered_series(
        &self,
        crop: &CropProfile,
        sizing: &SizingResult,
        beds_needed: u32,
        fallow_gap_weeks: u32,
        options: &PlanOptions,
    ) -> StaggeredSeries {
        let season = options.season;
        let retro = RetroPlanner::new(options.zone.clone(), self.config.clone());
        let durations = self.config.durations_for(crop);
        let growth = retro.adjusted_maturity_weeks(crop, options.protection) as u32;
        let harvest = durations.harvest_weeks;
        let rotation_weeks = growth + harvest + fallow_gap_weeks;
        let stagger_weeks = harvest
            .checked_div(beds_needed)
            .unwrap_or(1)
            .clamp(1, self.config.max_stagger_weeks.max(1));

        let base_sow = season.start - durations.nursery_weeks as i32;
        let latest_harvest = season.end + self.config.late_harvest_tolerance_weeks as i32;

        let mut series = Vec::new();
        for rotation in 0..sizing.rotations.max(1) {
            for bed in 0..beds_needed {
                let sow = base_sow
                    + (rotation * rotation_weeks) as i32
                    + (bed * stagger_weeks) as i32;
                let dates = retro.resolve(Anchor::Sow, sow, crop, options.protection);
                let id = format!("{}-b{}-r{}", crop.id, bed + 1, rotation + 1);

                if dates.harvest_start > latest_harvest {
                    self.events.emit(&PlanningEvent::SeriesDiscarded {
                        series_id: id,
                        harvest_start: dates.harvest_start,
                    });
                    continue;
                }

                series.push(Series {
                    id,
                    crop_id: crop.id.clone(),
                    bed_index: bed + 1,
                    rotation_index: rotation,
                    protection: options.protection,
                    out_of_season: dates.harvest_start > season.end,
                    dates,
                });
            }
        }

        let (beds, gaps) = self.summarize_beds(&series, beds_needed, season);
        StaggeredSeries {
            series,
            beds,
            gaps,
            stagger_weeks,
            rotation_weeks,
        }
    }

    /// Per-bed occupation summaries and the idle stretches before the first
    /// and after the last series of each bed.
    fn summarize_beds(
        &self,
        series: &[Series],
        beds_needed: u32,
        season: SeasonWindow,
    ) -> (Vec<BedSummary>, Vec<BedGap>) {
        let min_gap = self.config.min_intercrop_gap_weeks as i32;
        let season_close = season.end + 1;
        let gap = |bed_index, kind, start_week: Week, end_week: Week| BedGap {
            bed_index,
            kind,
            start_week,
            end_week,
            intercrop_ready: end_week - start_week >= min_gap,
        };

        let mut beds = Vec::with_capacity(beds_needed as usize);
        let mut gaps = Vec::new();
        for bed_index in 1..=beds_needed {
            let on_bed: Vec<&Series> = series.iter().filter(|s| s.bed_index == bed_index).collect();
            let first_week = on_bed
                .iter()
                .map(|s| s.dates.bed_occupied_from())
                .min()
                .unwrap_or(season_close);
            let last_occupied_week = on_bed
                .iter()
                .map(|s| s.dates.bed_occupied_until())
                .max()
                .unwrap_or(season.start);

            beds.push(BedSummary {
                bed_index,
                series_count: on_bed.len() as u32,
                first_week,
                last_occupied_week,
            });

            if on_bed.is_empty() {
                gaps.push(gap(bed_index, GapKind::PostSeason, season.start, season_close));
                continue;
            }
            if first_week > season.start {
                gaps.push(gap(bed_index, GapKind::PreSeason, season.start, first_week));
            }
            if last_occupied_week < season_close {
                gaps.push(gap(
                    bed_index,
                    GapKind::PostSeason,
                    last_occupied_week,
                    season_close,
                ));
            }
        }
        (beds, gaps)
    }
}
