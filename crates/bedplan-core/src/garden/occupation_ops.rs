//! Committed occupation operations for the Garden.

use tokio::task;

use super::Garden;
use crate::{
    db::Database,
    error::{PlannerError, Result},
    events::PlanningEvent,
    models::{
        BedId, BedOverview, CommitOutcome, CommitReport, Commitment, GardenInventory, Occupation,
        Plan, Series,
    },
    params::{BedQuery, ListCommitments},
    timeline::{IntervalTimeline, TimelineRegistry},
};

impl Garden {
    /// Commits `series` to `bed` if the bed's timeline accepts it.
    ///
    /// A rejected series is not an error: the outcome carries the conflict
    /// and nothing is stored.
    pub async fn commit_series(
        &self,
        bed: &BedId,
        series: &Series,
        label: &str,
    ) -> Result<CommitOutcome> {
        self.ensure_bed_exists(bed)?;
        let occupation = series.to_occupation(label)?;
        let db_path = self.db_path.clone();
        let bed = bed.clone();
        let buffer_weeks = self.buffer_weeks();

        let outcome = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.commit_occupation(&bed, occupation, buffer_weeks)
        })
        .await
        .map_err(PlannerError::join)??;

        self.report_outcome(&outcome);
        Ok(outcome)
    }

    /// Commits every in-season series of `plan` to the consecutive beds of
    /// `garden_id` starting at `first_bed`. The plan's first bed lands on
    /// `first_bed`, its second on the next bed, and so on.
    ///
    /// Each occupation is stored under [`Series::placement_id`]. The plan is
    /// committed in one transaction: on error nothing is stored.
    pub async fn commit_plan(
        &self,
        plan: &Plan,
        garden_id: &str,
        first_bed: u32,
    ) -> Result<CommitReport> {
        let garden = self.catalog.garden(garden_id)?;
        let last_bed = first_bed + plan.beds_needed().saturating_sub(1);
        if first_bed == 0 || last_bed > garden.bed_count {
            return Err(PlannerError::invalid_input("first_bed").with_reason(format!(
                "{} beds starting at bed {first_bed} do not fit in garden '{}' ({} beds)",
                plan.beds_needed(),
                garden.id,
                garden.bed_count
            )));
        }

        let placements = plan
            .in_season_series()
            .map(|series| {
                let bed = BedId::new(&garden.id, first_bed + series.bed_index - 1);
                let mut occupation = series.to_occupation(&plan.crop_name)?;
                occupation.series_id = series.placement_id(&bed);
                Ok((bed, occupation))
            })
            .collect::<Result<Vec<(BedId, Occupation)>>>()?;

        let db_path = self.db_path.clone();
        let buffer_weeks = self.buffer_weeks();
        let outcomes = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.commit_occupations(placements, buffer_weeks)
        })
        .await
        .map_err(PlannerError::join)??;

        for outcome in &outcomes {
            self.report_outcome(outcome);
        }
        Ok(CommitReport { outcomes })
    }

    /// Removes the committed occupation of `series_id`, freeing its bed.
    pub async fn release_series(&self, series_id: &str) -> Result<Commitment> {
        let db_path = self.db_path.clone();
        let series_id = series_id.to_string();

        let commitment = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.delete_series(&series_id)
        })
        .await
        .map_err(PlannerError::join)??;

        self.events.emit(&PlanningEvent::OccupationRemoved {
            bed: commitment.bed.to_string(),
            series_id: commitment.occupation.series_id.clone(),
        });
        Ok(commitment)
    }

    /// Timeline of `bed` rebuilt from its committed occupations.
    pub async fn bed_timeline(&self, bed: &BedId) -> Result<IntervalTimeline> {
        self.ensure_bed_exists(bed)?;
        let db_path = self.db_path.clone();
        let bed = bed.clone();
        let buffer_weeks = self.buffer_weeks();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.bed_timeline(&bed, buffer_weeks)
        })
        .await
        .map_err(PlannerError::join)?
    }

    /// Timelines of every bed of one garden, or of all gardens.
    pub async fn load_registry(&self, garden_id: Option<&str>) -> Result<TimelineRegistry> {
        let gardens: Vec<GardenInventory> = match garden_id {
            Some(id) => vec![self.catalog.garden(id)?.clone()],
            None => self.catalog.gardens.clone(),
        };
        let db_path = self.db_path.clone();
        let buffer_weeks = self.buffer_weeks();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            let mut registry = TimelineRegistry::from_inventory(&gardens, buffer_weeks);
            for bed in gardens.iter().flat_map(GardenInventory::bed_ids) {
                registry.insert(db.bed_timeline(&bed, buffer_weeks)?);
            }
            Ok::<_, PlannerError>(registry)
        })
        .await
        .map_err(PlannerError::join)?
    }

    /// Committed occupations, ordered by bed then start week.
    pub async fn list_commitments(&self, params: &ListCommitments) -> Result<Vec<Commitment>> {
        if let Some(garden_id) = &params.garden_id {
            self.catalog.garden(garden_id)?;
        }
        let db_path = self.db_path.clone();
        let garden_id = params.garden_id.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_commitments(garden_id.as_deref())
        })
        .await
        .map_err(PlannerError::join)?
    }

    /// Occupations, free spaces, occupancy and filler suggestions of one bed
    /// over `[from, to)`.
    pub async fn bed_overview(&self, params: &BedQuery) -> Result<BedOverview> {
        if params.to <= params.from {
            return Err(PlannerError::invalid_input("to").with_reason(format!(
                "range must end after it starts ({} >= {})",
                params.from, params.to
            )));
        }
        let bed = BedId::new(&params.garden_id, params.bed_index);
        let timeline = self.bed_timeline(&bed).await?;

        let free_spaces = timeline.find_free_spaces(params.from, params.to);
        let calculator = self.calculator();
        let intercrops = timeline.suggest_intercrops(
            &self.catalog.crops,
            Some(free_spaces.as_slice()),
            |crop| calculator.resolve_rotations(crop),
        );
        Ok(BedOverview {
            stats: timeline.occupancy_rate(params.from, params.to),
            occupations: timeline
                .occupations()
                .iter()
                .filter(|occ| occ.overlap_with(params.from, params.to) > 0)
                .cloned()
                .collect(),
            bed,
            from: params.from,
            to: params.to,
            free_spaces,
            intercrops,
        })
    }

    fn ensure_bed_exists(&self, bed: &BedId) -> Result<()> {
        let garden = self.catalog.garden(&bed.garden_id)?;
        if bed.index == 0 || bed.index > garden.bed_count {
            return Err(PlannerError::invalid_input("bed_index").with_reason(format!(
                "garden '{}' has beds 1 to {}, got {}",
                garden.id, garden.bed_count, bed.index
            )));
        }
        Ok(())
    }

    fn report_outcome(&self, outcome: &CommitOutcome) {
        match outcome {
            CommitOutcome::Committed(commitment) => {
                self.events.emit(&PlanningEvent::OccupationAdded {
                    bed: commitment.bed.to_string(),
                    series_id: commitment.occupation.series_id.clone(),
                })
            }
            CommitOutcome::Rejected {
                bed,
                series_id,
                conflict,
            } => self.events.emit(&PlanningEvent::OccupationRejected {
                bed: bed.to_string(),
                series_id: series_id.clone(),
                reason: conflict.to_string(),
            }),
        }
    }
}
