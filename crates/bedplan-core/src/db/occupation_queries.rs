//! Occupation storage and bed timeline reconstruction.

use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{BedId, CommitOutcome, Commitment, Occupation},
    timeline::IntervalTimeline,
};

const COLUMNS: &str =
    "id, garden_id, bed_index, series_id, crop_id, label, start_week, end_week, committed_at";
const INSERT_OCCUPATION_SQL: &str = "INSERT INTO occupations (garden_id, bed_index, series_id, crop_id, label, start_week, end_week, committed_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const CHECK_SERIES_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM occupations WHERE series_id = ?1)";
const DELETE_SERIES_SQL: &str = "DELETE FROM occupations WHERE series_id = ?1";

impl super::Database {
    /// Helper function to construct a Commitment from a database row
    fn build_commitment_from_row(row: &rusqlite::Row) -> rusqlite::Result<Commitment> {
        Ok(Commitment {
            id: row.get::<_, i64>(0)? as u64,
            bed: BedId::new(row.get::<_, String>(1)?, row.get::<_, i64>(2)? as u32),
            occupation: Occupation {
                series_id: row.get(3)?,
                crop_id: row.get(4)?,
                label: row.get(5)?,
                start_week: row.get(6)?,
                end_week: row.get(7)?,
            },
            committed_at: row.get::<_, String>(8)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e))
            })?,
        })
    }

    fn select_bed(connection: &Connection, bed: &BedId) -> rusqlite::Result<Vec<Commitment>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM occupations WHERE garden_id = ?1 AND bed_index = ?2 ORDER BY start_week"
        );
        let mut stmt = connection.prepare(&sql)?;
        let rows = stmt.query_map(
            params![bed.garden_id, bed.index as i64],
            Self::build_commitment_from_row,
        )?;
        rows.collect()
    }

    /// Rebuilds the timeline of `bed` from its stored occupations.
    pub fn bed_timeline(&self, bed: &BedId, buffer_weeks: u32) -> Result<IntervalTimeline> {
        let commitments =
            Self::select_bed(&self.connection, bed).db_context("Failed to load bed occupations")?;
        let mut timeline = IntervalTimeline::new(bed.clone(), buffer_weeks);
        for commitment in commitments {
            timeline.restore_occupation(commitment.occupation);
        }
        Ok(timeline)
    }

    /// Stores `occupation` on `bed` if the bed's timeline accepts it.
    ///
    /// A series can only be committed once.
    pub fn commit_occupation(
        &mut self,
        bed: &BedId,
        occupation: Occupation,
        buffer_weeks: u32,
    ) -> Result<CommitOutcome> {
        let mut outcomes =
            self.commit_occupations(vec![(bed.clone(), occupation)], buffer_weeks)?;
        outcomes.pop().ok_or_else(|| {
            PlannerError::invalid_input("occupation").with_reason("nothing was committed")
        })
    }

    /// Stores each placement whose bed timeline accepts it, in order, so a
    /// placement sees the ones stored before it.
    ///
    /// Timelines are rebuilt and checked inside one transaction. A rejected
    /// placement is reported in its outcome; an error (such as a series ID
    /// already committed) rolls the whole batch back.
    pub fn commit_occupations(
        &mut self,
        placements: Vec<(BedId, Occupation)>,
        buffer_weeks: u32,
    ) -> Result<Vec<CommitOutcome>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        let committed_at = Timestamp::now();

        let outcomes = placements
            .into_iter()
            .map(|(bed, occupation)| {
                Self::place_occupation(&tx, bed, occupation, buffer_weeks, committed_at)
            })
            .collect::<Result<Vec<CommitOutcome>>>()?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(outcomes)
    }

    fn place_occupation(
        connection: &Connection,
        bed: BedId,
        occupation: Occupation,
        buffer_weeks: u32,
        committed_at: Timestamp,
    ) -> Result<CommitOutcome> {
        let already_committed: bool = connection
            .query_row(
                CHECK_SERIES_EXISTS_SQL,
                params![occupation.series_id],
                |row| row.get(0),
            )
            .db_context("Failed to check series existence")?;
        if already_committed {
            return Err(PlannerError::invalid_input("series_id").with_reason(format!(
                "series '{}' is already committed",
                occupation.series_id
            )));
        }

        let mut timeline = IntervalTimeline::new(bed.clone(), buffer_weeks);
        for existing in
            Self::select_bed(connection, &bed).db_context("Failed to load bed occupations")?
        {
            timeline.restore_occupation(existing.occupation);
        }
        if let Err(conflict) = timeline.add_occupation(occupation.clone()) {
            return Ok(CommitOutcome::Rejected {
                bed,
                series_id: occupation.series_id,
                conflict,
            });
        }

        connection
            .execute(
                INSERT_OCCUPATION_SQL,
                params![
                    bed.garden_id,
                    bed.index as i64,
                    occupation.series_id,
                    occupation.crop_id,
                    occupation.label,
                    occupation.start_week,
                    occupation.end_week,
                    committed_at.to_string(),
                ],
            )
            .db_context("Failed to insert occupation")?;

        Ok(CommitOutcome::Committed(Commitment {
            id: connection.last_insert_rowid() as u64,
            bed,
            occupation,
            committed_at,
        }))
    }

    /// Every stored occupation, optionally restricted to one garden, ordered
    /// by bed then start week.
    pub fn list_commitments(&self, garden_id: Option<&str>) -> Result<Vec<Commitment>> {
        let sql = match garden_id {
            Some(_) => format!(
                "SELECT {COLUMNS} FROM occupations WHERE garden_id = ?1 ORDER BY bed_index, start_week"
            ),
            None => format!(
                "SELECT {COLUMNS} FROM occupations ORDER BY garden_id, bed_index, start_week"
            ),
        };
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare occupation query")?;

        let rows = match garden_id {
            Some(garden_id) => stmt.query_map(params![garden_id], Self::build_commitment_from_row),
            None => stmt.query_map([], Self::build_commitment_from_row),
        }
        .db_context("Failed to query occupations")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read occupations")
    }

    pub fn find_commitment(&self, series_id: &str) -> Result<Option<Commitment>> {
        let sql = format!("SELECT {COLUMNS} FROM occupations WHERE series_id = ?1");
        self.connection
            .query_row(&sql, params![series_id], Self::build_commitment_from_row)
            .optional()
            .db_context("Failed to query occupation")
    }

    /// Deletes the occupation of `series_id` and returns it.
    pub fn delete_series(&mut self, series_id: &str) -> Result<Commitment> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let sql = format!("SELECT {COLUMNS} FROM occupations WHERE series_id = ?1");
        let commitment = tx
            .query_row(&sql, params![series_id], Self::build_commitment_from_row)
            .optional()
            .db_context("Failed to query occupation")?
            .ok_or_else(|| PlannerError::SeriesNotFound {
                id: series_id.to_string(),
            })?;

        tx.execute(DELETE_SERIES_SQL, params![series_id])
            .db_context("Failed to delete occupation")?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(commitment)
    }
}
