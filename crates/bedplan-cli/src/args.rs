use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    BedArgs, ClassifyArgs, CommitArgs, PlanArgs, ReleaseArgs, RetroArgs, SavingsArgs,
    TimelineArgs,
};

/// Vegetable bed planner for market gardens
///
/// bedplan sizes beds for a weekly demand, lays successive series out over
/// them, retro-plans sowing and transplanting from a target harvest week and
/// keeps track of which beds are committed when.
#[derive(Parser)]
#[command(version, about, name = "bedplan")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/bedplan/bedplan.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Reference data (crops, zones, gardens, demand) as JSON. Defaults to
    /// the built-in catalog
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
///
/// Planning commands (`classify`, `plan`, `retro`, `savings`) never touch
/// the database. `commit`, `release`, `timeline` and `beds` work on the
/// committed bed occupations.
#[derive(Subcommand)]
pub enum Commands {
    /// List the crops of the catalog
    Crops,
    /// Show the rotation class and rotation count of a crop
    Classify(ClassifyArgs),
    /// Size beds for one crop, or for several crops together
    #[command(alias = "p")]
    Plan(PlanArgs),
    /// Derive a series' dates backward from its harvest week
    #[command(alias = "r")]
    Retro(RetroArgs),
    /// Plan a crop and commit its series to garden beds
    #[command(alias = "c")]
    Commit(CommitArgs),
    /// Remove a committed series from its bed
    Release(ReleaseArgs),
    /// List committed occupations
    #[command(alias = "t")]
    Timeline(TimelineArgs),
    /// Show occupations, free spaces and filler crops of one bed
    Beds(BedArgs),
    /// Estimate beds saved by intercropping fillers under long crops
    Savings(SavingsArgs),
}
