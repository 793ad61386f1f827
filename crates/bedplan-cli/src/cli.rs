//! Command arguments and their handlers.
//!
//! Each command has a clap argument struct converted into the matching
//! `bedplan_core::params` type, so core parameters stay free of clap
//! derives:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Garden handlers → Display
//! ```

use anyhow::{Context, Result};
use bedplan_core::{
    config::MaturityLevel,
    display::{Calendar, Commitments, Crops},
    models::{Anchor, BedId, ProtectionType},
    params::{
        BedQuery, CommitPlan, DateEdit, DeriveSeries, ListCommitments, PlanCrop, PlanPortfolio,
    },
    timeline::{FIRST_WEEK, LAST_WEEK},
    Garden, SeasonWindow, Week,
};
use clap::{Args, ValueEnum};
use log::debug;

use crate::{args::Commands, renderer::TerminalRenderer};

/// Grower experience level, which scales expected yields
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum MaturityArg {
    Beginner,
    Intermediate,
    Expert,
}

impl From<MaturityArg> for MaturityLevel {
    fn from(val: MaturityArg) -> Self {
        match val {
            MaturityArg::Beginner => MaturityLevel::Beginner,
            MaturityArg::Intermediate => MaturityLevel::Intermediate,
            MaturityArg::Expert => MaturityLevel::Expert,
        }
    }
}

/// Cultivation protection, which shortens or lengthens time to maturity
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ProtectionArg {
    OpenField,
    Tunnel,
    Greenhouse,
}

impl From<ProtectionArg> for ProtectionType {
    fn from(val: ProtectionArg) -> Self {
        match val {
            ProtectionArg::OpenField => ProtectionType::OpenField,
            ProtectionArg::Tunnel => ProtectionType::Tunnel,
            ProtectionArg::Greenhouse => ProtectionType::Greenhouse,
        }
    }
}

/// Date of a series the grower edits
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum AnchorArg {
    Harvest,
    Transplant,
    Sow,
}

impl From<AnchorArg> for Anchor {
    fn from(val: AnchorArg) -> Self {
        match val {
            AnchorArg::Harvest => Anchor::HarvestStart,
            AnchorArg::Transplant => Anchor::Transplant,
            AnchorArg::Sow => Anchor::Sow,
        }
    }
}

/// Season and grower options shared by the planning commands
#[derive(Args)]
pub struct SeasonArgs {
    #[arg(long, default_value_t = 2, help = "Idle weeks between two series on a bed")]
    pub fallow: u32,
    #[arg(long, default_value_t = 14, help = "First week of the harvest season")]
    pub season_start: Week,
    #[arg(long, default_value_t = 44, help = "Last week of the harvest season")]
    pub season_end: Week,
    #[arg(short, long, value_enum, default_value = "intermediate")]
    pub maturity: MaturityArg,
}

impl SeasonArgs {
    fn season(&self) -> SeasonWindow {
        SeasonWindow::new(self.season_start, self.season_end)
    }
}

/// Show the rotation class of a crop
#[derive(Args)]
pub struct ClassifyArgs {
    #[arg(help = "Crop identifier, e.g. lettuce")]
    pub crop: String,
}

/// Size beds for crops
///
/// With a single crop, the plan is laid out series by series and checked
/// against the garden. With several crops, or none (every crop with demand),
/// the plans are checked together against the whole inventory.
#[derive(Args)]
pub struct PlanArgs {
    #[arg(help = "Crop identifiers; every crop with demand when omitted")]
    pub crops: Vec<String>,
    #[arg(short, long, help = "Garden whose bed length and bed count apply")]
    pub garden: Option<String>,
    #[arg(long, value_enum, default_value = "open-field")]
    pub protection: ProtectionArg,
    #[arg(short, long, help = "Climate zone; the catalog's first zone by default")]
    pub zone: Option<String>,
    #[arg(long, help = "Season year, to show week dates")]
    pub year: Option<i16>,
    #[command(flatten)]
    pub season: SeasonArgs,
}

impl PlanArgs {
    fn crop_params(&self, crop_id: &str) -> PlanCrop {
        PlanCrop {
            crop_id: crop_id.to_string(),
            fallow_gap_weeks: self.season.fallow,
            season: self.season.season(),
            maturity_level: self.season.maturity.into(),
            garden_id: self.garden.clone(),
            protection: self.protection.into(),
            zone_id: self.zone.clone(),
        }
    }
}

impl From<&PlanArgs> for PlanPortfolio {
    fn from(val: &PlanArgs) -> Self {
        PlanPortfolio {
            crop_ids: val.crops.clone(),
            fallow_gap_weeks: val.season.fallow,
            season: val.season.season(),
            maturity_level: val.season.maturity.into(),
        }
    }
}

/// Retro-plan a series from its harvest week
#[derive(Args)]
pub struct RetroArgs {
    #[arg(help = "Crop identifier")]
    pub crop: String,
    #[arg(help = "Week the harvest should start", allow_negative_numbers = true)]
    pub harvest_week: Week,
    #[arg(long, value_enum, default_value = "open-field")]
    pub protection: ProtectionArg,
    #[arg(short, long, help = "Climate zone; the catalog's first zone by default")]
    pub zone: Option<String>,
    #[arg(
        long,
        value_enum,
        requires = "edit_week",
        help = "Date to move after the initial derivation"
    )]
    pub edit: Option<AnchorArg>,
    #[arg(long, requires = "edit", allow_negative_numbers = true, help = "New week of the edited date")]
    pub edit_week: Option<Week>,
    #[arg(long, help = "Season year, to show week dates")]
    pub year: Option<i16>,
}

impl From<RetroArgs> for DeriveSeries {
    fn from(val: RetroArgs) -> Self {
        DeriveSeries {
            crop_id: val.crop,
            harvest_start: val.harvest_week,
            protection: val.protection.into(),
            zone_id: val.zone,
            edit: val.edit.zip(val.edit_week).map(|(anchor, week)| DateEdit {
                anchor: anchor.into(),
                week,
            }),
        }
    }
}

/// Plan a crop and commit it to consecutive garden beds
#[derive(Args)]
pub struct CommitArgs {
    #[arg(help = "Crop identifier")]
    pub crop: String,
    #[arg(short, long, help = "Garden receiving the series")]
    pub garden: String,
    #[arg(long, default_value_t = 1, help = "First bed of the run, numbered from 1")]
    pub first_bed: u32,
    #[arg(long, value_enum, default_value = "open-field")]
    pub protection: ProtectionArg,
    #[arg(short, long, help = "Climate zone; the catalog's first zone by default")]
    pub zone: Option<String>,
    #[command(flatten)]
    pub season: SeasonArgs,
}

impl From<CommitArgs> for CommitPlan {
    fn from(val: CommitArgs) -> Self {
        CommitPlan {
            plan: PlanCrop {
                crop_id: val.crop,
                fallow_gap_weeks: val.season.fallow,
                season: val.season.season(),
                maturity_level: val.season.maturity.into(),
                garden_id: Some(val.garden.clone()),
                protection: val.protection.into(),
                zone_id: val.zone,
            },
            garden_id: val.garden,
            first_bed: val.first_bed,
        }
    }
}

/// Remove a committed series
#[derive(Args)]
pub struct ReleaseArgs {
    #[arg(help = "Identifier of the committed series, e.g. lettuce-b1-r2@main/3")]
    pub series_id: String,
}

/// List committed occupations
#[derive(Args)]
pub struct TimelineArgs {
    #[arg(short, long, help = "Only show this garden")]
    pub garden: Option<String>,
}

impl From<TimelineArgs> for ListCommitments {
    fn from(val: TimelineArgs) -> Self {
        ListCommitments {
            garden_id: val.garden,
        }
    }
}

/// Inspect one bed over a range of weeks
#[derive(Args)]
pub struct BedArgs {
    #[arg(help = "Garden identifier")]
    pub garden: String,
    #[arg(help = "Bed number, from 1")]
    pub bed: u32,
    #[arg(long, default_value_t = FIRST_WEEK, help = "First week of the range")]
    pub from: Week,
    #[arg(long, default_value_t = LAST_WEEK, help = "Week after the range")]
    pub to: Week,
}

impl From<BedArgs> for BedQuery {
    fn from(val: BedArgs) -> Self {
        BedQuery {
            garden_id: val.garden,
            bed_index: val.bed,
            from: val.from,
            to: val.to,
        }
    }
}

/// Estimate intercropping savings
#[derive(Args)]
pub struct SavingsArgs {
    #[arg(help = "Crop identifiers; every crop with demand when omitted")]
    pub crops: Vec<String>,
    #[command(flatten)]
    pub season: SeasonArgs,
}

impl From<SavingsArgs> for PlanPortfolio {
    fn from(val: SavingsArgs) -> Self {
        PlanPortfolio {
            season: val.season.season(),
            fallow_gap_weeks: val.season.fallow,
            maturity_level: val.season.maturity.into(),
            crop_ids: val.crops,
        }
    }
}

/// Runs commands against a garden and renders their results.
pub struct Cli {
    garden: Garden,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(garden: Garden, renderer: TerminalRenderer) -> Self {
        Self { garden, renderer }
    }

    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Crops => self.list_crops(),
            Commands::Classify(args) => self.classify(&args),
            Commands::Plan(args) => self.plan(&args),
            Commands::Retro(args) => self.retro(args),
            Commands::Commit(args) => self.commit(args).await,
            Commands::Release(args) => self.release(&args).await,
            Commands::Timeline(args) => self.timeline(args).await,
            Commands::Beds(args) => self.bed(args).await,
            Commands::Savings(args) => self.savings(args),
        }
    }

    pub fn list_crops(&self) -> Result<()> {
        let crops = Crops(self.garden.catalog().crops.clone());
        self.renderer.render(&format!("# Crops\n\n{crops}"))
    }

    fn classify(&self, args: &ClassifyArgs) -> Result<()> {
        let crop = self
            .garden
            .catalog()
            .crop(&args.crop)
            .context("Failed to classify crop")?;
        let calculator = self.garden.calculator();
        let class = calculator.classify_cycle(crop);
        let rotations = calculator.resolve_rotations(crop);
        self.renderer.render(&format!(
            "{} (`{}`): **{class}** cycle, up to {rotations} rotations per season\n",
            crop.name, crop.id
        ))
    }

    fn plan(&self, args: &PlanArgs) -> Result<()> {
        if let [crop_id] = args.crops.as_slice() {
            debug!("Planning crop {crop_id}");
            let report = self
                .garden
                .plan_crop(&args.crop_params(crop_id))
                .context("Failed to plan crop")?;
            return self
                .renderer
                .render(&Calendar::new(&report).with_year(args.year).to_string());
        }

        let portfolio = self
            .garden
            .plan_portfolio(&PlanPortfolio::from(args))
            .context("Failed to plan crops")?;
        self.renderer.render(&portfolio.to_string())
    }

    fn retro(&self, args: RetroArgs) -> Result<()> {
        let year = args.year;
        let report = self
            .garden
            .derive_series(&args.into())
            .context("Failed to retro-plan series")?;
        self.renderer
            .render(&Calendar::new(&report).with_year(year).to_string())
    }

    async fn commit(&self, args: CommitArgs) -> Result<()> {
        let report = self
            .garden
            .commit_crop(&args.into())
            .await
            .context("Failed to commit plan")?;
        self.renderer.render(&report.to_string())
    }

    async fn release(&self, args: &ReleaseArgs) -> Result<()> {
        let commitment = self
            .garden
            .release_series(&args.series_id)
            .await
            .context("Failed to release series")?;
        self.renderer.render(&format!(
            "Released `{}` from bed {}.\n",
            commitment.occupation.series_id, commitment.bed
        ))
    }

    async fn timeline(&self, args: TimelineArgs) -> Result<()> {
        let commitments = self
            .garden
            .list_commitments(&args.into())
            .await
            .context("Failed to list occupations")?;
        self.renderer
            .render(&format!("# Committed beds\n\n{}", Commitments(commitments)))
    }

    async fn bed(&self, args: BedArgs) -> Result<()> {
        let bed = BedId::new(&args.garden, args.bed);
        let overview = self
            .garden
            .bed_overview(&args.into())
            .await
            .with_context(|| format!("Failed to inspect bed {bed}"))?;
        self.renderer.render(&overview.to_string())
    }

    fn savings(&self, args: SavingsArgs) -> Result<()> {
        let portfolio = self
            .garden
            .plan_portfolio(&args.into())
            .context("Failed to plan crops")?;
        self.renderer
            .render(&format!("# Intercropping\n\n{}", portfolio.savings))
    }
}
