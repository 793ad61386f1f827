//! bedplan CLI application
//!
//! Command-line interface for the bedplan vegetable-bed planner.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::Args;
use bedplan_core::{Catalog, GardenBuilder};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        catalog,
        no_color,
        command,
    } = Args::parse();

    let catalog = Catalog::load(catalog.as_deref()).context("Failed to load catalog")?;
    let garden = GardenBuilder::new()
        .with_database_path(database_file)
        .with_catalog(catalog)
        .build()
        .await
        .context("Failed to initialize garden")?;

    info!("bedplan started");

    let cli = Cli::new(garden, TerminalRenderer::for_stdout(no_color));
    match command {
        Some(command) => cli.handle_command(command).await,
        None => cli.list_crops(),
    }
}
