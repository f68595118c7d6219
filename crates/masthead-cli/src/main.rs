//! Masthead CLI Application
//!
//! Command-line interface for the Masthead post-listing engine.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use masthead_core::SqliteStore;
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args { database_file, no_color, command } = Args::parse();

    let store = SqliteStore::builder()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to open document store")?;

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(store, renderer);

    info!("Masthead started");

    match command {
        Some(Commands::List { config, page }) => cli.list(config.as_deref(), page).await,
        Some(Commands::Seed { file }) => cli.seed(&file).await,
        Some(Commands::Schema) => cli.schema(),
        None => cli.list(None, None).await,
    }
}
