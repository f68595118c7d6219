use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Main command-line interface for the Masthead listing engine
///
/// Masthead runs declarative post-listing configurations against a local
/// document store: seed post documents once, then render listings from
/// JSON configurations with filtering, ordering, and pagination.
#[derive(Parser)]
#[command(version, about, name = "mh")]
pub struct Args {
    /// Path to the SQLite store file. Defaults to
    /// $XDG_DATA_HOME/masthead/masthead.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Masthead CLI
///
/// Running without a command lists the store with the default
/// configuration (all posts, grid, newest first).
#[derive(Subcommand)]
pub enum Commands {
    /// Run a listing and render the results
    #[command(alias = "l")]
    List {
        /// Listing configuration JSON file; omitted means the default
        /// all-posts listing
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Page to show (1-based); only meaningful for paginated
        /// configurations
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Import post documents from a JSON file into the store
    Seed {
        /// JSON file holding an array of post documents
        file: PathBuf,
    },
    /// Print the JSON schema for listing configurations
    Schema,
}
