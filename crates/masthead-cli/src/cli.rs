//! Command handlers bridging CLI arguments to the listing engine.
//!
//! Each handler builds on the core crate's public surface: the store for
//! seeding, a [`ListingController`] session for listing, and the config
//! types for schema output. CLI concerns (paths, process output) stay
//! here; listing semantics stay in masthead-core.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use masthead_core::{ListingConfig, ListingController, ListingView, PostSummary, SqliteStore};

use crate::renderer::TerminalRenderer;

/// Command handler owning the store handle and output renderer.
pub struct Cli {
    store: Arc<SqliteStore>,
    renderer: TerminalRenderer,
}

impl Cli {
    /// Create a handler over an opened store.
    pub fn new(store: SqliteStore, renderer: TerminalRenderer) -> Self {
        Self {
            store: Arc::new(store),
            renderer,
        }
    }

    /// Run a listing session and render its snapshot.
    ///
    /// The session is short-lived: an initial fetch, an optional page
    /// jump, then one render of the resulting state.
    pub async fn list(&self, config_path: Option<&Path>, page: Option<u32>) -> Result<()> {
        let config = match config_path {
            Some(path) => load_config(path)?,
            None => ListingConfig::default(),
        };

        let controller = ListingController::new(Arc::clone(&self.store), config);
        controller.refresh().await;
        if let Some(page) = page {
            controller.jump_to_page(page).await;
        }

        let snapshot = controller.snapshot();
        self.renderer.render(&ListingView(&snapshot).to_string())
    }

    /// Import post documents from a JSON file into the store.
    pub async fn seed(&self, file: &Path) -> Result<()> {
        let payload = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let posts: Vec<PostSummary> =
            serde_json::from_str(&payload).context("Failed to parse post documents")?;

        let imported = self
            .store
            .import_posts(posts)
            .await
            .context("Failed to import posts")?;

        self.renderer.render(&format!("Imported {imported} posts\n"))
    }

    /// Print the JSON schema for [`ListingConfig`], for the configuration
    /// authoring surface.
    pub fn schema(&self) -> Result<()> {
        let schema = schemars::schema_for!(ListingConfig);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}

fn load_config(path: &Path) -> Result<ListingConfig> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&payload).context("Failed to parse listing configuration")
}
