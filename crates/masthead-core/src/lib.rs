//! Core library for the Masthead content-listing engine.
//!
//! This crate turns a declarative [`ListingConfig`] into a deterministic
//! retrieval [`QueryPlan`](plan::QueryPlan), executes it against a
//! [`DocumentStore`], and maintains pagination state across repeated
//! fetches.
//!
//! # Architecture
//!
//! - **Planning** ([`plan`]): pure configuration-to-plan resolution into a
//!   selection predicate, a total ordering, and an optional page window
//! - **Control** ([`controller`]): the stateful listing session with
//!   sequence-tagged fetches, accumulate-vs-replace merging, and derived
//!   pagination state
//! - **Stores** ([`store`]): the retrieval boundary, with a SQLite adapter
//!   that binds every identifier through parameters and an in-memory
//!   adapter for tests and embedded use
//! - **Display** ([`display`]): markdown wrappers over listing snapshots
//!   for the rendering collaborator
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use masthead_core::{ListingConfig, ListingController, MemoryStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // A store shared by any number of listing sessions
//! let store = Arc::new(MemoryStore::new(Vec::new()));
//!
//! // One controller per mounted listing
//! let controller = ListingController::new(store, ListingConfig::default());
//! controller.refresh().await;
//!
//! let snapshot = controller.snapshot();
//! println!("{} of {} posts", snapshot.items.len(), snapshot.total_matching);
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod display;
pub mod error;
pub mod models;
pub mod plan;
pub mod store;

// Re-export commonly used types
pub use controller::{ListingController, ListingSnapshot};
pub use display::{ListingView, LocalDate};
pub use error::{ListingError, Result};
pub use models::{
    CategoryRef, DisplaySelector, ImageRef, Layout, ListingConfig, OrderBy, PaginationMode,
    PostAuthor, PostId, PostSummary,
};
pub use plan::{build_plan, Predicate, QueryPlan, SortOrder, Window};
pub use store::{DocumentStore, MemoryStore, SqliteStore, SqliteStoreBuilder};
