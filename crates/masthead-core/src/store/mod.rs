//! Document store boundary.
//!
//! The listing engine never speaks a store's query language directly: it
//! hands a structured [`QueryPlan`] across this trait and the adapter owns
//! the translation. Identifier lists always travel as structured values and
//! are encoded through the adapter's parameter-binding path, never spliced
//! into query text.

use async_trait::async_trait;

use crate::{
    error::Result,
    models::PostSummary,
    plan::{Predicate, QueryPlan},
};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, SqliteStoreBuilder};

/// Read-only retrieval interface over a post document collection.
///
/// Implementations must answer both halves of a listing fetch: one windowed
/// page of matching posts, and the unwindowed count of everything the
/// predicate matches.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the posts selected, ordered, and windowed by `plan`.
    async fn fetch_page(&self, plan: &QueryPlan) -> Result<Vec<PostSummary>>;

    /// Count every post matching `predicate`, ignoring any window.
    async fn count_matching(&self, predicate: &Predicate) -> Result<u64>;
}
