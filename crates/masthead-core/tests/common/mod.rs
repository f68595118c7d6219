use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use jiff::Timestamp;
use masthead_core::{
    CategoryRef, DocumentStore, ListingError, MemoryStore, PostAuthor, PostId, PostSummary,
    Predicate, QueryPlan, SqliteStore,
};
use tempfile::TempDir;
use tokio::sync::Notify;

/// 2024-01-01T00:00:00Z
const FIXTURE_EPOCH: i64 = 1_704_067_200;

/// Deterministic post fixtures.
///
/// Post `i` (1-based) is created on day `i`; every fourth post has no
/// publish timestamp and relies on the creation-date fallback. Identifier,
/// title, and effective publish order all agree with `i`, so page contents
/// are predictable under every ordering.
pub fn fixture_posts(count: usize) -> Vec<PostSummary> {
    (1..=count)
        .map(|i| {
            let created = day(i as i64);
            let published = if i % 4 == 0 {
                None
            } else {
                Some(day(i as i64).checked_add(jiff::Span::new().hours(1)).expect("in range"))
            };

            let author = if i % 2 == 1 {
                PostAuthor {
                    id: PostId::from("author-1"),
                    name: "Ada".to_string(),
                    image: None,
                }
            } else {
                PostAuthor {
                    id: PostId::from("author-2"),
                    name: "Grace".to_string(),
                    image: None,
                }
            };

            let mut categories = Vec::new();
            if i % 2 == 0 {
                categories.push(CategoryRef {
                    id: PostId::from("cat-news"),
                    title: "News".to_string(),
                });
            }
            if i % 3 == 0 {
                categories.push(CategoryRef {
                    id: PostId::from("cat-tech"),
                    title: "Tech".to_string(),
                });
            }

            PostSummary {
                id: PostId::from(format!("post-{i:02}").as_str()),
                title: format!("Post {i:02}"),
                slug: format!("post-{i:02}"),
                featured_image: None,
                excerpt: Some(format!("Excerpt for post {i:02}.")),
                published_at: published,
                created_at: created,
                author: Some(author),
                categories,
            }
        })
        .collect()
}

fn day(index: i64) -> Timestamp {
    Timestamp::from_second(FIXTURE_EPOCH + index * 86_400).expect("timestamp in range")
}

pub fn titles(posts: &[PostSummary]) -> Vec<String> {
    posts.iter().map(|p| p.title.clone()).collect()
}

/// Helper to create a seeded SQLite store in a temp directory.
pub async fn create_test_store(posts: Vec<PostSummary>) -> (TempDir, SqliteStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = SqliteStore::builder()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create store");
    store.import_posts(posts).await.expect("Failed to seed store");
    (temp_dir, store)
}

/// Memory-backed store with test instrumentation: call counting, simulated
/// retrieval failure, and per-window response gating for ordering tests.
pub struct InstrumentedStore {
    inner: MemoryStore,
    fetch_page_calls: AtomicUsize,
    failing: AtomicBool,
    gates: Mutex<HashMap<u64, Arc<Notify>>>,
}

impl InstrumentedStore {
    pub fn new(posts: Vec<PostSummary>) -> Self {
        Self {
            inner: MemoryStore::new(posts),
            fetch_page_calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetch_page_calls(&self) -> usize {
        self.fetch_page_calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold responses for pages starting at `offset` until released.
    pub fn gate_offset(&self, offset: u64) {
        self.gates
            .lock()
            .expect("gate lock")
            .insert(offset, Arc::new(Notify::new()));
    }

    /// Let one held response for `offset` through.
    pub fn release_offset(&self, offset: u64) {
        let gate = self.gates.lock().expect("gate lock").get(&offset).cloned();
        if let Some(gate) = gate {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl DocumentStore for InstrumentedStore {
    async fn fetch_page(&self, plan: &QueryPlan) -> masthead_core::Result<Vec<PostSummary>> {
        self.fetch_page_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(ListingError::retrieval("simulated store failure"));
        }

        let offset = plan.window.map(|w| w.offset).unwrap_or(0);
        let gate = self.gates.lock().expect("gate lock").get(&offset).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.inner.fetch_page(plan).await
    }

    async fn count_matching(&self, predicate: &Predicate) -> masthead_core::Result<u64> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ListingError::retrieval("simulated store failure"));
        }
        self.inner.count_matching(predicate).await
    }
}
