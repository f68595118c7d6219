//! Listing controller: the pagination state machine over a document store.
//!
//! One controller owns the state of one mounted listing session. Every
//! configuration or page change re-plans the query, issues a tagged fetch,
//! and merges the response under the mode-dependent policy: load-more pages
//! append, everything else replaces. Responses are applied in request
//! order; a response for a superseded request is discarded, so rapid
//! configuration changes can never leave stale results on screen.

use std::sync::{
    atomic::{AtomicU64, Ordering as AtomicOrdering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use log::{debug, warn};

use crate::{
    models::{Layout, ListingConfig, PaginationMode, PostSummary},
    plan::{self, Predicate, QueryPlan, SortOrder},
    store::DocumentStore,
};

/// Stateful orchestrator for one listing session.
///
/// The store handle is explicit and shared ([`Arc`]), so multiple sessions
/// can run against one store and tests can inject doubles. All methods take
/// `&self`; overlapping calls are legal and resolved by the sequence tag.
pub struct ListingController<S> {
    store: Arc<S>,
    state: Mutex<ListingState>,
    seq: AtomicU64,
}

/// Mutable session state, owned exclusively by the controller.
struct ListingState {
    config: ListingConfig,
    current_page: u32,
    items: Vec<PostSummary>,
    total_matching: u64,
    /// Sequence number of the in-flight fetch, 0 when idle.
    fetching_seq: u64,
}

/// One issued fetch: the plan it was built from, its sequence tag, and the
/// merge policy to apply on completion.
struct FetchTicket {
    seq: u64,
    plan: QueryPlan,
    append: bool,
}

/// Display-ready view of the session state for the rendering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSnapshot {
    /// Posts currently shown, merged per the pagination mode
    pub items: Vec<PostSummary>,

    /// Presentation layout, carried through from the configuration
    pub layout: Layout,

    /// Visibility toggles, carried through from the configuration
    pub show_featured_image: bool,
    pub show_category: bool,
    pub show_content: bool,
    pub display_author_name: bool,
    pub display_date: bool,

    /// Pagination style in effect
    pub pagination_mode: PaginationMode,

    /// Current 1-based page index
    pub current_page: u32,

    /// Total posts matching the predicate, unwindowed
    pub total_matching: u64,

    /// Page count under the effective page size; 1 when unpaginated
    pub total_pages: u32,

    /// Whether more matching posts exist beyond the ones shown
    pub has_more: bool,

    /// Whether a fetch is in flight
    pub is_fetching: bool,

    /// Whether a fetch is in flight with nothing shown yet
    pub is_initial_loading: bool,
}

impl<S: DocumentStore> ListingController<S> {
    /// Creates a controller for `config` against `store`. No fetch is
    /// issued until [`refresh`](Self::refresh) or a change operation runs.
    pub fn new(store: Arc<S>, config: ListingConfig) -> Self {
        Self {
            store,
            state: Mutex::new(ListingState {
                config,
                current_page: 1,
                items: Vec::new(),
                total_matching: 0,
                fetching_seq: 0,
            }),
            seq: AtomicU64::new(0),
        }
    }

    /// Fetch the current page under the current configuration.
    ///
    /// Used for the initial load, and to repeat a fetch after a retrieval
    /// failure (the controller never retries on its own).
    pub async fn refresh(&self) {
        let ticket = {
            let mut state = self.state();
            self.issue(&mut state, false)
        };
        self.run_fetch(ticket).await;
    }

    /// Apply a configuration change, optionally requesting a page.
    ///
    /// If any query-affecting aspect changed (predicate, ordering,
    /// pagination mode, or effective page size) the page resets to 1 and
    /// the next response replaces the shown items. A change to layout or
    /// visibility toggles alone applies synchronously without a fetch:
    /// the result set cannot have changed, and refetching the current page
    /// in load-more mode would append items already shown. A call made
    /// while a fetch is in flight supersedes it.
    pub async fn apply_config(&self, config: ListingConfig, requested_page: Option<u32>) {
        let ticket = {
            let mut state = self.state();
            let query_changed = query_fingerprint(&config) != query_fingerprint(&state.config);
            state.config = config;

            if query_changed {
                state.current_page = 1;
            } else {
                match requested_page.map(|page| page.max(1)) {
                    Some(page) if page != state.current_page => state.current_page = page,
                    // Presentation-only change, or a request for the page
                    // already shown: nothing to fetch.
                    _ => return,
                }
            }
            let append = append_policy(&state);
            self.issue(&mut state, append)
        };
        self.run_fetch(ticket).await;
    }

    /// Advance one page in load-more style: the next page's posts are
    /// appended to the ones shown. No-op while a fetch is in flight.
    pub async fn advance_for_load_more(&self) {
        let ticket = {
            let mut state = self.state();
            if state.fetching_seq != 0 {
                return;
            }
            state.current_page += 1;
            let append = append_policy(&state);
            self.issue(&mut state, append)
        };
        self.run_fetch(ticket).await;
    }

    /// Jump to `page` (1-based), replacing the shown posts. No-op while a
    /// fetch is in flight or when already on `page`.
    pub async fn jump_to_page(&self, page: u32) {
        let ticket = {
            let mut state = self.state();
            let page = page.max(1);
            if state.fetching_seq != 0 || page == state.current_page {
                return;
            }
            state.current_page = page;
            self.issue(&mut state, false)
        };
        self.run_fetch(ticket).await;
    }

    /// Snapshot the session state for rendering.
    pub fn snapshot(&self) -> ListingSnapshot {
        let state = self.state();
        let mode = state.config.effective_pagination_mode();
        let page_size = state.config.effective_page_size();
        let total_pages = if state.config.is_paginated() {
            ceil_div(state.total_matching, u64::from(page_size)) as u32
        } else {
            1
        };

        ListingSnapshot {
            items: state.items.clone(),
            layout: state.config.effective_layout(),
            show_featured_image: state.config.show_featured_image,
            show_category: state.config.show_category,
            show_content: state.config.show_content,
            display_author_name: state.config.display_author_name,
            display_date: state.config.display_date,
            pagination_mode: mode,
            current_page: state.current_page,
            total_matching: state.total_matching,
            total_pages,
            has_more: (state.items.len() as u64) < state.total_matching,
            is_fetching: state.fetching_seq != 0,
            is_initial_loading: state.fetching_seq != 0 && state.items.is_empty(),
        }
    }

    fn state(&self) -> MutexGuard<'_, ListingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tag a new fetch as the latest issued request. Must run with the
    /// state lock held so the tag and the plan it was built from agree.
    fn issue(&self, state: &mut ListingState, append: bool) -> FetchTicket {
        let seq = self.seq.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        state.fetching_seq = seq;
        FetchTicket {
            seq,
            plan: plan::build_plan(&state.config, state.current_page),
            append,
        }
    }

    /// Execute a ticket: fetch page and count together, then apply the
    /// response only if the ticket is still the latest issued request.
    async fn run_fetch(&self, ticket: FetchTicket) {
        let FetchTicket { seq, plan, append } = ticket;

        let (page, count) = tokio::join!(
            self.store.fetch_page(&plan),
            self.store.count_matching(&plan.predicate)
        );

        let mut state = self.state();
        if seq != self.seq.load(AtomicOrdering::SeqCst) {
            // A later request superseded this one; routine under rapid
            // interaction, not an error.
            debug!("Discarding stale listing response (seq {seq})");
            return;
        }
        state.fetching_seq = 0;

        match (page, count) {
            (Ok(items), Ok(total)) => {
                if append {
                    state.items.extend(items);
                } else {
                    state.items = items;
                }
                state.total_matching = total;
            }
            (Err(e), _) | (_, Err(e)) => {
                // Keep the last good items and count; retry is the
                // caller's call.
                warn!("Listing fetch failed, keeping previous results: {e}");
            }
        }
    }
}

/// Append only when loading more onto an existing first page; every other
/// case replaces.
fn append_policy(state: &ListingState) -> bool {
    state.config.effective_pagination_mode() == PaginationMode::LoadMore && state.current_page > 1
}

/// The query-affecting projection of a configuration. Two configurations
/// with equal fingerprints render the same result set shape, so changing
/// between them never resets the page.
fn query_fingerprint(config: &ListingConfig) -> (Predicate, SortOrder, PaginationMode, u32) {
    (
        Predicate::resolve(config),
        SortOrder::resolve(config),
        config.effective_pagination_mode(),
        config.effective_page_size(),
    )
}

fn ceil_div(value: u64, divisor: u64) -> u64 {
    value / divisor + u64::from(value % divisor != 0)
}
