//! Pure query planning: configuration in, retrieval plan out.
//!
//! [`build_plan`] is total and side-effect free. Every configuration,
//! however contradictory, resolves to a well-defined plan; the store
//! adapters translate the plan into their native query language.

use crate::models::{DisplaySelector, ListingConfig, OrderBy, PaginationMode, PostId};

/// Selection rule over the document collection.
///
/// A selector whose identifier list is empty resolves to [`MatchAll`]: a
/// curated listing with zero selections shows the full collection, never an
/// empty one.
///
/// [`MatchAll`]: Predicate::MatchAll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Every post in the collection
    MatchAll,

    /// Posts whose identity is in the list
    IdIn(Vec<PostId>),

    /// Posts carrying at least one of the listed categories
    CategoryIn(Vec<PostId>),

    /// Posts written by one of the listed authors
    AuthorIn(Vec<PostId>),
}

impl Predicate {
    /// Resolve the predicate for a configuration, applying the
    /// empty-list-means-match-all fallback.
    pub fn resolve(config: &ListingConfig) -> Self {
        match config.effective_selector() {
            DisplaySelector::AllPosts => Self::MatchAll,
            DisplaySelector::SelectManually => {
                Self::id_list_or_all(&config.explicit_post_ids, Self::IdIn)
            }
            DisplaySelector::Category => {
                Self::id_list_or_all(&config.category_ids, Self::CategoryIn)
            }
            DisplaySelector::Author => Self::id_list_or_all(&config.author_ids, Self::AuthorIn),
        }
    }

    fn id_list_or_all(ids: &[PostId], variant: fn(Vec<PostId>) -> Self) -> Self {
        if ids.is_empty() {
            Self::MatchAll
        } else {
            variant(ids.to_vec())
        }
    }
}

/// Total order applied to the matched posts before windowing.
///
/// The publish-date orderings substitute the creation timestamp for posts
/// without an explicit publish timestamp, and every ordering carries a
/// final tiebreak on document identity so equal keys still sort
/// deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Publish date descending, creation date standing in when absent
    PublishedDesc,

    /// Publish date ascending, creation date standing in when absent
    PublishedAsc,

    /// Title ascending
    TitleAsc,

    /// Title descending
    TitleDesc,
}

impl SortOrder {
    /// Resolve the ordering for a configuration.
    pub fn resolve(config: &ListingConfig) -> Self {
        match config.effective_order_by() {
            OrderBy::NewestToOldest => Self::PublishedDesc,
            OrderBy::OldestToNewest => Self::PublishedAsc,
            OrderBy::AToZ => Self::TitleAsc,
            OrderBy::ZToA => Self::TitleDesc,
        }
    }
}

/// One page of results: skip `offset` matched posts, take `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Number of matched posts to skip
    pub offset: u64,

    /// Maximum number of posts to return
    pub limit: u32,
}

/// Complete retrieval plan derived from a configuration and a page index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Which posts to select
    pub predicate: Predicate,

    /// How to order them
    pub ordering: SortOrder,

    /// Which page of them to return; `None` returns everything
    pub window: Option<Window>,
}

/// Build the retrieval plan for `config` at 1-based `page`.
///
/// Pure and total: no configuration fails to plan. Page indexes below 1 are
/// treated as 1.
pub fn build_plan(config: &ListingConfig, page: u32) -> QueryPlan {
    let window = match config.effective_pagination_mode() {
        PaginationMode::None => None,
        PaginationMode::LoadMore | PaginationMode::Pagination => {
            let limit = config.effective_page_size();
            let offset = u64::from(page.max(1) - 1) * u64::from(limit);
            Some(Window { offset, limit })
        }
    };

    QueryPlan {
        predicate: Predicate::resolve(config),
        ordering: SortOrder::resolve(config),
        window,
    }
}
