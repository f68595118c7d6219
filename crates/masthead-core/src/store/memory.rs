//! In-process document store.
//!
//! Evaluates plans directly over a vector of post summaries. This is the
//! reference semantics for plan evaluation and the test double for
//! controller behavior; production listings use [`super::SqliteStore`].

use std::cmp::Ordering as CmpOrdering;

use async_trait::async_trait;

use super::DocumentStore;
use crate::{
    error::Result,
    models::PostSummary,
    plan::{Predicate, QueryPlan, SortOrder},
};

/// Document store holding its entire collection in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    posts: Vec<PostSummary>,
}

impl MemoryStore {
    /// Create a store over the given collection.
    pub fn new(posts: Vec<PostSummary>) -> Self {
        Self { posts }
    }

    /// Number of documents in the collection, matched or not.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn matching(&self, predicate: &Predicate) -> Vec<&PostSummary> {
        self.posts
            .iter()
            .filter(|post| predicate_matches(predicate, post))
            .collect()
    }
}

/// Whether `post` satisfies `predicate`.
fn predicate_matches(predicate: &Predicate, post: &PostSummary) -> bool {
    match predicate {
        Predicate::MatchAll => true,
        Predicate::IdIn(ids) => ids.contains(&post.id),
        Predicate::CategoryIn(ids) => post.categories.iter().any(|c| ids.contains(&c.id)),
        Predicate::AuthorIn(ids) => post
            .author
            .as_ref()
            .is_some_and(|author| ids.contains(&author.id)),
    }
}

/// Compare two posts under `ordering`, with the ascending identity tiebreak
/// applied last.
fn compare_posts(ordering: SortOrder, a: &PostSummary, b: &PostSummary) -> CmpOrdering {
    let primary = match ordering {
        SortOrder::PublishedDesc => b
            .effective_published_at()
            .cmp(&a.effective_published_at()),
        SortOrder::PublishedAsc => a
            .effective_published_at()
            .cmp(&b.effective_published_at()),
        SortOrder::TitleAsc => a.title.cmp(&b.title),
        SortOrder::TitleDesc => b.title.cmp(&a.title),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_page(&self, plan: &QueryPlan) -> Result<Vec<PostSummary>> {
        let mut matched = self.matching(&plan.predicate);
        matched.sort_by(|a, b| compare_posts(plan.ordering, a, b));

        let page = match plan.window {
            Some(window) => matched
                .into_iter()
                .skip(window.offset as usize)
                .take(window.limit as usize)
                .cloned()
                .collect(),
            None => matched.into_iter().cloned().collect(),
        };
        Ok(page)
    }

    async fn count_matching(&self, predicate: &Predicate) -> Result<u64> {
        Ok(self.matching(predicate).len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryRef, PostAuthor, PostId};
    use crate::plan::Window;

    fn post(id: &str, title: &str, published: Option<&str>, created: &str) -> PostSummary {
        PostSummary {
            id: PostId::from(id),
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            featured_image: None,
            excerpt: None,
            published_at: published.map(|p| p.parse().expect("valid timestamp")),
            created_at: created.parse().expect("valid timestamp"),
            author: None,
            categories: Vec::new(),
        }
    }

    fn fixture() -> MemoryStore {
        // "banana" has no publish timestamp; its creation date slots it
        // between the published posts.
        MemoryStore::new(vec![
            post("p1", "Cherry", Some("2024-01-10T00:00:00Z"), "2023-12-01T00:00:00Z"),
            post("p2", "Banana", None, "2024-02-15T00:00:00Z"),
            post("p3", "Apple", Some("2024-03-20T00:00:00Z"), "2024-03-01T00:00:00Z"),
        ])
    }

    fn titles(posts: &[PostSummary]) -> Vec<&str> {
        posts.iter().map(|p| p.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_published_ordering_uses_creation_fallback() {
        let store = fixture();

        let plan = QueryPlan {
            predicate: Predicate::MatchAll,
            ordering: SortOrder::PublishedDesc,
            window: None,
        };
        let posts = store.fetch_page(&plan).await.expect("fetch");
        assert_eq!(titles(&posts), vec!["Apple", "Banana", "Cherry"]);

        let plan = QueryPlan {
            ordering: SortOrder::PublishedAsc,
            ..plan
        };
        let posts = store.fetch_page(&plan).await.expect("fetch");
        assert_eq!(titles(&posts), vec!["Cherry", "Banana", "Apple"]);
    }

    #[tokio::test]
    async fn test_title_ordering() {
        let store = fixture();

        let plan = QueryPlan {
            predicate: Predicate::MatchAll,
            ordering: SortOrder::TitleAsc,
            window: None,
        };
        let posts = store.fetch_page(&plan).await.expect("fetch");
        assert_eq!(titles(&posts), vec!["Apple", "Banana", "Cherry"]);
    }

    #[tokio::test]
    async fn test_equal_titles_break_ties_on_identity() {
        let store = MemoryStore::new(vec![
            post("z9", "Same", None, "2024-01-01T00:00:00Z"),
            post("a1", "Same", None, "2024-01-01T00:00:00Z"),
        ]);
        let plan = QueryPlan {
            predicate: Predicate::MatchAll,
            ordering: SortOrder::TitleAsc,
            window: None,
        };
        let posts = store.fetch_page(&plan).await.expect("fetch");
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "z9"]);
    }

    #[tokio::test]
    async fn test_window_slices_after_ordering() {
        let store = fixture();
        let plan = QueryPlan {
            predicate: Predicate::MatchAll,
            ordering: SortOrder::TitleAsc,
            window: Some(Window { offset: 1, limit: 1 }),
        };
        let posts = store.fetch_page(&plan).await.expect("fetch");
        assert_eq!(titles(&posts), vec!["Banana"]);
    }

    #[tokio::test]
    async fn test_predicates_filter_and_count() {
        let mut posts = vec![
            post("p1", "Cherry", None, "2024-01-01T00:00:00Z"),
            post("p2", "Banana", None, "2024-01-02T00:00:00Z"),
            post("p3", "Apple", None, "2024-01-03T00:00:00Z"),
        ];
        posts[0].author = Some(PostAuthor {
            id: PostId::from("author-1"),
            name: "Ada".to_string(),
            image: None,
        });
        posts[1].categories = vec![CategoryRef {
            id: PostId::from("cat-1"),
            title: "News".to_string(),
        }];
        let store = MemoryStore::new(posts);

        let by_author = Predicate::AuthorIn(vec![PostId::from("author-1")]);
        assert_eq!(store.count_matching(&by_author).await.expect("count"), 1);

        let by_category = Predicate::CategoryIn(vec![PostId::from("cat-1")]);
        assert_eq!(store.count_matching(&by_category).await.expect("count"), 1);

        let by_id = Predicate::IdIn(vec![PostId::from("p3"), PostId::from("p1")]);
        assert_eq!(store.count_matching(&by_id).await.expect("count"), 2);

        // Identifiers that resolve to nothing match nothing; the match-all
        // fallback applies only to empty lists, at plan time.
        let stale = Predicate::IdIn(vec![PostId::from("gone")]);
        assert_eq!(store.count_matching(&stale).await.expect("count"), 0);
    }
}
