//! Listing configuration produced by the external authoring surface.
//!
//! The configuration arrives as JSON authored outside this crate, so every
//! field is treated as untrusted input: unrecognized enum values and
//! out-of-range numbers normalize to the documented defaults instead of
//! failing the parse. The `effective_*` accessors are the only way the rest
//! of the engine reads these fields.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::PostId;

/// Default number of posts per page when the configuration does not specify
/// a usable value.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Upper bound on posts per page.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Presentation layout for a listing. Carried through to the rendering
/// collaborator, never part of query logic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Cards arranged in a grid
    #[default]
    Grid,

    /// Single-column rows
    List,
}

/// Strategy for selecting which posts a listing shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum DisplaySelector {
    /// The whole collection
    #[default]
    AllPosts,

    /// Posts in any of the configured categories
    Category,

    /// Posts by any of the configured authors
    Author,

    /// An explicitly curated list of posts
    SelectManually,
}

/// Ordering applied to the matched posts before windowing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum OrderBy {
    /// Most recently published first
    #[default]
    NewestToOldest,

    /// Oldest published first
    OldestToNewest,

    /// Title ascending
    #[serde(rename = "AtoZ")]
    AToZ,

    /// Title descending
    #[serde(rename = "ZtoA")]
    ZToA,
}

/// Pagination style for a listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum PaginationMode {
    /// Everything in one fetch, no windowing
    #[default]
    None,

    /// Each page is appended to the posts already shown
    LoadMore,

    /// Each page replaces the posts already shown
    Pagination,
}

/// Declarative description of a post listing.
///
/// Field names serialize in camelCase to match the authoring surface.
/// Missing or malformed fields never fail deserialization; they resolve to
/// defaults through the `effective_*` accessors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ListingConfig {
    /// Presentation layout (defaults to grid)
    #[serde(deserialize_with = "lenient")]
    pub layout: Option<Layout>,

    /// Post selection strategy (defaults to all posts)
    #[serde(deserialize_with = "lenient")]
    pub display_selector: Option<DisplaySelector>,

    /// Category identifiers, used only when the selector is `Category`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category_ids: Vec<PostId>,

    /// Author identifiers, used only when the selector is `Author`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub author_ids: Vec<PostId>,

    /// Curated post identifiers, used only when the selector is
    /// `SelectManually`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_post_ids: Vec<PostId>,

    /// Ordering of the matched posts (defaults to newest first)
    #[serde(deserialize_with = "lenient")]
    pub order_by: Option<OrderBy>,

    /// Pagination style (defaults to none)
    #[serde(deserialize_with = "lenient")]
    pub pagination_mode: Option<PaginationMode>,

    /// Posts per page; clamped into [1, 50], non-positive or missing values
    /// fall back to 6
    #[serde(deserialize_with = "lenient")]
    pub page_size: Option<i64>,

    /// Render the featured image
    pub show_featured_image: bool,

    /// Render the category line
    pub show_category: bool,

    /// Render the excerpt
    pub show_content: bool,

    /// Render the author name
    pub display_author_name: bool,

    /// Render the publish date
    pub display_date: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            layout: None,
            display_selector: None,
            category_ids: Vec::new(),
            author_ids: Vec::new(),
            explicit_post_ids: Vec::new(),
            order_by: None,
            pagination_mode: None,
            page_size: None,
            show_featured_image: true,
            show_category: true,
            show_content: true,
            display_author_name: true,
            display_date: true,
        }
    }
}

impl ListingConfig {
    /// Layout with the grid default applied.
    pub fn effective_layout(&self) -> Layout {
        self.layout.unwrap_or_default()
    }

    /// Selection strategy with the all-posts default applied.
    pub fn effective_selector(&self) -> DisplaySelector {
        self.display_selector.unwrap_or_default()
    }

    /// Ordering with the newest-first default applied.
    pub fn effective_order_by(&self) -> OrderBy {
        self.order_by.unwrap_or_default()
    }

    /// Pagination mode with the no-pagination default applied.
    pub fn effective_pagination_mode(&self) -> PaginationMode {
        self.pagination_mode.unwrap_or_default()
    }

    /// Posts per page, normalized into [1, 50].
    ///
    /// Missing and non-positive values fall back to [`DEFAULT_PAGE_SIZE`];
    /// values above [`MAX_PAGE_SIZE`] clamp down to it.
    pub fn effective_page_size(&self) -> u32 {
        match self.page_size {
            Some(n) if n >= 1 => (n as u64).min(u64::from(MAX_PAGE_SIZE)) as u32,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    /// Whether the configured pagination mode windows its queries.
    pub fn is_paginated(&self) -> bool {
        self.effective_pagination_mode() != PaginationMode::None
    }
}

/// Deserialize a value, normalizing anything out of domain to `None`
/// instead of failing.
///
/// The value is buffered through `serde_json::Value` so a failed match
/// still consumes exactly one value and the surrounding struct parse
/// continues.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
