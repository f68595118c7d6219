//! Post document shapes produced by the document store.

use std::fmt;

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Opaque document identifier.
///
/// Identifiers are assigned by the document store and carry no meaning
/// inside the engine; they are only ever compared for equality or handed
/// back to the store through its parameter-binding path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to an image asset with optional alt text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRef {
    /// Asset URL as provided by the store
    pub url: String,

    /// Alternative text for accessibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Post author as embedded in a post summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostAuthor {
    /// Author identifier
    pub id: PostId,

    /// Display name of the author
    pub name: String,

    /// Optional author portrait
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// Category attached to a post, identity plus display title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRef {
    /// Category identifier
    pub id: PostId,

    /// Category display title
    pub title: String,
}

/// Summary of a single post document as returned by the store.
///
/// This is the read-only shape the listing engine consumes; the store owns
/// the full documents. Serializes in camelCase like the configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    /// Document identifier
    pub id: PostId,

    /// Post title
    pub title: String,

    /// URL slug
    pub slug: String,

    /// Optional featured image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<ImageRef>,

    /// Optional short excerpt of the post body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Timestamp the post was published, absent when the document was
    /// never explicitly published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,

    /// Timestamp the document was created (UTC); orders posts that lack an
    /// explicit publish timestamp
    pub created_at: Timestamp,

    /// Optional author details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<PostAuthor>,

    /// Categories the post belongs to, in store order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryRef>,
}

impl PostSummary {
    /// The timestamp this post sorts by: the publish timestamp when present,
    /// otherwise the creation timestamp.
    pub fn effective_published_at(&self) -> Timestamp {
        self.published_at.unwrap_or(self.created_at)
    }
}
