//! Markdown formatting for listing snapshots.

use std::fmt;

use super::datetime::LocalDate;
use crate::{
    controller::ListingSnapshot,
    models::{Layout, PaginationMode, PostSummary},
};

/// Newtype wrapper rendering a [`ListingSnapshot`] as markdown.
///
/// Honors the snapshot's layout and visibility toggles. An initial load in
/// flight renders as "Loading...", and a settled empty listing as
/// "No posts found."; a retrieval failure with nothing fetched yet reads
/// the same as an empty collection.
pub struct ListingView<'a>(pub &'a ListingSnapshot);

impl fmt::Display for ListingView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;

        if snapshot.is_initial_loading {
            return writeln!(f, "Loading...");
        }
        if snapshot.items.is_empty() {
            return writeln!(f, "No posts found.");
        }

        for post in &snapshot.items {
            match snapshot.layout {
                Layout::Grid => write_card(f, snapshot, post)?,
                Layout::List => write_row(f, snapshot, post)?,
            }
        }

        write_footer(f, snapshot)
    }
}

/// Multi-line card, one blank line between cards.
fn write_card(f: &mut fmt::Formatter<'_>, snapshot: &ListingSnapshot, post: &PostSummary) -> fmt::Result {
    writeln!(f, "### {}", post.title)?;

    if snapshot.show_featured_image {
        if let Some(image) = &post.featured_image {
            writeln!(f, "![{}]({})", image.alt.as_deref().unwrap_or(&post.title), image.url)?;
        }
    }

    let meta = meta_line(snapshot, post);
    if !meta.is_empty() {
        writeln!(f, "{meta}")?;
    }

    if snapshot.show_category && !post.categories.is_empty() {
        writeln!(f, "*{}*", category_line(post))?;
    }

    if snapshot.show_content {
        if let Some(excerpt) = &post.excerpt {
            writeln!(f, "{excerpt}")?;
        }
    }

    writeln!(f)
}

/// Single compact row for list layout.
fn write_row(f: &mut fmt::Formatter<'_>, snapshot: &ListingSnapshot, post: &PostSummary) -> fmt::Result {
    write!(f, "- **{}**", post.title)?;

    let meta = meta_line(snapshot, post);
    if !meta.is_empty() {
        write!(f, " · {meta}")?;
    }
    if snapshot.show_category && !post.categories.is_empty() {
        write!(f, " [{}]", category_line(post))?;
    }
    writeln!(f)
}

fn meta_line(snapshot: &ListingSnapshot, post: &PostSummary) -> String {
    let mut parts = Vec::new();
    if snapshot.display_author_name {
        if let Some(author) = &post.author {
            parts.push(format!("By {}", author.name));
        }
    }
    if snapshot.display_date {
        if let Some(published) = post.published_at {
            parts.push(LocalDate(&published).to_string());
        }
    }
    parts.join(" · ")
}

fn category_line(post: &PostSummary) -> String {
    post.categories
        .iter()
        .map(|c| c.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_footer(f: &mut fmt::Formatter<'_>, snapshot: &ListingSnapshot) -> fmt::Result {
    match snapshot.pagination_mode {
        PaginationMode::Pagination if snapshot.total_pages > 1 => {
            writeln!(f, "Page {} of {}", snapshot.current_page, snapshot.total_pages)
        }
        PaginationMode::LoadMore if snapshot.has_more => {
            writeln!(
                f,
                "Showing {} of {} posts. More available.",
                snapshot.items.len(),
                snapshot.total_matching
            )
        }
        _ => Ok(()),
    }
}
