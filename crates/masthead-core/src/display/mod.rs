//! Display wrapper types for formatting listing state.
//!
//! The rendering collaborator consumes a [`crate::controller::ListingSnapshot`];
//! the wrappers here turn one into markdown text without putting any
//! presentation logic inside the controller. Wrappers borrow their data and
//! implement [`std::fmt::Display`], so the same snapshot can be formatted
//! in different contexts.

pub mod datetime;
pub mod listing;

pub use datetime::LocalDate;
pub use listing::ListingView;
