//! Date display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// A wrapper around [`Timestamp`] that formats the date portion in the
/// system timezone via the `Display` trait.
///
/// Publish dates are calendar-level information; the time of day is noise
/// in a listing, so the format is `YYYY-MM-DD`.
pub struct LocalDate<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.to_zoned(TimeZone::system()).strftime("%Y-%m-%d")
        )
    }
}
