//! DateTime display utilities.
//!
//! Fire instants are stored as UTC timestamps; this wrapper renders them in
//! the zone the stack is scheduled in.

use std::fmt;

use jiff::{Timestamp, tz::TimeZone};

/// A `Timestamp` rendered as `YYYY-MM-DD HH:MM:SS TZ` in a given time zone.
///
/// # Examples
///
/// ```rust
/// use chime_core::display::LocalDateTime;
/// use jiff::{Timestamp, tz::TimeZone};
///
/// let at: Timestamp = "2024-05-01T06:30:00Z".parse().unwrap();
/// let rendered = LocalDateTime::new(&at, &TimeZone::UTC).to_string();
/// assert_eq!(rendered, "2024-05-01 06:30:00 UTC");
/// ```
pub struct LocalDateTime<'a> {
    timestamp: &'a Timestamp,
    time_zone: &'a TimeZone,
}

impl<'a> LocalDateTime<'a> {
    pub fn new(timestamp: &'a Timestamp, time_zone: &'a TimeZone) -> Self {
        Self {
            timestamp,
            time_zone,
        }
    }
}

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.timestamp
                .to_zoned(self.time_zone.clone())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}
