use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire timestamp, RFC 3339 in UTC.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// The calendar-day key (`YYYY-MM-DD`) used to bucket messages by day.
    #[must_use]
    pub fn day_key(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}
