use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single logged phone call.
///
/// `id` is `None` until the call has been persisted; the store assigns it on
/// insert. `cases` is an ordered list of opaque case references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: Option<i64>,
    pub phone_number: String,
    pub start_time: DateTime<Utc>,
    pub duration_ms: u64,
    pub cases: Vec<String>,
}

impl Call {
    pub fn new(
        id: Option<i64>,
        phone_number: impl Into<String>,
        start_time: DateTime<Utc>,
        duration_ms: u64,
        cases: Vec<String>,
    ) -> Self {
        Self {
            id,
            phone_number: phone_number.into(),
            start_time,
            duration_ms,
            cases,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::milliseconds(self.duration_ms as i64)
    }

    /// Instant the call ended: `start_time + duration`.
    pub fn end(&self) -> DateTime<Utc> {
        self.start_time + self.duration()
    }
}

// Calls compare by start_time alone. Two calls starting at the same instant
// are equal, and collapse to one entry in `Report::distinct_calls`.
impl PartialEq for Call {
    fn eq(&self, other: &Self) -> bool {
        self.start_time == other.start_time
    }
}

impl Eq for Call {}

impl PartialOrd for Call {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Call {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start_time.cmp(&other.start_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, h, m, 0).unwrap()
    }

    #[test]
    fn end_is_start_plus_duration() {
        let call = Call::new(None, "555-0100", at(10, 0), 45 * 60 * 1000, vec![]);
        assert_eq!(call.end(), at(10, 45));
    }

    #[test]
    fn equality_considers_start_time_only() {
        let a = Call::new(Some(1), "555-0100", at(9, 0), 1000, vec!["A-1".into()]);
        let b = Call::new(Some(2), "555-0199", at(9, 0), 9999, vec![]);
        let c = Call::new(Some(3), "555-0100", at(9, 1), 1000, vec!["A-1".into()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
    }
}
