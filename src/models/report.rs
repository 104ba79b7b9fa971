use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::Call;

/// Identifier selecting a report output format.
pub type ReportFlavor = String;

/// An interval-bucketed view of the calls in a query range.
///
/// `intervals` maps each bucket start to the calls active during
/// `[bucket_start, bucket_start + interval_size)`, in chronological scan
/// order. A call spanning several buckets appears in each of them. The value
/// is built once per report request and never mutated.
#[derive(Debug, Clone)]
pub struct Report {
    interval_size: Duration,
    intervals: BTreeMap<DateTime<Utc>, Vec<Call>>,
}

impl Report {
    pub fn new(interval_size: Duration, intervals: BTreeMap<DateTime<Utc>, Vec<Call>>) -> Self {
        Self {
            interval_size,
            intervals,
        }
    }

    pub fn interval_size(&self) -> Duration {
        self.interval_size
    }

    pub fn intervals(&self) -> &BTreeMap<DateTime<Utc>, Vec<Call>> {
        &self.intervals
    }

    pub fn bucket_count(&self) -> usize {
        self.intervals.len()
    }

    /// All bucketed calls, deduplicated by call equality (start time) and
    /// sorted ascending by start time. Among calls starting at the same
    /// instant the first one scanned survives.
    pub fn distinct_calls(&self) -> Vec<Call> {
        let mut calls: Vec<Call> = self.intervals.values().flatten().cloned().collect();
        calls.sort_by_key(|call| call.start_time);
        calls.dedup_by_key(|call| call.start_time);
        calls
    }

    /// Total time spent on calls, summed over the distinct-call set. A call
    /// spanning several buckets contributes its duration once.
    pub fn total_active_duration(&self) -> Duration {
        self.distinct_calls()
            .iter()
            .fold(Duration::zero(), |total, call| total + call.duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, h, m, 0).unwrap()
    }

    fn call(id: i64, start: DateTime<Utc>, minutes: u64) -> Call {
        Call::new(Some(id), "555-0100", start, minutes * 60 * 1000, vec![])
    }

    #[test]
    fn empty_report_has_no_calls_and_zero_duration() {
        let report = Report::new(Duration::minutes(30), BTreeMap::new());
        assert_eq!(report.bucket_count(), 0);
        assert!(report.distinct_calls().is_empty());
        assert_eq!(report.total_active_duration(), Duration::zero());
    }

    #[test]
    fn call_spanning_buckets_counts_once() {
        let long = call(1, at(10, 0), 45);
        let mut intervals = BTreeMap::new();
        intervals.insert(at(10, 0), vec![long.clone()]);
        intervals.insert(at(10, 30), vec![long.clone()]);

        let report = Report::new(Duration::minutes(30), intervals);
        assert_eq!(report.bucket_count(), 2);
        assert_eq!(report.distinct_calls(), vec![long]);
        assert_eq!(report.total_active_duration(), Duration::minutes(45));
    }

    #[test]
    fn calls_with_equal_start_collapse_to_first_scanned() {
        let first = call(1, at(9, 0), 10);
        let second = call(2, at(9, 0), 50);
        let mut intervals = BTreeMap::new();
        intervals.insert(at(9, 0), vec![first.clone(), second]);

        let report = Report::new(Duration::minutes(30), intervals);
        let distinct = report.distinct_calls();
        assert_eq!(distinct.len(), 1);
        assert_eq!(distinct[0].id, first.id);
        assert_eq!(report.total_active_duration(), Duration::minutes(10));
    }

    #[test]
    fn distinct_calls_are_sorted_by_start_time() {
        let early = call(1, at(9, 0), 5);
        let late = call(2, at(11, 0), 5);
        let mut intervals = BTreeMap::new();
        intervals.insert(at(9, 0), vec![early.clone()]);
        intervals.insert(at(11, 0), vec![late.clone()]);

        let report = Report::new(Duration::minutes(30), intervals);
        assert_eq!(report.distinct_calls(), vec![early, late]);
    }
}
