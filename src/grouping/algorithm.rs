use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Duration, Utc};

use crate::models::Call;

/// Groups calls into fixed-size time intervals.
///
/// Maps each bucket start to the calls active during
/// `[bucket_start, bucket_start + interval_size)`, preserving scan order
/// within a bucket. A call spanning several intervals appears once in each.
/// Buckets are anchored to the data: the first bucket of a run starts at the
/// first call's start time, not on a wall-clock grid.
///
/// `calls` must be sorted ascending by start time and `interval_size` must be
/// positive; both are the caller's responsibility. The scan keeps a sliding
/// window of open bucket starts, so each call only visits the buckets it
/// actually overlaps instead of recomputing from a global origin.
pub fn group_by_intervals(
    calls: &[Call],
    interval_size: Duration,
) -> BTreeMap<DateTime<Utc>, Vec<Call>> {
    debug_assert!(interval_size > Duration::zero());
    debug_assert!(
        calls.windows(2).all(|w| w[0].start_time <= w[1].start_time),
        "calls must be sorted ascending by start time"
    );

    let mut groups: BTreeMap<DateTime<Utc>, Vec<Call>> = BTreeMap::new();
    let mut active: VecDeque<DateTime<Utc>> = VecDeque::new();

    for call in calls {
        // Drop buckets that closed before this call began. Strict comparison:
        // a call starting exactly when a bucket closes keeps that bucket as
        // its anchor.
        while let Some(&front) = active.front() {
            if front + interval_size < call.start_time {
                active.pop_front();
            } else {
                break;
            }
        }

        let anchor = active.front().copied().unwrap_or(call.start_time);
        let starts = intersecting_intervals(call, anchor, interval_size);

        for &start in &starts {
            groups.entry(start).or_default().push(call.clone());
        }

        merge_window(&mut active, starts);
    }

    groups
}

/// Bucket starts the call overlaps, stepping from `anchor` by
/// `interval_size`. A zero-duration call still occupies one bucket.
fn intersecting_intervals(
    call: &Call,
    anchor: DateTime<Utc>,
    interval_size: Duration,
) -> Vec<DateTime<Utc>> {
    let span_ms = (call.end() - anchor).num_milliseconds();
    let interval_ms = interval_size.num_milliseconds();
    let steps = if span_ms <= 0 {
        1
    } else {
        (span_ms + interval_ms - 1) / interval_ms
    };

    (0..steps).map(|i| anchor + interval_size * i as i32).collect()
}

/// Folds a call's bucket starts into the active window. The window stays a
/// contiguous run of open bucket starts ending at the furthest one seen.
fn merge_window(active: &mut VecDeque<DateTime<Utc>>, starts: Vec<DateTime<Utc>>) {
    let Some(&last_new) = starts.last() else {
        return;
    };

    match active.back() {
        None => *active = starts.into(),
        Some(&last_active) if last_active >= last_new => {}
        Some(&last_active) => {
            *active = starts
                .into_iter()
                .skip_while(|&start| start < last_active)
                .collect();
        }
    }
}
