//! Qualifying segment tagging for feeds that do not say which part of
//! the session a lap belongs to.

use crate::models::Lap;
use chrono::{DateTime, TimeDelta, Utc};

/// Shortest pause between two lap starts, in seconds, that counts as a
/// segment break. Breaks between Q1, Q2 and Q3 last seven or eight minutes.
pub const MIN_SEGMENT_BREAK_SECS: i64 = 240;

pub const QUALIFYING_SEGMENTS: u8 = 3;

/// Start times of the segments after the first one: the `segments - 1`
/// longest pauses between consecutive lap starts, ignoring pauses shorter
/// than [`MIN_SEGMENT_BREAK_SECS`].
pub fn segment_boundaries(laps: &[Lap], segments: u8) -> Vec<DateTime<Utc>> {
    let mut starts: Vec<DateTime<Utc>> = laps.iter().filter_map(|l| l.set_at).collect();
    starts.sort();
    starts.dedup();

    let min_break = TimeDelta::seconds(MIN_SEGMENT_BREAK_SECS);
    let mut pauses: Vec<(TimeDelta, DateTime<Utc>)> = starts
        .windows(2)
        .map(|w| (w[1] - w[0], w[1]))
        .filter(|(pause, _)| *pause >= min_break)
        .collect();

    pauses.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    pauses.truncate(usize::from(segments.saturating_sub(1)));

    let mut boundaries: Vec<DateTime<Utc>> = pauses.into_iter().map(|(_, at)| at).collect();
    boundaries.sort();
    boundaries
}

/// Fill in the segment of every untagged lap with a start time. Laps that
/// already carry a segment keep it.
pub fn tag_segments(laps: &mut [Lap], segments: u8) {
    if laps.iter().all(|l| l.segment.is_some() || l.set_at.is_none()) {
        return;
    }

    let boundaries = segment_boundaries(laps, segments);
    for lap in laps.iter_mut().filter(|l| l.segment.is_none()) {
        if let Some(at) = lap.set_at {
            let passed = boundaries.iter().filter(|b| **b <= at).count();
            lap.segment = u8::try_from(passed + 1).ok();
        }
    }
}
