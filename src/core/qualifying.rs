//! Qualifying classification by segment (Q1, Q2, Q3).

use crate::errors::{AppError, AppResult};
use crate::models::{Session, SessionKind};
use chrono::TimeDelta;
use std::cmp::Ordering;

/// One driver's best lap in each segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentResult {
    pub position: usize,
    pub driver: String,
    pub team: String,
    /// Best time per segment, Q1 first.
    pub times: Vec<Option<TimeDelta>>,
    /// Gap to the fastest time of the last segment the driver set a time
    /// in. Zero for pole.
    pub gap: Option<TimeDelta>,
}

impl SegmentResult {
    /// 1-based number of the last segment with a time.
    pub fn last_segment(&self) -> Option<usize> {
        self.times.iter().rposition(Option::is_some).map(|i| i + 1)
    }

    fn last_time(&self) -> Option<TimeDelta> {
        self.times.iter().rev().find_map(|t| *t)
    }
}

/// "Q1" or, in sprint qualifying, "SQ1".
pub fn segment_label(kind: SessionKind, segment: usize) -> String {
    match kind {
        SessionKind::SprintQualifying => format!("SQ{segment}"),
        _ => format!("Q{segment}"),
    }
}

/// Classify drivers the way a qualifying session does: those who reached
/// a later segment ahead of those knocked out earlier, each group ordered
/// by its time in that segment. Drivers without any time come last.
pub fn segment_results(session: &Session) -> AppResult<Vec<SegmentResult>> {
    let segments = session
        .laps
        .iter()
        .filter_map(|l| l.segment)
        .max()
        .map(usize::from)
        .ok_or_else(|| {
            AppError::DataUnavailable(format!(
                "{} has no qualifying segments",
                session.info.title()
            ))
        })?;

    let mut results: Vec<SegmentResult> = session
        .fastest_laps()
        .into_iter()
        .map(|record| {
            let times = (1..=segments)
                .map(|seg| {
                    session
                        .laps_for(&record.driver)
                        .filter(|l| l.is_timed() && l.segment.map(usize::from) == Some(seg))
                        .filter_map(|l| l.lap_time)
                        .min()
                })
                .collect();
            SegmentResult {
                position: 0,
                driver: record.driver,
                team: record.team,
                times,
                gap: None,
            }
        })
        .collect();

    results.sort_by(|a, b| match (a.last_segment(), b.last_segment()) {
        (Some(sa), Some(sb)) => sb
            .cmp(&sa)
            .then_with(|| a.last_time().cmp(&b.last_time()))
            .then_with(|| a.driver.cmp(&b.driver)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.driver.cmp(&b.driver),
    });

    let fastest: Vec<Option<TimeDelta>> = (0..segments)
        .map(|i| results.iter().filter_map(|r| r.times[i]).min())
        .collect();

    for (i, result) in results.iter_mut().enumerate() {
        result.position = i + 1;
        result.gap = result.last_segment().and_then(|seg| {
            let best = fastest[seg - 1]?;
            Some(result.times[seg - 1]? - best)
        });
    }

    Ok(results)
}
