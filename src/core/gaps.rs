//! Gap to pole: how far each personal best is from the fastest lap.

use crate::errors::{AppError, AppResult};
use crate::models::LapRecord;
use crate::utils::time::format_lap_time;
use chrono::TimeDelta;

/// Return a copy of `ranked` with `gap_to_pole` filled in, sorted by gap.
///
/// Records without a lap time are dropped. The sort is stable, so drivers
/// on the same gap keep their ranking order.
pub fn compute_gaps(ranked: &[LapRecord], pole_time: TimeDelta) -> AppResult<Vec<LapRecord>> {
    let mut out = Vec::with_capacity(ranked.len());

    for record in ranked {
        let Some(lap_time) = record.lap_time else {
            continue;
        };

        let gap = lap_time - pole_time;
        if gap < TimeDelta::zero() {
            return Err(AppError::Gap(format!(
                "{} lapped in {}, faster than pole time {}",
                record.driver,
                format_lap_time(lap_time),
                format_lap_time(pole_time)
            )));
        }

        let mut with_gap = record.clone();
        with_gap.gap_to_pole = Some(gap);
        out.push(with_gap);
    }

    out.sort_by_key(|r| r.gap_to_pole);
    Ok(out)
}

/// Gap from one record to the next one up the order ("interval").
pub fn intervals(gaps: &[LapRecord]) -> Vec<Option<TimeDelta>> {
    let mut out = Vec::with_capacity(gaps.len());
    let mut previous: Option<TimeDelta> = None;
    for record in gaps {
        let interval = match (previous, record.gap_to_pole) {
            (Some(prev), Some(gap)) => Some(gap - prev),
            _ => None,
        };
        out.push(interval);
        previous = record.gap_to_pole;
    }
    out
}
