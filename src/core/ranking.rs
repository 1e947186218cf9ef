//! Ranking of personal best laps and identification of pole position.

use crate::errors::{AppError, AppResult};
use crate::models::LapRecord;
use chrono::TimeDelta;
use std::cmp::Ordering;

/// Personal best laps sorted fastest first.
///
/// The ranked list is never empty and every record in it has a lap time;
/// records without one are moved to `excluded`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    ranked: Vec<LapRecord>,
    pub excluded: Vec<LapRecord>,
    pole_time: TimeDelta,
}

impl Ranking {
    pub fn ranked(&self) -> &[LapRecord] {
        &self.ranked
    }

    pub fn pole(&self) -> &LapRecord {
        &self.ranked[0]
    }

    pub fn pole_time(&self) -> TimeDelta {
        self.pole_time
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// 1-based grid position of a driver, if ranked.
    pub fn position_of(&self, driver: &str) -> Option<usize> {
        self.ranked
            .iter()
            .position(|r| r.driver.eq_ignore_ascii_case(driver))
            .map(|i| i + 1)
    }
}

/// Order two timed records: lap time, then who set it first, then driver.
fn compare_records(a: &LapRecord, b: &LapRecord) -> Ordering {
    a.lap_time
        .cmp(&b.lap_time)
        .then_with(|| match (a.set_at, b.set_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.driver.cmp(&b.driver))
}

/// Rank personal best laps ascending by lap time.
///
/// Fails with `EmptySession` when there is nothing to rank and with
/// `NoValidLap` when no driver set a time.
pub fn rank(records: &[LapRecord]) -> AppResult<Ranking> {
    if records.is_empty() {
        return Err(AppError::EmptySession);
    }

    let (mut ranked, excluded): (Vec<LapRecord>, Vec<LapRecord>) =
        records.iter().cloned().partition(LapRecord::has_time);

    if ranked.is_empty() {
        let drivers: Vec<&str> = excluded.iter().map(|r| r.driver.as_str()).collect();
        return Err(AppError::NoValidLap(format!(
            "none of {} driver(s) set a lap time ({})",
            drivers.len(),
            drivers.join(", ")
        )));
    }

    ranked.sort_by(compare_records);

    let pole_time = ranked[0]
        .lap_time
        .ok_or_else(|| AppError::NoValidLap(ranked[0].driver.clone()))?;

    Ok(Ranking {
        ranked,
        excluded,
        pole_time,
    })
}
