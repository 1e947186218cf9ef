//! Telemetry comparison between two drivers' fastest laps.

use crate::errors::{AppError, AppResult};
use crate::models::{LapRecord, SessionInfo, TelemetryChannel, TelemetryTrace};
use crate::source::SessionSource;

/// Two fastest-lap traces, each ordered by distance. The traces keep their
/// own sample points; nothing is resampled.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedComparison {
    pub first: TelemetryTrace,
    pub second: TelemetryTrace,
}

impl SpeedComparison {
    pub fn drivers(&self) -> (&str, &str) {
        (&self.first.driver, &self.second.driver)
    }

    /// Both traces must carry `channel` for it to be charted.
    pub fn require_channel(&self, channel: TelemetryChannel) -> AppResult<()> {
        for trace in [&self.first, &self.second] {
            if !trace.samples.iter().any(|s| channel.value(s).is_some()) {
                return Err(AppError::ChannelMissing {
                    channel: channel.as_str().to_string(),
                    driver: trace.driver.clone(),
                    lap: trace.lap_number,
                });
            }
        }
        Ok(())
    }
}

/// Pick the two drivers to compare: the ones the user named, or the two
/// at the top of the gap table.
pub fn select_pair<'a>(
    gaps: &'a [LapRecord],
    requested: Option<(&str, &str)>,
) -> AppResult<(&'a LapRecord, &'a LapRecord)> {
    if gaps.len() < 2 {
        return Err(AppError::NotEnoughDrivers(gaps.len()));
    }

    match requested {
        Some((a, b)) => {
            if a.eq_ignore_ascii_case(b) {
                return Err(AppError::UnknownDriver(format!(
                    "{a} named twice, pick two different drivers"
                )));
            }
            let find = |name: &str| {
                gaps.iter()
                    .find(|r| r.driver.eq_ignore_ascii_case(name))
                    .ok_or_else(|| AppError::UnknownDriver(name.to_string()))
            };
            Ok((find(a)?, find(b)?))
        }
        None => match gaps {
            [first, second, ..] => Ok((first, second)),
            _ => Err(AppError::NotEnoughDrivers(gaps.len())),
        },
    }
}

/// Telemetry of the lap behind `record`, ordered by distance. An empty
/// trace is `TelemetryMissing`.
pub fn fetch_trace<S: SessionSource + ?Sized>(
    source: &mut S,
    session: &SessionInfo,
    record: &LapRecord,
) -> AppResult<TelemetryTrace> {
    let lap = record.lap_number.unwrap_or(0);
    let mut trace = source.load_telemetry(session, record)?;

    if trace.is_empty() {
        return Err(AppError::TelemetryMissing {
            driver: record.driver.clone(),
            lap,
        });
    }

    trace.sort_by_distance();
    Ok(trace)
}

pub fn compare_speed<S: SessionSource + ?Sized>(
    source: &mut S,
    session: &SessionInfo,
    gaps: &[LapRecord],
    requested: Option<(&str, &str)>,
) -> AppResult<SpeedComparison> {
    let (a, b) = select_pair(gaps, requested)?;
    let first = fetch_trace(source, session, a)?;
    let second = fetch_trace(source, session, b)?;
    Ok(SpeedComparison { first, second })
}
