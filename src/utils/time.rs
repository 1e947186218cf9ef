//! Lap time utilities: parsing "m:ss.fff", converting seconds, formatting
//! lap times and gaps.

use crate::errors::{AppError, AppResult};
use chrono::TimeDelta;
use regex::Regex;
use std::sync::LazyLock;

static LAP_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d+)(?:\.(\d{1,3}))?$").expect("valid lap time pattern")
});

/// Longest duration accepted as a lap time, in seconds.
pub const MAX_LAP_SECONDS: i64 = 3600;

/// Convert a number of seconds (as published by timing feeds) into a
/// millisecond-precision duration. Negative, non-finite or values above
/// [`MAX_LAP_SECONDS`] are not lap times.
pub fn seconds_to_delta(secs: f64) -> Option<TimeDelta> {
    if !secs.is_finite() || secs < 0.0 || secs > MAX_LAP_SECONDS as f64 {
        return None;
    }
    TimeDelta::try_milliseconds((secs * 1000.0).round() as i64)
}

pub fn delta_to_seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

/// Parse "1:27.893", "87.893" or "87" into a duration. Anything longer than
/// an hour is rejected.
pub fn parse_lap_time(input: &str) -> AppResult<TimeDelta> {
    let s = input.trim();
    let caps = LAP_TIME_RE
        .captures(s)
        .ok_or_else(|| AppError::InvalidLapTime(input.to_string()))?;

    let minutes: i64 = match caps.get(1) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| AppError::InvalidLapTime(input.to_string()))?,
        None => 0,
    };
    let seconds: i64 = caps[2]
        .parse()
        .map_err(|_| AppError::InvalidLapTime(input.to_string()))?;

    if caps.get(1).is_some() && seconds >= 60 {
        return Err(AppError::InvalidLapTime(input.to_string()));
    }

    // ".8" means 800 ms, ".85" means 850 ms
    let millis: i64 = match caps.get(3) {
        Some(frac) => {
            let digits = format!("{:0<3}", frac.as_str());
            digits
                .parse()
                .map_err(|_| AppError::InvalidLapTime(input.to_string()))?
        }
        None => 0,
    };

    minutes
        .checked_mul(60_000)
        .and_then(|m| seconds.checked_mul(1000)?.checked_add(m))
        .and_then(|ms| ms.checked_add(millis))
        .filter(|ms| *ms <= MAX_LAP_SECONDS * 1000)
        .and_then(TimeDelta::try_milliseconds)
        .ok_or_else(|| AppError::InvalidLapTime(input.to_string()))
}

/// Format a lap time as "m:ss.fff".
pub fn format_lap_time(delta: TimeDelta) -> String {
    let ms = delta.num_milliseconds();
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.abs();
    format!(
        "{}{}:{:02}.{:03}",
        sign,
        ms / 60_000,
        (ms / 1000) % 60,
        ms % 1000
    )
}

/// Format a gap to pole as "+s.fff" (or "+m:ss.fff" past one minute).
pub fn format_gap(delta: TimeDelta) -> String {
    let ms = delta.num_milliseconds();
    let sign = if ms < 0 { "-" } else { "+" };
    let ms = ms.abs();
    if ms >= 60_000 {
        format!("{}{}", sign, format_lap_time(TimeDelta::milliseconds(ms)))
    } else {
        format!("{}{}.{:03}", sign, ms / 1000, ms % 1000)
    }
}

/// Serde adapter for optional lap times: written as seconds, read from
/// either seconds or "m:ss.fff" text.
pub mod lap_time_serde {
    use super::{delta_to_seconds, parse_lap_time, seconds_to_delta};
    use chrono::TimeDelta;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawLapTime {
        Seconds(f64),
        Text(String),
    }

    pub fn serialize<S>(value: &Option<TimeDelta>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_some(&delta_to_seconds(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<TimeDelta>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawLapTime>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawLapTime::Seconds(secs)) => seconds_to_delta(secs)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("Invalid lap time: {secs}"))),
            Some(RawLapTime::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(RawLapTime::Text(text)) => {
                parse_lap_time(&text).map(Some).map_err(D::Error::custom)
            }
        }
    }
}
