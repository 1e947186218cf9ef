//! Distance integration for feeds that only publish speed over time.

use crate::models::TelemetrySample;
use chrono::{DateTime, Utc};

/// A raw speed measurement with its timestamp.
#[derive(Debug, Clone)]
pub struct TimedSpeed {
    pub date: DateTime<Utc>,
    /// km/h
    pub speed: f64,
    pub throttle: Option<f64>,
    pub brake: Option<f64>,
    pub gear: Option<u8>,
    pub rpm: Option<u32>,
}

/// Integrate speed over time into distance along the lap.
///
/// The first sample sits at 0 m; each following sample adds
/// `speed / 3.6 * dt`. Negative speeds and out-of-order timestamps add
/// nothing, so distance never decreases.
pub fn integrate_distance(points: &[TimedSpeed]) -> Vec<TelemetrySample> {
    let mut samples = Vec::with_capacity(points.len());
    let mut distance = 0.0_f64;
    let mut previous: Option<DateTime<Utc>> = None;

    for p in points {
        if let Some(prev) = previous {
            let dt = (p.date - prev).num_microseconds().unwrap_or(0) as f64 / 1_000_000.0;
            if dt > 0.0 {
                distance += p.speed.max(0.0) / 3.6 * dt;
            }
        }
        previous = Some(match previous {
            Some(prev) if prev > p.date => prev,
            _ => p.date,
        });

        samples.push(TelemetrySample {
            distance,
            speed: p.speed.max(0.0),
            throttle: p.throttle,
            brake: p.brake,
            gear: p.gear,
            rpm: p.rpm,
        });
    }

    samples
}
