use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A car data channel that can be charted against distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TelemetryChannel {
    #[default]
    Speed,
    Throttle,
    Brake,
    Gear,
    Rpm,
}

impl TelemetryChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TelemetryChannel::Speed => "speed",
            TelemetryChannel::Throttle => "throttle",
            TelemetryChannel::Brake => "brake",
            TelemetryChannel::Gear => "gear",
            TelemetryChannel::Rpm => "rpm",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TelemetryChannel::Speed => "Speed",
            TelemetryChannel::Throttle => "Throttle",
            TelemetryChannel::Brake => "Brake",
            TelemetryChannel::Gear => "Gear",
            TelemetryChannel::Rpm => "RPM",
        }
    }

    /// Y axis label, with the unit.
    pub fn axis_label(&self) -> &'static str {
        match self {
            TelemetryChannel::Speed => "Speed (km/h)",
            TelemetryChannel::Throttle => "Throttle (%)",
            TelemetryChannel::Brake => "Brake (%)",
            TelemetryChannel::Gear => "Gear",
            TelemetryChannel::Rpm => "Engine speed (rpm)",
        }
    }

    pub fn value(&self, sample: &TelemetrySample) -> Option<f64> {
        match self {
            TelemetryChannel::Speed => Some(sample.speed),
            TelemetryChannel::Throttle => sample.throttle,
            TelemetryChannel::Brake => sample.brake,
            TelemetryChannel::Gear => sample.gear.map(f64::from),
            TelemetryChannel::Rpm => sample.rpm.map(f64::from),
        }
    }
}

impl fmt::Display for TelemetryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One instantaneous telemetry measurement along a lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Metres from the start of the lap.
    pub distance: f64,
    /// km/h
    pub speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brake: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gear: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,
}

/// The telemetry recorded during one lap of one driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryTrace {
    pub driver: String,
    pub lap_number: u32,
    #[serde(default)]
    pub samples: Vec<TelemetrySample>,
}

impl TelemetryTrace {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_ordered_by_distance(&self) -> bool {
        self.samples
            .windows(2)
            .all(|w| w[0].distance <= w[1].distance)
    }

    /// Ensure samples are ordered by distance. Stable, so samples recorded
    /// at the same distance keep their recording order.
    pub fn sort_by_distance(&mut self) {
        if !self.is_ordered_by_distance() {
            self.samples
                .sort_by(|a, b| a.distance.total_cmp(&b.distance));
        }
    }

    /// Distance and value of every sample that recorded `channel`.
    pub fn channel(&self, channel: TelemetryChannel) -> (Vec<f64>, Vec<f64>) {
        self.samples
            .iter()
            .filter_map(|s| channel.value(s).map(|v| (s.distance, v)))
            .unzip()
    }

    pub fn top_speed(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.speed).reduce(f64::max)
    }

    /// Mean of the speed samples. Feeds sample at a fixed rate, so this is
    /// the time-averaged speed over the lap.
    pub fn average_speed(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let total: f64 = self.samples.iter().map(|s| s.speed).sum();
        Some(total / self.samples.len() as f64)
    }
}
