use crate::utils::time::lap_time_serde;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A single timed lap as published by the timing feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    /// Driver abbreviation, e.g. "VER".
    pub driver: String,
    pub lap_number: u32,
    #[serde(default, with = "lap_time_serde")]
    pub lap_time: Option<TimeDelta>,
    /// When the lap started.
    #[serde(default)]
    pub set_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pit_out: bool,
    /// Qualifying segment the lap was driven in (1 for Q1), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<u8>,
}

impl Lap {
    /// Out-laps and laps without a recorded time cannot be ranked.
    pub fn is_timed(&self) -> bool {
        self.lap_time.is_some() && !self.pit_out
    }
}

/// A driver's personal best lap, with the gap to pole once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    pub driver: String,
    #[serde(default)]
    pub driver_number: Option<u32>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub team: String,
    #[serde(default)]
    pub team_colour: Option<String>,
    #[serde(default)]
    pub lap_number: Option<u32>,
    #[serde(default, with = "lap_time_serde")]
    pub lap_time: Option<TimeDelta>,
    #[serde(default)]
    pub set_at: Option<DateTime<Utc>>,
    #[serde(default, with = "lap_time_serde")]
    pub gap_to_pole: Option<TimeDelta>,
}

impl LapRecord {
    pub fn new(driver: &str, team: &str, lap_time: Option<TimeDelta>) -> Self {
        Self {
            driver: driver.to_string(),
            driver_number: None,
            full_name: None,
            team: team.to_string(),
            team_colour: None,
            lap_number: None,
            lap_time,
            set_at: None,
            gap_to_pole: None,
        }
    }

    pub fn has_time(&self) -> bool {
        self.lap_time.is_some()
    }

    /// "Charles Leclerc (LEC)", or just the abbreviation.
    pub fn display_name(&self) -> String {
        match &self.full_name {
            Some(name) => format!("{} ({})", name, self.driver),
            None => self.driver.clone(),
        }
    }
}
