use crate::models::driver::DriverInfo;
use crate::models::lap::{Lap, LapRecord};
use crate::models::session_kind::SessionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the user asked for: one session of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub year: i32,
    pub event: String,
    pub kind: SessionKind,
}

impl SessionRequest {
    pub fn new(year: i32, event: &str, kind: SessionKind) -> Self {
        Self {
            year,
            event: event.trim().to_string(),
            kind,
        }
    }

    /// Stable identifier used as cache key.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.year,
            self.event.to_lowercase(),
            self.kind.code()
        )
    }
}

/// Descriptive data about a loaded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub year: i32,
    pub event: String,
    pub kind: SessionKind,
    #[serde(default)]
    pub session_key: Option<u32>,
    #[serde(default)]
    pub meeting_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_start: Option<DateTime<Utc>>,
}

impl SessionInfo {
    /// Whether this session answers the given request. The event name is
    /// compared case-insensitively against the event, meeting and location
    /// names.
    pub fn matches(&self, request: &SessionRequest) -> bool {
        if self.year != request.year || self.kind != request.kind {
            return false;
        }
        let wanted = request.event.to_lowercase();
        if wanted.is_empty() {
            return false;
        }
        [
            Some(self.event.as_str()),
            self.meeting_name.as_deref(),
            self.location.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|name| name.to_lowercase().contains(&wanted))
    }

    /// Key under which this session's telemetry is cached.
    pub fn cache_id(&self) -> String {
        match self.session_key {
            Some(key) => format!("session:{key}"),
            None => format!(
                "{}|{}|{}",
                self.year,
                self.event.to_lowercase(),
                self.kind.code()
            ),
        }
    }

    pub fn title(&self) -> String {
        let name = self.meeting_name.as_deref().unwrap_or(&self.event);
        format!("{} {} - {}", self.year, name, self.kind)
    }
}

/// Timing data for one session, as provided by a session source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub info: SessionInfo,
    #[serde(default)]
    pub drivers: Vec<DriverInfo>,
    #[serde(default)]
    pub laps: Vec<Lap>,
}

impl Session {
    pub fn driver(&self, abbreviation: &str) -> Option<&DriverInfo> {
        self.drivers
            .iter()
            .find(|d| d.abbreviation.eq_ignore_ascii_case(abbreviation))
    }

    pub fn laps_for<'a>(&'a self, driver: &'a str) -> impl Iterator<Item = &'a Lap> + 'a {
        self.laps
            .iter()
            .filter(move |l| l.driver.eq_ignore_ascii_case(driver))
    }

    /// One record per driver holding their fastest timed lap. Drivers
    /// without a timed lap are kept with an empty lap time so callers can
    /// report them.
    pub fn fastest_laps(&self) -> Vec<LapRecord> {
        let mut best: BTreeMap<String, &Lap> = BTreeMap::new();
        for lap in self.laps.iter().filter(|l| l.is_timed()) {
            best.entry(lap.driver.to_uppercase())
                .and_modify(|current| {
                    if lap.lap_time < current.lap_time
                        || (lap.lap_time == current.lap_time && lap.lap_number < current.lap_number)
                    {
                        *current = lap;
                    }
                })
                .or_insert(lap);
        }

        // Drivers listed for the session first, then anyone who only
        // appears in the lap data.
        let mut names: Vec<String> = self
            .drivers
            .iter()
            .map(|d| d.abbreviation.to_uppercase())
            .collect();
        for lap in &self.laps {
            let name = lap.driver.to_uppercase();
            if !names.contains(&name) {
                names.push(name);
            }
        }

        names
            .into_iter()
            .map(|name| {
                let info = self.driver(&name);
                let lap = best.get(&name);
                LapRecord {
                    driver: info.map(|d| d.abbreviation.clone()).unwrap_or(name.clone()),
                    driver_number: info.map(|d| d.driver_number),
                    full_name: info.and_then(|d| d.full_name.clone()),
                    team: info.map(|d| d.team.clone()).unwrap_or_default(),
                    team_colour: info.and_then(|d| d.team_colour.clone()),
                    lap_number: lap.map(|l| l.lap_number),
                    lap_time: lap.and_then(|l| l.lap_time),
                    set_at: lap.and_then(|l| l.set_at),
                    gap_to_pole: None,
                }
            })
            .collect()
    }
}
