//! Local JSON snapshot of a session, for offline analysis and tests.

use crate::errors::{AppError, AppResult};
use crate::models::{
    DriverInfo, Lap, LapRecord, Session, SessionInfo, SessionRequest, TelemetryTrace,
};
use crate::source::SessionSource;
use crate::source::segments::{QUALIFYING_SEGMENTS, tag_segments};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// On-disk layout of a snapshot file.
///
/// ```json
/// {
///   "session": { "year": 2023, "event": "Miami", "kind": "Q" },
///   "drivers": [ { "driver_number": 1, "abbreviation": "VER", "team": "Red Bull Racing" } ],
///   "laps": [ { "driver": "VER", "lap_number": 12, "lap_time": "1:26.841" } ],
///   "telemetry": [ { "driver": "VER", "lap_number": 12, "samples": [ { "distance": 0.0, "speed": 281.0 } ] } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session: SessionInfo,
    #[serde(default)]
    pub drivers: Vec<DriverInfo>,
    #[serde(default)]
    pub laps: Vec<Lap>,
    #[serde(default)]
    pub telemetry: Vec<TelemetryTrace>,
}

impl SessionSnapshot {
    pub fn read(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                AppError::DataUnavailable(format!("snapshot file not found: {}", path.display()))
            }
            _ => AppError::Io(e),
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

pub struct SnapshotSource {
    path: PathBuf,
    snapshot: SessionSnapshot,
}

impl SnapshotSource {
    pub fn open(path: &Path) -> AppResult<Self> {
        let snapshot = SessionSnapshot::read(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            snapshot,
        })
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            path: PathBuf::from("<memory>"),
            snapshot,
        }
    }
}

impl SessionSource for SnapshotSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn load_session(&mut self, request: &SessionRequest) -> AppResult<Session> {
        if !self.snapshot.session.matches(request) {
            return Err(AppError::DataUnavailable(format!(
                "{} {} {} is not in snapshot {}",
                request.year,
                request.event,
                request.kind,
                self.path.display()
            )));
        }

        if self.snapshot.laps.is_empty() {
            return Err(AppError::DataUnavailable(format!(
                "snapshot {} has no laps",
                self.path.display()
            )));
        }

        let mut laps = self.snapshot.laps.clone();
        if request.kind.is_qualifying() {
            tag_segments(&mut laps, QUALIFYING_SEGMENTS);
        }

        Ok(Session {
            info: self.snapshot.session.clone(),
            drivers: self.snapshot.drivers.clone(),
            laps,
        })
    }

    fn load_telemetry(
        &mut self,
        _session: &SessionInfo,
        record: &LapRecord,
    ) -> AppResult<TelemetryTrace> {
        let lap_number = record.lap_number.unwrap_or(0);
        let found = self.snapshot.telemetry.iter().find(|t| {
            t.driver.eq_ignore_ascii_case(&record.driver) && Some(t.lap_number) == record.lap_number
        });

        Ok(match found {
            Some(trace) => trace.clone(),
            None => TelemetryTrace {
                driver: record.driver.clone(),
                lap_number,
                samples: Vec::new(),
            },
        })
    }
}
