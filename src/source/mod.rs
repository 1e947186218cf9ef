//! Session data sources.
//!
//! A `SessionSource` turns a `SessionRequest` into timing data and looks up
//! the telemetry recorded during a given lap. Implementations:
//!
//! - `OpenF1Source`: the public OpenF1 HTTP API
//! - `SnapshotSource`: a local JSON snapshot file
//! - `CachedSource`: an SQLite cache in front of either of the above

pub mod cached;
pub mod distance;
pub mod openf1;
pub mod segments;
pub mod snapshot;

pub use cached::CachedSource;
pub use openf1::OpenF1Source;
pub use snapshot::{SessionSnapshot, SnapshotSource};

use crate::errors::AppResult;
use crate::models::{LapRecord, Session, SessionInfo, SessionRequest, TelemetryTrace};

pub trait SessionSource {
    /// Short name used in messages and in the internal log.
    fn name(&self) -> &str;

    /// Load laps and drivers for the requested session. Fails with
    /// `DataUnavailable` if the session does not exist or has no data.
    fn load_session(&mut self, request: &SessionRequest) -> AppResult<Session>;

    /// Telemetry recorded during the lap behind `record`. An empty trace
    /// means the source has nothing for that lap.
    fn load_telemetry(
        &mut self,
        session: &SessionInfo,
        record: &LapRecord,
    ) -> AppResult<TelemetryTrace>;
}

impl<S: SessionSource + ?Sized> SessionSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load_session(&mut self, request: &SessionRequest) -> AppResult<Session> {
        (**self).load_session(request)
    }

    fn load_telemetry(
        &mut self,
        session: &SessionInfo,
        record: &LapRecord,
    ) -> AppResult<TelemetryTrace> {
        (**self).load_telemetry(session, record)
    }
}
