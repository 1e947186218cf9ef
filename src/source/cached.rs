//! SQLite cache in front of a session source.

use crate::db::cache;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{LapRecord, Session, SessionInfo, SessionRequest, TelemetryTrace};
use crate::source::SessionSource;
use crate::ui::messages::info;

/// Serves sessions and telemetry from the cache database, falling back to
/// `inner` on a miss and storing what it returns. Without an inner source
/// (offline mode) a miss is `DataUnavailable`.
pub struct CachedSource<S: SessionSource> {
    inner: Option<S>,
    pool: DbPool,
}

impl<S: SessionSource> CachedSource<S> {
    pub fn new(inner: S, pool: DbPool) -> Self {
        Self {
            inner: Some(inner),
            pool,
        }
    }

    pub fn offline(pool: DbPool) -> Self {
        Self { inner: None, pool }
    }

    pub fn pool(&mut self) -> &mut DbPool {
        &mut self.pool
    }
}

impl<S: SessionSource> SessionSource for CachedSource<S> {
    fn name(&self) -> &str {
        match &self.inner {
            Some(inner) => inner.name(),
            None => "cache",
        }
    }

    fn load_session(&mut self, request: &SessionRequest) -> AppResult<Session> {
        if let Some(session) = cache::get_session(&self.pool.conn, request)? {
            info(format!("Using cached session data for {}", session.info.title()));
            ttlog_soft(
                &self.pool.conn,
                "cache_hit",
                &request.cache_key(),
                "Session served from cache",
            );
            return Ok(session);
        }

        let Some(inner) = self.inner.as_mut() else {
            return Err(AppError::DataUnavailable(format!(
                "{} {} {} is not cached and offline mode is on",
                request.year, request.event, request.kind
            )));
        };

        let session = inner.load_session(request)?;
        cache::put_session(&self.pool.conn, request, &session, inner.name())?;
        ttlog_soft(
            &self.pool.conn,
            "fetch",
            &request.cache_key(),
            &format!(
                "Fetched {} laps for {} drivers from {}",
                session.laps.len(),
                session.drivers.len(),
                inner.name()
            ),
        );

        Ok(session)
    }

    fn load_telemetry(
        &mut self,
        session: &SessionInfo,
        record: &LapRecord,
    ) -> AppResult<TelemetryTrace> {
        let session_id = session.cache_id();

        if let Some(lap) = record.lap_number
            && let Some(trace) =
                cache::get_telemetry(&self.pool.conn, &session_id, &record.driver, lap)?
        {
            return Ok(trace);
        }

        let Some(inner) = self.inner.as_mut() else {
            return Ok(TelemetryTrace {
                driver: record.driver.clone(),
                lap_number: record.lap_number.unwrap_or(0),
                samples: Vec::new(),
            });
        };

        let trace = inner.load_telemetry(session, record)?;

        // empty traces are not cached: the feed may publish them later
        if !trace.is_empty() {
            cache::put_telemetry(&self.pool.conn, &session_id, &trace)?;
            ttlog_soft(
                &self.pool.conn,
                "fetch",
                &format!("{}|{}|{}", session_id, trace.driver, trace.lap_number),
                &format!("Fetched {} telemetry samples", trace.samples.len()),
            );
        }

        Ok(trace)
    }
}
