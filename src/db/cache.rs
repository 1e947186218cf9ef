//! Queries on the session and telemetry cache tables.

use crate::errors::AppResult;
use crate::models::{Session, SessionRequest, TelemetryTrace};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

/// One row of `session_cache`, without its payload.
#[derive(Debug, Clone)]
pub struct CachedSessionRow {
    pub cache_key: String,
    pub year: i32,
    pub event: String,
    pub kind: String,
    pub source: String,
    pub fetched_at: String,
    pub payload_bytes: i64,
}

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub sessions: i64,
    pub traces: i64,
    pub payload_bytes: i64,
    pub oldest: Option<String>,
    pub newest: Option<String>,
}

pub fn get_session(conn: &Connection, request: &SessionRequest) -> AppResult<Option<Session>> {
    let payload: Option<String> = conn
        .query_row(
            "SELECT payload FROM session_cache WHERE cache_key = ?1",
            [request.cache_key()],
            |row| row.get(0),
        )
        .optional()?;

    match payload {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn put_session(
    conn: &Connection,
    request: &SessionRequest,
    session: &Session,
    source: &str,
) -> AppResult<()> {
    let payload = serde_json::to_string(session)?;
    conn.execute(
        "INSERT OR REPLACE INTO session_cache
            (cache_key, year, event, kind, payload, fetched_at, source)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            request.cache_key(),
            request.year,
            request.event,
            request.kind.code(),
            payload,
            Local::now().to_rfc3339(),
            source
        ],
    )?;
    Ok(())
}

pub fn get_telemetry(
    conn: &Connection,
    session_id: &str,
    driver: &str,
    lap_number: u32,
) -> AppResult<Option<TelemetryTrace>> {
    let payload: Option<String> = conn
        .query_row(
            "SELECT payload FROM telemetry_cache
             WHERE session_id = ?1 AND driver = ?2 AND lap_number = ?3",
            params![session_id, driver.to_uppercase(), lap_number],
            |row| row.get(0),
        )
        .optional()?;

    match payload {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn put_telemetry(conn: &Connection, session_id: &str, trace: &TelemetryTrace) -> AppResult<()> {
    let payload = serde_json::to_string(trace)?;
    conn.execute(
        "INSERT OR REPLACE INTO telemetry_cache
            (session_id, driver, lap_number, payload, fetched_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            session_id,
            trace.driver.to_uppercase(),
            trace.lap_number,
            payload,
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn list_sessions(conn: &Connection) -> AppResult<Vec<CachedSessionRow>> {
    let mut stmt = conn.prepare(
        "SELECT cache_key, year, event, kind, source, fetched_at, LENGTH(payload)
         FROM session_cache
         ORDER BY year ASC, event ASC, kind ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(CachedSessionRow {
            cache_key: row.get(0)?,
            year: row.get(1)?,
            event: row.get(2)?,
            kind: row.get(3)?,
            source: row.get(4)?,
            fetched_at: row.get(5)?,
            payload_bytes: row.get(6)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn stats(conn: &Connection) -> AppResult<CacheStats> {
    let (sessions, session_bytes, oldest, newest): (i64, i64, Option<String>, Option<String>) =
        conn.query_row(
            "SELECT COUNT(*), IFNULL(SUM(LENGTH(payload)), 0), MIN(fetched_at), MAX(fetched_at)
             FROM session_cache",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

    let (traces, trace_bytes): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), IFNULL(SUM(LENGTH(payload)), 0) FROM telemetry_cache",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(CacheStats {
        sessions,
        traces,
        payload_bytes: session_bytes + trace_bytes,
        oldest,
        newest,
    })
}

/// Delete every cached session and trace. Returns (sessions, traces) removed.
pub fn clear(conn: &Connection) -> AppResult<(usize, usize)> {
    let sessions = conn.execute("DELETE FROM session_cache", [])?;
    let traces = conn.execute("DELETE FROM telemetry_cache", [])?;
    Ok((sessions, traces))
}
