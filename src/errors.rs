//! Unified application error type.
//! All modules (source, core, render, export, cli) return AppError to keep
//! the error handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Cache database
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Data source
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session data unavailable: {0}")]
    DataUnavailable(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid session type: {0}")]
    InvalidSessionType(String),

    #[error("Invalid lap time: {0}")]
    InvalidLapTime(String),

    // ---------------------------
    // Analysis errors
    // ---------------------------
    #[error("Session has no lap records")]
    EmptySession,

    #[error("No valid timed lap: {0}")]
    NoValidLap(String),

    #[error("Gap analysis error: {0}")]
    Gap(String),

    #[error("Need at least two ranked drivers for a telemetry comparison, found {0}")]
    NotEnoughDrivers(usize),

    #[error("Driver not found among ranked drivers: {0}")]
    UnknownDriver(String),

    #[error("No telemetry recorded for {driver} on lap {lap}")]
    TelemetryMissing { driver: String, lap: u32 },

    #[error("The telemetry of {driver} on lap {lap} has no {channel} channel")]
    ChannelMissing {
        channel: String,
        driver: String,
        lap: u32,
    },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Render / export errors
    // ---------------------------
    #[error("Render error: {0}")]
    Render(String),

    #[error("Export error: {0}")]
    Export(String),
}

pub type AppResult<T> = Result<T, AppError>;
