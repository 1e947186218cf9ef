//! One handler per subcommand, plus the session plumbing they share.

pub mod analyze;
pub mod cache;
pub mod config;
pub mod export;
pub mod init;
pub mod log;
pub mod rank;

use crate::cli::parser::{Cli, SessionArgs};
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::{SessionKind, SessionRequest};
use crate::source::{CachedSource, OpenF1Source, SessionSource, SnapshotSource};
use crate::utils::path::expand_tilde;

/// Turn the positional session arguments into a request, taking the
/// session type from the config when `--session` is absent.
pub(crate) fn session_request(target: &SessionArgs, cfg: &Config) -> AppResult<SessionRequest> {
    let kind = match target.session {
        Some(kind) => kind,
        None => cfg.default_session.parse::<SessionKind>()?,
    };
    Ok(SessionRequest::new(target.year, &target.event, kind))
}

/// The source selected by the global flags: a snapshot file, the cache
/// alone (`--offline`) or OpenF1 behind the cache.
pub(crate) fn open_source(cli: &Cli, cfg: &Config) -> AppResult<Box<dyn SessionSource>> {
    if let Some(snapshot) = &cli.snapshot {
        return Ok(Box::new(SnapshotSource::open(&expand_tilde(snapshot))?));
    }

    let pool = DbPool::open_migrated(&cfg.cache_database)?;
    if cli.offline {
        return Ok(Box::new(CachedSource::<OpenF1Source>::offline(pool)));
    }

    let api = OpenF1Source::new(&cfg.api_base_url, cfg.http_timeout_secs)?;
    Ok(Box::new(CachedSource::new(api, pool)))
}

/// Connection used for the internal log of a command.
pub(crate) fn open_log(cfg: &Config) -> AppResult<DbPool> {
    DbPool::open_migrated(&cfg.cache_database)
}
