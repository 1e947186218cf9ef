use crate::cli::commands::{open_log, open_source, session_request};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::path::expand_tilde;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        target,
        format,
        file,
        force,
    } = &cli.command
    {
        let request = session_request(target, cfg)?;
        let mut source = open_source(cli, cfg)?;
        let session = source.load_session(&request)?;

        let path = expand_tilde(file);
        let rows = ExportLogic::export(&session, *format, &path, *force)?;

        let log = open_log(cfg)?;
        ttlog_soft(
            &log.conn,
            "export",
            &request.cache_key(),
            &format!("{} rows as {} to {}", rows, format.as_str(), path.display()),
        );
    }
    Ok(())
}
