use crate::cli::commands::{open_source, session_request};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::analysis::rank_session;
use crate::core::qualifying::segment_results;
use crate::core::report::{print_ranking, print_segments};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;

/// Handle the `rank` command: the gap table only, no telemetry or charts.
/// `--segments` adds the Q1/Q2/Q3 table.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Rank {
        target,
        top,
        segments,
    } = &cli.command
    {
        let request = session_request(target, cfg)?;
        let mut source = open_source(cli, cfg)?;

        let session = source.load_session(&request)?;
        let (ranking, gaps) = rank_session(&session)?;

        print_ranking(&session.info, &ranking, &gaps, *top);

        if *segments {
            println!();
            match segment_results(&session) {
                Ok(results) => print_segments(&session.info, &results),
                Err(AppError::DataUnavailable(msg)) => warning(msg),
                Err(e) => return Err(e),
            }
        }
    }
    Ok(())
}
