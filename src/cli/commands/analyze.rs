use crate::cli::commands::{open_log, open_source, session_request};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::analysis::{AnalysisOptions, analyze};
use crate::core::report::print_ranking;
use crate::db::log::ttlog_soft;
use crate::errors::{AppError, AppResult};
use crate::render::{PdfChartRenderer, write_artifacts};
use crate::ui::messages::{info, success};
use crate::utils::formatting::parse_driver_pair;
use crate::utils::path::expand_tilde;

/// Handle the `analyze` command: load, rank, compare, then write the
/// charts. Every chart is rendered before the first file is written.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Analyze {
        target,
        out_dir,
        top,
        drivers,
        channel,
        no_telemetry,
        force,
    } = &cli.command
    else {
        return Ok(());
    };

    let request = session_request(target, cfg)?;

    let drivers = match drivers {
        Some(raw) => Some(parse_driver_pair(raw).ok_or_else(|| {
            AppError::UnknownDriver(format!("'{raw}' does not name two drivers (e.g. VER,LEC)"))
        })?),
        None => None,
    };
    let options = AnalysisOptions {
        compare: !no_telemetry,
        drivers,
        channel: channel.unwrap_or_default(),
    };

    let mut source = open_source(cli, cfg)?;
    info(format!(
        "Loading {} {} {} from {}",
        request.year,
        request.event,
        request.kind,
        source.name()
    ));

    let report = analyze(&mut source, &request, &options)?;

    print_ranking(
        &report.session,
        &report.ranking,
        &report.gaps,
        Some(top.unwrap_or(cfg.top_n)),
    );

    if let Some(cmp) = &report.comparison {
        for trace in [&cmp.first, &cmp.second] {
            if let (Some(top), Some(avg)) = (trace.top_speed(), trace.average_speed()) {
                info(format!(
                    "{} lap {}: top speed {:.0} km/h, average {:.1} km/h over {} samples",
                    trace.driver,
                    trace.lap_number,
                    top,
                    avg,
                    trace.samples.len()
                ));
            }
        }
    }

    let artifacts = report.render(&PdfChartRenderer)?;
    let dir = expand_tilde(out_dir.as_deref().unwrap_or(&cfg.output_dir));
    let written = write_artifacts(&dir, &artifacts, *force)?;

    println!();
    for path in &written {
        success(format!("Chart written: {}", path.display()));
    }

    let log = open_log(cfg)?;
    ttlog_soft(
        &log.conn,
        "analyze",
        &request.cache_key(),
        &format!(
            "Pole {} with {} ranked drivers, {} chart(s) in {}",
            report.pole().driver,
            report.gaps.len(),
            written.len(),
            dir.display()
        ),
    );

    Ok(())
}
