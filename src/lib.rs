//! polegap library root.
//! Exposes the CLI parser, the high-level run() function and the analysis
//! modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod render;
pub mod source;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Analyze { .. } => cli::commands::analyze::handle(cli, cfg),
        Commands::Rank { .. } => cli::commands::rank::handle(cli, cfg),
        Commands::Export { .. } => cli::commands::export::handle(cli, cfg),
        Commands::Cache { .. } => cli::commands::cache::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.cache_db {
        cfg.cache_database = utils::path::expand_tilde(custom_db)
            .to_string_lossy()
            .to_string();
    }

    dispatch(&cli, &cfg)
}
