use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::{migrate_config, missing_fields};
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    let path = Config::config_file();

    if *print_config {
        println!("📄 Current configuration ({}):\n", path.display());
        println!("{}", cfg.to_yaml()?);
    }

    if (*check || *migrate) && !path.exists() {
        warning(format!(
            "No configuration file at {}, run `polegap init` first.",
            path.display()
        ));
        return Ok(());
    }

    if *check {
        let missing = missing_fields(&path)?;
        if missing.is_empty() {
            success("Configuration file is up to date.");
        } else {
            warning(format!("Missing fields: {}", missing.join(", ")));
            info("Run `polegap config --migrate` to add them with default values.");
        }
    }

    if *migrate {
        let added = migrate_config(&path)?;
        if added.is_empty() {
            info("Nothing to migrate.");
        } else {
            success(format!("Added fields: {}", added.join(", ")));
            let pool = DbPool::open_migrated(&cfg.cache_database)?;
            ttlog_soft(
                &pool.conn,
                "config_migrate",
                &path.display().to_string(),
                &format!("Added {}", added.join(", ")),
            );
        }
    }

    if *edit_config {
        edit(&path, editor.as_deref());
    }

    Ok(())
}

/// Open the config file in the requested editor, falling back to
/// $EDITOR / $VISUAL or the platform default.
fn edit(path: &std::path::Path, requested: Option<&str>) {
    let default_editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    let editor = requested.unwrap_or(&default_editor);

    match Command::new(editor).arg(path).status() {
        Ok(s) if s.success() => {
            success(format!("Configuration file edited with '{editor}'"));
            return;
        }
        _ => warning(format!(
            "Editor '{editor}' not available, falling back to '{default_editor}'"
        )),
    }

    match Command::new(&default_editor).arg(path).status() {
        Ok(s) if s.success() => success(format!(
            "Configuration file edited with fallback '{default_editor}'"
        )),
        _ => crate::ui::messages::error(format!(
            "Failed to edit the configuration file with '{default_editor}'"
        )),
    }
}
