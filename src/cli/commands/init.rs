use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the cache database with all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.cache_db.clone(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing polegap…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Cache DB    : {}", &db_path);

    let pool = DbPool::open_migrated(&db_path)?;

    ttlog_soft(
        &pool.conn,
        "init",
        "",
        &format!("Cache database initialized at {}", &db_path),
    );

    success("polegap initialization completed!");
    Ok(())
}
