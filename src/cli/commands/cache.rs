use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::cache::CacheLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Cache { list, clear, info } = cmd {
        let mut pool = DbPool::open_migrated(&cfg.cache_database)?;

        if *info {
            CacheLogic::info(&mut pool, &cfg.cache_database)?;
        }
        if *list || !(*info || *clear) {
            CacheLogic::list(&mut pool)?;
        }
        if *clear {
            CacheLogic::clear(&mut pool)?;
        }
    }
    Ok(())
}
