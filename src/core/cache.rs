use crate::db::cache;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::stats::print_cache_info;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub struct CacheLogic;

impl CacheLogic {
    pub fn list(pool: &mut DbPool) -> AppResult<()> {
        let rows = cache::list_sessions(&pool.conn)?;
        if rows.is_empty() {
            info("No cached sessions.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("Year", 6),
            Column::new("Event", 20),
            Column::new("Session", 8),
            Column::new("Source", 10),
            Column::new("Size", 10),
            Column::new("Fetched", 25),
        ]);
        for r in rows {
            table.add_row(vec![
                r.year.to_string(),
                r.event,
                r.kind,
                r.source,
                format!("{:.1} KB", r.payload_bytes as f64 / 1024.0),
                r.fetched_at,
            ]);
        }

        println!("🗄️  Cached sessions:\n");
        print!("{}", table.render());
        Ok(())
    }

    pub fn info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
        print_cache_info(pool, db_path)
    }

    pub fn clear(pool: &mut DbPool) -> AppResult<()> {
        let (sessions, traces) = cache::clear(&pool.conn)?;
        ttlog_soft(
            &pool.conn,
            "cache_clear",
            "",
            &format!("Removed {sessions} sessions and {traces} telemetry traces"),
        );
        success(format!(
            "Cache cleared: {sessions} session(s), {traces} telemetry trace(s) removed."
        ));
        Ok(())
    }
}
