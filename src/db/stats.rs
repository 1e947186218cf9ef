use crate::db::cache;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour::{Cyan, Fixed, Green, Yellow};
use std::fs;

fn label(name: &str) -> String {
    Cyan.paint(format!("• {name}:")).to_string()
}

pub fn print_cache_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let stats = cache::stats(&pool.conn)?;

    println!();
    println!("{} {}", label("File"), Yellow.paint(db_path));
    println!("{} {:.2} MB", label("Size"), file_size as f64 / (1024.0 * 1024.0));
    println!("{} {}", label("Cached sessions"), Green.paint(stats.sessions.to_string()));
    println!(
        "{} {}",
        label("Cached telemetry traces"),
        Green.paint(stats.traces.to_string())
    );
    println!("{} {:.1} KB", label("Payload"), stats.payload_bytes as f64 / 1024.0);

    let missing = || Fixed(8).paint("--").to_string();
    println!("{}", label("Fetched"));
    println!("    first: {}", stats.oldest.unwrap_or_else(missing));
    println!("    last:  {}", stats.newest.unwrap_or_else(missing));
    println!();

    Ok(())
}
