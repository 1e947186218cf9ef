use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. It also records applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the session and telemetry cache tables.
fn create_cache_tables(conn: &Connection) -> Result<()> {
    let version = "20260310_0001_create_cache_tables";
    if is_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS session_cache (
            cache_key   TEXT PRIMARY KEY,
            year        INTEGER NOT NULL,
            event       TEXT NOT NULL,
            kind        TEXT NOT NULL,
            payload     TEXT NOT NULL,
            fetched_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS telemetry_cache (
            session_id  TEXT NOT NULL,
            driver      TEXT NOT NULL,
            lap_number  INTEGER NOT NULL,
            payload     TEXT NOT NULL,
            fetched_at  TEXT NOT NULL,
            PRIMARY KEY (session_id, driver, lap_number)
        );
        "#,
    )?;

    mark_applied(conn, version, "Created session and telemetry cache tables")?;
    success(format!("Migration applied: {}", version));
    Ok(())
}

/// Record which source filled each cached session.
fn add_source_column(conn: &Connection) -> Result<()> {
    let version = "20260402_0002_add_cache_source";
    if is_applied(conn, version)? {
        return Ok(());
    }

    let mut stmt = conn.prepare("PRAGMA table_info('session_cache')")?;
    let cols: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<_>>()?;

    if !cols.iter().any(|c| c == "source") {
        conn.execute(
            "ALTER TABLE session_cache ADD COLUMN source TEXT NOT NULL DEFAULT 'openf1'",
            [],
        )?;
    }

    mark_applied(conn, version, "Added source column to session_cache")?;
    success(format!("Migration applied: {}", version));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;
    create_cache_tables(conn)?;
    add_source_column(conn)?;
    Ok(())
}
