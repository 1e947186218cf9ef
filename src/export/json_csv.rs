use crate::errors::{AppError, AppResult};
use crate::export::{RankingExport, notify_export_success};
use crate::ui::messages::info;
use std::fs;
use std::path::Path;

pub(crate) fn export_json(rows: &[RankingExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(rows)?;
    fs::write(path, json_data)?;

    notify_export_success("JSON", path);
    Ok(())
}

/// CSV with a header row taken from the field names.
pub(crate) fn export_csv(rows: &[RankingExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    for item in rows {
        wtr.serialize(item)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
