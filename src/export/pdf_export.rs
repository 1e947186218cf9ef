use crate::errors::AppResult;
use crate::export::model::{NUMERIC_COLUMNS, get_headers, ranking_to_table};
use crate::export::{RankingExport, notify_export_success};
use crate::render::pdf::PdfManager;
use crate::ui::messages::info;
use std::path::Path;

pub(crate) fn export_pdf(
    rows: &[RankingExport],
    path: &Path,
    title: &str,
    subtitle: &str,
) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let headers = get_headers();
    let table = ranking_to_table(rows);

    let mut pdf = PdfManager::new();
    pdf.write_table(title, Some(subtitle), &headers, &table, &NUMERIC_COLUMNS);
    pdf.save(path)?;

    notify_export_success("PDF", path);
    Ok(())
}
