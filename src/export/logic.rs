use crate::core::analysis::rank_session;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::RankingExport;
use crate::export::pdf_export::export_pdf;
use crate::export::xlsx::export_xlsx;
use crate::models::{Session, SessionInfo};
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Rank `session` and write its gap table to `path` in `format`.
    /// Returns the number of exported rows.
    pub fn export(
        session: &Session,
        format: ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<usize> {
        let (ranking, gaps) = rank_session(session)?;
        let rows = RankingExport::from_gaps(&gaps);

        if rows.is_empty() {
            return Err(AppError::Export("nothing to export".to_string()));
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
            ExportFormat::Xlsx => export_xlsx(&rows, path, session.info.kind.label())?,
            ExportFormat::Pdf => export_pdf(
                &rows,
                path,
                &pdf_title(&session.info),
                &pdf_subtitle(&ranking.pole().driver),
            )?,
        }

        if !ranking.excluded.is_empty() {
            warning(format!(
                "{} driver(s) without a timed lap were left out",
                ranking.excluded.len()
            ));
        }

        Ok(rows.len())
    }
}

fn pdf_title(info: &SessionInfo) -> String {
    format!("{} - gap table", info.title())
}

fn pdf_subtitle(pole: &str) -> String {
    format!("Reference lap: {pole}")
}
