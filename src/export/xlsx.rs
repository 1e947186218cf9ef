use crate::errors::{AppError, AppResult};
use crate::export::model::{NUMERIC_COLUMNS, get_headers, ranking_to_row};
use crate::export::{RankingExport, notify_export_success};
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// Styled header, banded rows, numeric cells as numbers and columns sized
/// to their content.
pub(crate) fn export_xlsx(rows: &[RankingExport], path: &Path, sheet: &str) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(sheet)).map_err(xlsx_error)?;

    let headers = get_headers();
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0xC8102E))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(xlsx_error)?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(xlsx_error)?;

    let mut col_widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    let band1 = Color::RGB(0xF4F4F4);
    let band2 = Color::RGB(0xFFFFFF);

    for (row_index, record) in rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, value) in ranking_to_row(record).iter().enumerate() {
            let numeric = NUMERIC_COLUMNS.contains(&col);
            write_cell(worksheet, row, col as u16, value, band, numeric)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(xlsx_error)?;
    }

    workbook.save(path).map_err(xlsx_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
    bg: Color,
    numeric: bool,
) -> AppResult<()> {
    let fmt = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    match value.parse::<f64>() {
        Ok(num) if numeric => {
            let fmt = fmt.set_align(FormatAlign::Right);
            worksheet.write_with_format(row, col, num, &fmt).map_err(xlsx_error)?;
        }
        _ => {
            worksheet.write_with_format(row, col, value, &fmt).map_err(xlsx_error)?;
        }
    }
    Ok(())
}

/// Excel sheet names: at most 31 chars, none of `[]:*?/\`.
fn sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Ranking".to_string()
    } else {
        cleaned
    }
}

fn xlsx_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(format!("XLSX error: {e}"))
}
