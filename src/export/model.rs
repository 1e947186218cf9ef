use crate::models::LapRecord;
use crate::utils::time::{delta_to_seconds, format_gap, format_lap_time};
use serde::Serialize;

/// One row of the exported gap table. Times appear twice: formatted for
/// people and in seconds for spreadsheets.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RankingExport {
    pub position: usize,
    pub driver: String,
    pub driver_number: Option<u32>,
    pub team: String,
    pub lap_number: Option<u32>,
    pub lap_time: String,
    pub lap_time_s: f64,
    pub gap: String,
    pub gap_s: f64,
}

impl RankingExport {
    /// Rows from gap-ordered records; records without a time are skipped.
    pub fn from_gaps(gaps: &[LapRecord]) -> Vec<Self> {
        gaps.iter()
            .filter_map(|r| Some((r, r.lap_time?, r.gap_to_pole?)))
            .enumerate()
            .map(|(i, (r, lap, gap))| RankingExport {
                position: i + 1,
                driver: r.driver.clone(),
                driver_number: r.driver_number,
                team: r.team.clone(),
                lap_number: r.lap_number,
                lap_time: format_lap_time(lap),
                lap_time_s: delta_to_seconds(lap),
                gap: format_gap(gap),
                gap_s: delta_to_seconds(gap),
            })
            .collect()
    }
}

pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "position",
        "driver",
        "driver_number",
        "team",
        "lap_number",
        "lap_time",
        "lap_time_s",
        "gap",
        "gap_s",
    ]
}

/// Columns holding numbers, right-aligned in tables.
pub(crate) const NUMERIC_COLUMNS: [usize; 6] = [0, 2, 4, 5, 6, 8];

pub(crate) fn ranking_to_row(r: &RankingExport) -> Vec<String> {
    let opt = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_default();
    vec![
        r.position.to_string(),
        r.driver.clone(),
        opt(r.driver_number),
        r.team.clone(),
        opt(r.lap_number),
        r.lap_time.clone(),
        format!("{:.3}", r.lap_time_s),
        r.gap.clone(),
        format!("{:.3}", r.gap_s),
    ]
}

pub(crate) fn ranking_to_table(rows: &[RankingExport]) -> Vec<Vec<String>> {
    rows.iter().map(ranking_to_row).collect()
}
