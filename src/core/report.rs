//! Console output of a ranked session.

use crate::core::gaps::intervals;
use crate::core::qualifying::{SegmentResult, segment_label};
use crate::core::ranking::Ranking;
use crate::models::{LapRecord, SessionInfo};
use crate::ui::messages::{header, warning};
use crate::utils::formatting::bold;
use crate::utils::table::{Column, Table};
use crate::utils::time::{format_gap, format_lap_time};

/// Table rows for the gap table: position, driver, team, lap time, gap,
/// interval to the car ahead.
pub fn ranking_rows(gaps: &[LapRecord], top: Option<usize>) -> Vec<Vec<String>> {
    let limit = top.unwrap_or(gaps.len()).min(gaps.len());
    let ints = intervals(gaps);

    gaps.iter()
        .zip(ints)
        .take(limit)
        .enumerate()
        .map(|(i, (r, int))| {
            vec![
                (i + 1).to_string(),
                r.driver.clone(),
                r.team.clone(),
                r.lap_time.map(format_lap_time).unwrap_or_else(|| "--".into()),
                match (i, r.gap_to_pole) {
                    (0, _) => "POLE".to_string(),
                    (_, Some(g)) => format_gap(g),
                    (_, None) => "--".to_string(),
                },
                int.map(format_gap).unwrap_or_default(),
            ]
        })
        .collect()
}

pub fn print_ranking(
    info: &SessionInfo,
    ranking: &Ranking,
    gaps: &[LapRecord],
    top: Option<usize>,
) {
    let shown = top.unwrap_or(gaps.len()).min(gaps.len());

    print_session_header(info);
    println!("Top {} Fastest {} Laps:\n", shown, info.kind.label());

    let mut table = Table::new(vec![
        Column::new("Pos", 4),
        Column::new("Driver", 7),
        Column::new("Team", 24),
        Column::new("Lap time", 10),
        Column::new("Gap", 9),
        Column::new("Int", 9),
    ]);
    for row in ranking_rows(gaps, top) {
        table.add_row(row);
    }
    print!("{}", table.render());

    let pole = ranking.pole();
    let label = if info.kind.is_qualifying() {
        "Pole position"
    } else {
        "Fastest lap"
    };
    println!(
        "\n{}: {} with {}",
        label,
        bold(&pole.display_name()),
        format_lap_time(ranking.pole_time())
    );

    if !ranking.excluded.is_empty() {
        let names: Vec<&str> = ranking.excluded.iter().map(|r| r.driver.as_str()).collect();
        warning(format!("No timed lap, not ranked: {}", names.join(", ")));
    }
}

fn print_session_header(info: &SessionInfo) {
    header(info.title());
    if let Some(start) = info.date_start {
        println!("Started {}\n", start.format("%Y-%m-%d %H:%M UTC"));
    }
}

/// Rows for the segment table: position, driver, team, one time per
/// segment, gap. Pole shows its time in the gap column.
pub fn segment_rows(results: &[SegmentResult]) -> Vec<Vec<String>> {
    results
        .iter()
        .map(|r| {
            let mut row = vec![r.position.to_string(), r.driver.clone(), r.team.clone()];
            row.extend(
                r.times
                    .iter()
                    .map(|t| t.map(format_lap_time).unwrap_or_else(|| "-".into())),
            );
            row.push(match (r.position, r.gap) {
                (1, Some(_)) => r
                    .last_segment()
                    .and_then(|seg| r.times[seg - 1])
                    .map(format_lap_time)
                    .unwrap_or_default(),
                (_, Some(g)) => format_gap(g),
                (_, None) => "--".to_string(),
            });
            row
        })
        .collect()
}

pub fn print_segments(info: &SessionInfo, results: &[SegmentResult]) {
    println!("{} by Segment:\n", info.kind.label());

    let segments = results.first().map(|r| r.times.len()).unwrap_or(0);
    let mut columns = vec![
        Column::new("Pos", 4),
        Column::new("Driver", 7),
        Column::new("Team", 24),
    ];
    let labels: Vec<String> = (1..=segments).map(|s| segment_label(info.kind, s)).collect();
    columns.extend(labels.iter().map(|l| Column::new(l, 10)));
    columns.push(Column::new("Gap", 9));

    let mut table = Table::new(columns);
    for row in segment_rows(results) {
        table.add_row(row);
    }
    print!("{}", table.render());
}
