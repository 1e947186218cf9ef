//! The analysis pipeline: load → rank → gap → compare → chart.

use crate::core::compare::{SpeedComparison, compare_speed};
use crate::core::gaps::compute_gaps;
use crate::core::ranking::{Ranking, rank};
use crate::errors::AppResult;
use crate::models::{LapRecord, Session, SessionInfo, SessionRequest, TelemetryChannel};
use crate::render::{
    Bar, BarChart, ChartArtifact, ChartRenderer, LineChart, LineSeries, PALETTE, Rgb,
};
use crate::source::SessionSource;
use crate::utils::time::delta_to_seconds;

pub const GAP_CHART_STEM: &str = "gap_to_pole";

/// File stem of the comparison chart, e.g. "speed_comparison".
pub fn comparison_chart_stem(channel: TelemetryChannel) -> String {
    format!("{}_comparison", channel.as_str())
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Fetch telemetry and build the comparison chart.
    pub compare: bool,
    /// Compare these two drivers instead of the top two.
    pub drivers: Option<(String, String)>,
    /// Channel plotted against distance.
    pub channel: TelemetryChannel,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub session: SessionInfo,
    pub ranking: Ranking,
    /// Ranked records with `gap_to_pole` set, smallest gap first.
    pub gaps: Vec<LapRecord>,
    pub comparison: Option<SpeedComparison>,
    pub channel: TelemetryChannel,
}

/// Rank a session's personal bests and compute their gaps to pole.
pub fn rank_session(session: &Session) -> AppResult<(Ranking, Vec<LapRecord>)> {
    let ranking = rank(&session.fastest_laps())?;
    let gaps = compute_gaps(ranking.ranked(), ranking.pole_time())?;
    Ok((ranking, gaps))
}

/// Run the whole pipeline. Nothing is written to disk here; every step
/// that can fail runs before the caller renders or writes charts.
pub fn analyze<S: SessionSource + ?Sized>(
    source: &mut S,
    request: &SessionRequest,
    options: &AnalysisOptions,
) -> AppResult<AnalysisReport> {
    let session = source.load_session(request)?;
    let (ranking, gaps) = rank_session(&session)?;

    let comparison = if options.compare {
        let requested = options
            .drivers
            .as_ref()
            .map(|(a, b)| (a.as_str(), b.as_str()));
        let cmp = compare_speed(source, &session.info, &gaps, requested)?;
        cmp.require_channel(options.channel)?;
        Some(cmp)
    } else {
        None
    };

    Ok(AnalysisReport {
        session: session.info,
        ranking,
        gaps,
        comparison,
        channel: options.channel,
    })
}

impl AnalysisReport {
    pub fn pole(&self) -> &LapRecord {
        self.ranking.pole()
    }

    fn team_colour(&self, driver: &str) -> Option<Rgb> {
        self.gaps
            .iter()
            .find(|r| r.driver.eq_ignore_ascii_case(driver))
            .and_then(|r| r.team_colour.as_deref())
            .and_then(Rgb::from_hex)
    }

    /// Bar chart of every ranked driver's gap to pole, in seconds.
    pub fn gap_chart(&self) -> BarChart {
        let heading = if self.session.kind.is_qualifying() {
            "Gap to Pole Position"
        } else {
            "Gap to Fastest Lap"
        };

        BarChart {
            title: format!("{} ({})", heading, self.pole().driver),
            x_label: "Driver".to_string(),
            y_label: "Gap (seconds)".to_string(),
            bars: self
                .gaps
                .iter()
                .map(|r| Bar {
                    label: r.driver.clone(),
                    value: r.gap_to_pole.map(delta_to_seconds).unwrap_or(0.0),
                    color: r.team_colour.as_deref().and_then(Rgb::from_hex),
                })
                .collect(),
        }
    }

    /// The selected channel over distance for the compared drivers.
    /// Teammates share a team colour, so the second one falls back to the
    /// palette.
    pub fn telemetry_chart(&self) -> Option<LineChart> {
        let cmp = self.comparison.as_ref()?;
        let (a, b) = cmp.drivers();

        let first_colour = self.team_colour(a);
        let second_colour = match self.team_colour(b) {
            Some(c) if Some(c) != first_colour => Some(c),
            _ => Some(PALETTE[1]),
        };

        let (first_x, first_y) = cmp.first.channel(self.channel);
        let (second_x, second_y) = cmp.second.channel(self.channel);

        Some(LineChart {
            title: format!("{} Comparison: {} vs {}", self.channel, a, b),
            x_label: "Distance (m)".to_string(),
            y_label: self.channel.axis_label().to_string(),
            series: vec![
                LineSeries {
                    label: a.to_string(),
                    x: first_x,
                    y: first_y,
                    color: first_colour.or(Some(PALETTE[0])),
                },
                LineSeries {
                    label: b.to_string(),
                    x: second_x,
                    y: second_y,
                    color: second_colour,
                },
            ],
        })
    }

    /// Render every chart this report has into memory.
    pub fn render(&self, renderer: &dyn ChartRenderer) -> AppResult<Vec<ChartArtifact>> {
        let ext = renderer.extension();
        let mut artifacts = vec![ChartArtifact::new(
            GAP_CHART_STEM,
            ext,
            renderer.render_bar_chart(&self.gap_chart())?,
        )];

        if let Some(chart) = self.telemetry_chart() {
            artifacts.push(ChartArtifact::new(
                &comparison_chart_stem(self.channel),
                ext,
                renderer.render_line_chart(&chart)?,
            ));
        }

        Ok(artifacts)
    }
}
