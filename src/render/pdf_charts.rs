use crate::errors::{AppError, AppResult};
use crate::render::pdf::{GRID, INK, PdfManager, Tint};
use crate::render::scale::Axis;
use crate::render::{BarChart, ChartRenderer, LineChart, PALETTE, Rgb};
use pdf_writer::Content;

const TICK_FONT: f32 = 9.0;
const LABEL_FONT: f32 = 11.0;

/// Above this many bars the value labels would overlap.
const MAX_ANNOTATED_BARS: usize = 25;

/// Plot rectangle inside a landscape page, in PDF points.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f32,
    bottom: f32,
    right: f32,
    top: f32,
}

impl PlotArea {
    fn for_page(pdf: &PdfManager, bottom_room: f32) -> Self {
        let (w, h) = pdf.page_size();
        let m = pdf.margin();
        Self {
            left: m + 45.0,
            bottom: m + bottom_room,
            right: w - m,
            top: h - m - 40.0,
        }
    }

    fn width(&self) -> f32 {
        self.right - self.left
    }
}

fn tint(color: Option<Rgb>, fallback: Rgb) -> Tint {
    color.unwrap_or(fallback).unit()
}

/// Title, axis names, y grid and y tick labels shared by both charts.
fn draw_frame(
    pdf: &PdfManager,
    content: &mut Content,
    area: PlotArea,
    y_axis: &Axis,
    title: &str,
    x_label: &str,
    y_label: &str,
) {
    let (page_w, page_h) = pdf.page_size();

    pdf.draw_text_centered(
        content,
        page_w / 2.0,
        page_h - pdf.margin() - 10.0,
        pdf.title_font_size(),
        title,
    );

    for tick in y_axis.ticks() {
        let y = y_axis.project(tick, area.bottom, area.top);
        pdf.draw_line(content, (area.left, y), (area.right, y), 0.5, GRID);
        let label = y_axis.format_tick(tick);
        pdf.draw_text_right(content, area.left - 6.0, y - 3.0, TICK_FONT, &label);
    }

    let origin = (area.left, area.bottom);
    pdf.draw_line(content, origin, (area.right, area.bottom), 0.8, INK);
    pdf.draw_line(content, origin, (area.left, area.top), 0.8, INK);

    let x_mid = (area.left + area.right) / 2.0;
    pdf.draw_text_centered(content, x_mid, pdf.margin() - 25.0, LABEL_FONT, x_label);

    let y_mid = (area.bottom + area.top) / 2.0;
    let half = pdf.text_width(LABEL_FONT, y_label) / 2.0;
    pdf.draw_text_rotated(
        content,
        pdf.margin() - 5.0,
        y_mid - half,
        LABEL_FONT,
        90.0,
        y_label,
    );
}

/// Renders charts as single-page vector PDF documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfChartRenderer;

impl ChartRenderer for PdfChartRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render_bar_chart(&self, chart: &BarChart) -> AppResult<Vec<u8>> {
        if chart.bars.is_empty() {
            return Err(AppError::Render(format!("'{}' has no bars", chart.title)));
        }
        if let Some(bad) = chart.bars.iter().find(|b| !b.value.is_finite()) {
            return Err(AppError::Render(format!("bar '{}' has no finite value", bad.label)));
        }

        let mut pdf = PdfManager::landscape();
        let mut content = pdf.new_page();
        let area = PlotArea::for_page(&pdf, 45.0);

        let max = chart.values().into_iter().fold(0.0_f64, f64::max);
        let y_axis = Axis::from_zero(max, 6);

        draw_frame(
            &pdf,
            &mut content,
            area,
            &y_axis,
            &chart.title,
            &chart.x_label,
            &chart.y_label,
        );

        let slot = area.width() / chart.bars.len() as f32;
        let bar_w = slot * 0.7;
        let annotate = chart.bars.len() <= MAX_ANNOTATED_BARS;

        for (i, bar) in chart.bars.iter().enumerate() {
            let cx = area.left + slot * (i as f32 + 0.5);
            let top = y_axis.project(bar.value, area.bottom, area.top);

            pdf.fill_rect(
                &mut content,
                cx - bar_w / 2.0,
                area.bottom,
                bar_w,
                top - area.bottom,
                tint(bar.color, PALETTE[0]),
            );

            if annotate {
                let value = format!("{:.3}", bar.value);
                pdf.draw_text_centered(&mut content, cx, top + 3.0, 7.0, &value);
            }

            // labels run up to the right and end under their bar
            let w = pdf.text_width(TICK_FONT, &bar.label);
            let d = w * std::f32::consts::FRAC_1_SQRT_2;
            pdf.draw_text_rotated(
                &mut content,
                cx - d,
                area.bottom - 10.0 - d,
                TICK_FONT,
                45.0,
                &bar.label,
            );
        }

        pdf.finalize_page(content);
        Ok(pdf.finish())
    }

    fn render_line_chart(&self, chart: &LineChart) -> AppResult<Vec<u8>> {
        if chart.series.is_empty() {
            return Err(AppError::Render(format!("'{}' has no series", chart.title)));
        }
        for s in &chart.series {
            if s.x.len() != s.y.len() {
                return Err(AppError::Render(format!(
                    "series '{}' has {} x values but {} y values",
                    s.label,
                    s.x.len(),
                    s.y.len()
                )));
            }
            if s.x.is_empty() {
                return Err(AppError::Render(format!("series '{}' is empty", s.label)));
            }
        }

        let finite = |v: &f64| v.is_finite();
        let (x_min, x_max) = chart
            .series
            .iter()
            .flat_map(|s| s.x.iter().copied().filter(finite))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let y_max = chart
            .series
            .iter()
            .flat_map(|s| s.y.iter().copied().filter(finite))
            .fold(0.0_f64, f64::max);

        let x_axis = Axis::covering(x_min, x_max, 8);
        let y_axis = Axis::from_zero(y_max, 6);

        let mut pdf = PdfManager::landscape();
        let mut content = pdf.new_page();
        let area = PlotArea::for_page(&pdf, 20.0);

        draw_frame(
            &pdf,
            &mut content,
            area,
            &y_axis,
            &chart.title,
            &chart.x_label,
            &chart.y_label,
        );

        for tick in x_axis.ticks() {
            let x = x_axis.project(tick, area.left, area.right);
            let tick_end = (x, area.bottom - 4.0);
            pdf.draw_line(&mut content, (x, area.bottom), tick_end, 0.8, INK);
            let label = x_axis.format_tick(tick);
            pdf.draw_text_centered(&mut content, x, area.bottom - 14.0, TICK_FONT, &label);
        }

        let (_, page_h) = pdf.page_size();
        let mut legend_y = page_h - pdf.margin() - 55.0;
        let legend_x = area.right - 110.0;

        for (i, series) in chart.series.iter().enumerate() {
            let color = tint(series.color, PALETTE[i % PALETTE.len()]);

            let points: Vec<(f32, f32)> = series
                .x
                .iter()
                .zip(&series.y)
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(x, y)| {
                    (
                        x_axis.project(*x, area.left, area.right),
                        y_axis.project(*y, area.bottom, area.top),
                    )
                })
                .collect();
            pdf.draw_polyline(&mut content, &points, 1.1, color);

            let swatch_y = legend_y + 3.0;
            pdf.draw_line(
                &mut content,
                (legend_x, swatch_y),
                (legend_x + 22.0, swatch_y),
                2.0,
                color,
            );
            let text_x = legend_x + 28.0;
            pdf.draw_text(&mut content, text_x, legend_y, LABEL_FONT, &series.label);
            legend_y -= 16.0;
        }

        pdf.finalize_page(content);
        Ok(pdf.finish())
    }
}
