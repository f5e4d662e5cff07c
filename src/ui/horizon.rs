//! Horizon rows for metric series.
//!
//! Each metric expression renders as one row: display name, live readout,
//! and a strip that folds the value into color bands (greens above the
//! baseline, blues below, stronger color for larger magnitude).

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, View};
use crate::metric::MetricSeries;

/// Folded bands per side of the baseline.
const BANDS: usize = 4;

/// Width reserved for the name column.
const LABEL_WIDTH: u16 = 18;

/// Width reserved for the live readout column.
const VALUE_WIDTH: u16 = 10;

/// Render the Temps or Network view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let (series, name) = match app.current_view {
        View::Network => (&app.network_series, "Remote stations"),
        _ => (&app.horizon_series, "Cavity temperatures"),
    };

    let title = format!(
        " {} ({} rows, step {}s) [s:step Enter:graph] ",
        name,
        series.len(),
        app.step()
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if series.is_empty() {
        let message = match &app.load_error {
            Some(err) => format!("Error: {}", err),
            None => "Waiting for data...".to_string(),
        };
        frame.render_widget(Paragraph::new(message), inner);
        return;
    }

    let visible = inner.height as usize;
    if visible == 0 {
        return;
    }

    // Keep the selected row in view
    let offset = app.selected_row.saturating_sub(visible.saturating_sub(1));

    for (i, s) in series.iter().enumerate().skip(offset).take(visible) {
        let row_area = Rect::new(inner.x, inner.y + (i - offset) as u16, inner.width, 1);
        render_row(frame, app, row_area, s, i == app.selected_row);
    }
}

fn render_row(frame: &mut Frame, app: &App, area: Rect, series: &MetricSeries, selected: bool) {
    let label_style = if selected {
        app.theme.selected
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::styled(
            format!(
                "{:<width$.width$} ",
                series.display(),
                width = LABEL_WIDTH as usize - 1
            ),
            label_style,
        ),
        Span::styled(
            format!(
                "{:>width$} ",
                format_value(series.latest()),
                width = VALUE_WIDTH as usize - 1
            ),
            Style::default().fg(app.theme.highlight),
        ),
    ];

    let strip_width = area.width.saturating_sub(LABEL_WIDTH + VALUE_WIDTH) as usize;
    let scale = RowScale::for_series(series);

    for sample in resample(series, strip_width) {
        match sample {
            Some(value) => {
                let (band, above) = scale.fold(value);
                spans.push(Span::styled("█", app.theme.band_style(band, above)));
            }
            None => spans.push(Span::raw(" ")),
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Value scale for one horizon row: a baseline offset and a fold extent.
struct RowScale {
    offset: f64,
    magnitude: f64,
}

impl RowScale {
    /// The scales the dashboard pages used: temperatures fold around a
    /// 15-degree baseline, heartbeats over [0, 4], loss ratios over
    /// [0, 0.05]. Anything else scales to its own extent.
    fn for_series(series: &MetricSeries) -> Self {
        let expr = series.expr();

        if expr.starts_with("temp-") {
            return Self {
                offset: -15.0,
                magnitude: 5.0,
            };
        }
        if expr.ends_with("-heartbeat") {
            return Self {
                offset: 0.0,
                magnitude: 4.0,
            };
        }
        if expr.contains('/') {
            return Self {
                offset: 0.0,
                magnitude: 0.05,
            };
        }

        let magnitude = series
            .value_extent()
            .map(|(lo, hi)| lo.abs().max(hi.abs()))
            .filter(|m| *m > 0.0)
            .unwrap_or(1.0);
        Self {
            offset: 0.0,
            magnitude,
        }
    }

    /// Fold a value into (band index, above-baseline) form.
    fn fold(&self, value: f64) -> (usize, bool) {
        let shifted = value + self.offset;
        let above = shifted >= 0.0;
        let fraction = (shifted.abs() / self.magnitude).min(1.0);
        let band = ((fraction * BANDS as f64) as usize).min(BANDS - 1);
        (band, above)
    }
}

/// Squeeze (or stretch) the series onto `width` columns by index scaling.
/// Missing samples stay missing, so gaps show as gaps.
fn resample(series: &MetricSeries, width: usize) -> Vec<Option<f64>> {
    let points = series.points();
    if points.is_empty() || width == 0 {
        return vec![None; width];
    }

    (0..width)
        .map(|col| {
            let idx = col * points.len() / width;
            points[idx].value.filter(|v| v.is_finite())
        })
        .collect()
}

fn format_value(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.abs() >= 1_000_000.0 => format!("{:.1}M", v / 1_000_000.0),
        Some(v) if v.abs() >= 1_000.0 => format!("{:.1}k", v / 1_000.0),
        Some(v) if v.abs() >= 10.0 => format!("{:.1}", v),
        Some(v) => format!("{:.3}", v),
    }
}
