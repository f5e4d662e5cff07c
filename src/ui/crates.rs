//! Crate selection grid and the crate-level chart.
//!
//! The grid mirrors the dashboard's checkbox layout: two columns filled
//! column-major, so slot `i` sits at row `i % GRID_ROWS`, column
//! `i / GRID_ROWS`. Toggling a slot flips its bit in the plot mask; the
//! chart redraws from the mask on every frame.

use chrono::DateTime;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::{App, GRID_ROWS};
use crate::data::CrateMask;
use crate::metric::expr;

/// Line colors assigned to enabled crates, cycled in slot order.
const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
];

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::horizontal([Constraint::Length(32), Constraint::Min(20)]).split(area);

    render_grid(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(
            " Crates ({} shown) [space:toggle a:all n:none] ",
            app.mask.enabled_count()
        ))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::with_capacity(GRID_ROWS);
    for row in 0..GRID_ROWS {
        let mut spans = Vec::new();
        for col in 0..2 {
            let slot = row + col * GRID_ROWS;
            spans.push(grid_cell(app, slot));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn grid_cell(app: &App, slot: usize) -> Span<'static> {
    let check = if app.mask.is_enabled(slot) { "x" } else { " " };
    let text = format!("[{check}] {:<10.10}", CrateMask::label(slot));

    let style = if slot == app.selected_slot {
        app.theme.selected
    } else if !app.mask.is_available(slot) {
        Style::default().add_modifier(Modifier::DIM)
    } else if app.mask.is_enabled(slot) {
        Style::default().fg(app.theme.live)
    } else {
        Style::default()
    };

    Span::styled(text, style)
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let exprs = expr::crate_exprs(&app.config.crate_metric);

    // Pair each enabled slot with its fetched series, by expression name.
    // A slot whose expression returned no data simply has no line.
    let plotted: Vec<(String, Vec<(f64, f64)>)> = app
        .mask
        .enabled_slots()
        .filter_map(|slot| {
            let series = app.crate_series.iter().find(|s| s.expr() == exprs[slot])?;
            let points: Vec<(f64, f64)> = series.plottable().collect();
            (!points.is_empty()).then(|| (CrateMask::label(slot), points))
        })
        .collect();

    let block = Block::default()
        .title(format!(" {} ", app.config.crate_metric))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if plotted.is_empty() {
        // The missing-data rendering: an empty frame with a note
        let message = if app.mask.enabled_count() == 0 {
            "No crates selected"
        } else {
            "No data for the selected crates"
        };
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let (mut t_min, mut t_max) = (f64::MAX, f64::MIN);
    let (mut v_min, mut v_max) = (f64::MAX, f64::MIN);
    for (_, points) in &plotted {
        for &(t, v) in points {
            t_min = t_min.min(t);
            t_max = t_max.max(t);
            v_min = v_min.min(v);
            v_max = v_max.max(v);
        }
    }
    if v_min == v_max {
        v_min -= 1.0;
        v_max += 1.0;
    }

    let datasets: Vec<Dataset> = plotted
        .iter()
        .enumerate()
        .map(|(i, (label, points))| {
            Dataset::default()
                .name(label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([t_min, t_max])
                .labels(vec![format_time(t_min), format_time(t_max)]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([v_min, v_max])
                .labels(vec![format!("{:.1}", v_min), format!("{:.1}", v_max)]),
        );

    frame.render_widget(chart, area);
}

fn format_time(timestamp: f64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
