//! Scatter view: crate series samples with the range search form.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::{App, FormField};
use crate::data::CrateMask;
use crate::metric::expr;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(8)]).split(area);

    render_form(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let field_style = |field: FormField| {
        if app.form_active && app.form_field == field {
            app.theme.selected
        } else {
            Style::default()
        }
    };

    let cursor = |field: FormField| {
        if app.form_active && app.form_field == field {
            "_"
        } else {
            ""
        }
    };

    let hint = if app.form_active {
        "Enter:submit Tab:next field Esc:cancel"
    } else {
        "Enter:edit ↑↓:crate"
    };

    let line = Line::from(vec![
        Span::raw(" Search by: "),
        Span::styled(format!("[{}]", app.form.field.label()), field_style(FormField::Search)),
        Span::raw("  Start: "),
        Span::styled(
            format!("{}{}", app.form.start, cursor(FormField::Start)),
            field_style(FormField::Start),
        ),
        Span::raw("  End: "),
        Span::styled(
            format!("{}{}", app.form.end, cursor(FormField::End)),
            field_style(FormField::End),
        ),
        Span::styled(format!("   {hint}"), Style::default().add_modifier(Modifier::DIM)),
    ]);

    let block = Block::default()
        .title(" Range ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let exprs = expr::crate_exprs(&app.config.crate_metric);
    let label = CrateMask::label(app.selected_slot);

    let block = Block::default()
        .title(format!(" {} history ", label))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let series = app
        .crate_series
        .iter()
        .find(|s| s.expr() == exprs[app.selected_slot]);

    let points: Vec<(f64, f64)> = series.map(|s| s.plottable().collect()).unwrap_or_default();
    if points.is_empty() {
        frame.render_widget(
            Paragraph::new(format!("No data for {}", label)).block(block),
            area,
        );
        return;
    }

    let (t_min, t_max) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &(t, _)| (lo.min(t), hi.max(t)));
    let (mut v_min, mut v_max) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &(_, v)| (lo.min(v), hi.max(v)));
    if v_min == v_max {
        v_min -= 1.0;
        v_max += 1.0;
    }

    let datasets = vec![Dataset::default()
        .name(label)
        .marker(Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(app.theme.highlight))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([t_min, t_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([v_min, v_max])
                .labels(vec![format!("{:.1}", v_min), format!("{:.1}", v_max)]),
        );

    frame.render_widget(chart, area);
}
