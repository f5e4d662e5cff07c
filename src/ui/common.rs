//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with the watched endpoint and live counters.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (status_icon, status_style) = if app.load_error.is_some() {
        ("●", Style::default().fg(app.theme.error))
    } else if app.last_updated.is_some() {
        ("●", Style::default().fg(app.theme.live))
    } else {
        ("●", Style::default().fg(app.theme.warning))
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", status_icon), status_style),
        Span::styled("DAQWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::raw(app.endpoint().to_string()),
        Span::raw(" │ "),
        Span::styled(
            format!("{}", app.mask.enabled_count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" crates shown │ step "),
        Span::styled(
            format!("{}s", app.step()),
            Style::default().fg(app.theme.highlight),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Temps "),
        Line::from(" 2:Network "),
        Line::from(" 3:Crates "),
        Line::from(" 4:Files "),
        Line::from(" 5:Settings "),
        Line::from(" 6:Scatter "),
    ];

    let selected = match app.current_view {
        View::Horizon => 0,
        View::Network => 1,
        View::Crates => 2,
        View::Files => 3,
        View::Settings => 4,
        View::Scatter => 5,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: time since last update and available controls. Also displays
/// temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(updated) = app.last_updated {
        let controls = match app.current_view {
            View::Horizon | View::Network => "↑↓:row s:step Enter:graph Tab:switch ?:help q:quit",
            View::Crates => "↑↓←→:move space:toggle a:all n:none Tab:switch ?:help q:quit",
            View::Files | View::Settings => "Tab:switch r:reload ?:help q:quit",
            View::Scatter => {
                if app.form_active {
                    "Type to edit | Enter:submit Tab:field Esc:cancel"
                } else {
                    "Enter:edit range ↑↓:crate Tab:switch ?:help q:quit"
                }
            }
        };

        let mut status = format!(
            " {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            updated.elapsed().as_secs_f64(),
            controls,
        );
        if let Some(ref err) = app.load_error {
            status = format!(" {} | {}", err, status.trim_start());
        }
        status
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Select row / move in grid"),
        Line::from("  1-6         Jump to a view"),
        Line::from("  Esc         Cancel form input"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Temps & Network",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  s         Cycle sampling step"),
        Line::from("  Enter     Show graph URL for row"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Crates & Scatter",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  space     Toggle crate in plot"),
        Line::from("  a / n     All / no crates"),
        Line::from("  Enter     Edit range form"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Re-issue queries now"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 46u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
