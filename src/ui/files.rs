//! File listing tables for the watched processing streams.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::fromnow::from_now;
use crate::poll::FileListing;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.file_listings.is_empty() {
        let message = match &app.load_error {
            Some(err) => format!("Error: {}", err),
            None => "Waiting for file listings...".to_string(),
        };
        frame.render_widget(Paragraph::new(message), area);
        return;
    }

    let constraints: Vec<Constraint> = app
        .file_listings
        .iter()
        .map(|_| Constraint::Ratio(1, app.file_listings.len() as u32))
        .collect();
    let chunks = Layout::vertical(constraints).split(area);

    for (i, (name, listing)) in app.file_listings.iter().enumerate() {
        render_stream(frame, app, chunks[i], name, listing);
    }
}

fn render_stream(frame: &mut Frame, app: &App, area: Rect, name: &str, listing: &FileListing) {
    let now = Utc::now().timestamp() as f64;

    let rows: Vec<Row> = listing
        .entries()
        .map(|(file, time)| {
            let age = (now - time).max(0.0);
            Row::new(vec![
                Cell::from(file.to_string()),
                Cell::from(from_now(std::time::Duration::from_secs_f64(age))),
            ])
        })
        .collect();

    let header = Row::new(vec![Cell::from("File"), Cell::from("Received")])
        .style(app.theme.header)
        .height(1);

    let table = Table::new(rows, [Constraint::Fill(3), Constraint::Fill(1)])
        .header(header)
        .block(
            Block::default()
                .title(format!(" {} ({} files) ", name, listing.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );

    frame.render_widget(table, area);
}
