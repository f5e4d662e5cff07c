//! Trigger settings readout.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::poll::TriggerSettings;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Trigger settings ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(ref settings) = app.trigger_settings else {
        let message = match &app.load_error {
            Some(err) => format!("Error: {}", err),
            None => "Waiting for settings...".to_string(),
        };
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    };

    let rows: Vec<Row> = TriggerSettings::FIELDS
        .iter()
        .map(|&(label, slot)| {
            Row::new(vec![
                Cell::from(label),
                Cell::from(settings.display(slot)),
            ])
        })
        .collect();

    let header = Row::new(vec![Cell::from("Setting"), Cell::from("Value")])
        .style(app.theme.header)
        .height(1);

    let table = Table::new(rows, [Constraint::Fill(2), Constraint::Fill(1)])
        .header(header)
        .block(block);

    frame.render_widget(table, area);
}
