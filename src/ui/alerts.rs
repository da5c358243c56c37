//! Alert feed rendering.
//!
//! Read-only table of recent alerts in backend order (newest first).

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::format_timestamp;

/// Render the alert feed.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Alerts ({}) ", app.alerts.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if app.alerts.is_empty() {
        let placeholder = Paragraph::new("No alerts.")
            .style(Style::default().fg(app.theme.unknown))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Target"),
        Cell::from("Message"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = app
        .alerts
        .iter()
        .map(|alert| {
            // The target may have been deleted since the alert fired
            let name = app
                .target_name(alert.target_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("Target {}", alert.target_id));

            Row::new(vec![
                Cell::from(format_timestamp(Some(&alert.ts))),
                Cell::from(name),
                Cell::from(alert.message.clone())
                    .style(Style::default().fg(app.theme.down)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(19),  // Time
        Constraint::Fill(1),  // Target
        Constraint::Fill(3),  // Message - gets the largest share
    ];

    let table = Table::new(rows, widths).header(header).block(block);

    frame.render_widget(table, area);
}
