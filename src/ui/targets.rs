//! Target table rendering.
//!
//! Displays every monitored target with its latest probe result and the
//! availability computed for the configured lookback window.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{format_availability, format_ms, format_timestamp, probe_status};

/// Render the target table. Rows keep the backend's order, so a row
/// index maps straight back to `app.targets`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Targets ({}) ", app.targets.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if app.targets.is_empty() {
        let placeholder = Paragraph::new("No targets yet. Press 'a' to add one.")
            .style(Style::default().fg(app.theme.unknown))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("URL"),
        Cell::from("Status"),
        Cell::from("Code"),
        Cell::from("Resp ms"),
        Cell::from("DNS ms"),
        Cell::from("Last check"),
        Cell::from("Avail"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = app
        .targets
        .iter()
        .map(|target| {
            let status = probe_status(target);
            let status_style = app.theme.status_style(status);

            let code = target
                .latest_status_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(target.name.clone()),
                Cell::from(target.url.clone()),
                Cell::from(status.label()).style(status_style),
                Cell::from(code),
                Cell::from(format_ms(target.latest_response_time_ms)),
                Cell::from(format_ms(target.latest_dns_time_ms)),
                Cell::from(format_timestamp(target.latest_ts.as_deref())),
                Cell::from(format_availability(app.availability_of(target.id))),
            ])
        })
        .collect();

    // Use Fill for the text columns and fixed minimums for the numeric ones
    let widths = [
        Constraint::Fill(2),  // Name
        Constraint::Fill(3),  // URL - gets the largest share
        Constraint::Min(7),   // Status
        Constraint::Min(5),   // Code
        Constraint::Min(8),   // Resp ms
        Constraint::Min(8),   // DNS ms
        Constraint::Min(19),  // Last check
        Constraint::Min(7),   // Avail
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(app.selected_index());

    frame.render_stateful_widget(table, area, &mut state);
}
