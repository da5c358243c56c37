//! Common UI components shared across panels.
//!
//! This module contains the header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{probe_status, ProbeStatus};

/// Render the header bar with a fleet-wide overview.
///
/// Displays: status indicator, target counts by probe status, backend URL.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if app.last_updated.is_none() && app.targets.is_empty() {
        let line = Line::from(vec![
            Span::styled(
                " PULSEWATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    // Count targets by probe status
    let mut up = 0;
    let mut down = 0;
    let mut unknown = 0;

    for target in &app.targets {
        match probe_status(target) {
            ProbeStatus::Up => up += 1,
            ProbeStatus::Down => down += 1,
            ProbeStatus::Unknown => unknown += 1,
        }
    }

    // Overall status indicator: worst state wins
    let status_style = if down > 0 {
        app.theme.status_style(ProbeStatus::Down)
    } else if unknown > 0 {
        app.theme.status_style(ProbeStatus::Unknown)
    } else {
        app.theme.status_style(ProbeStatus::Up)
    };

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        Span::styled("PULSEWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{}", up), Style::default().fg(app.theme.up)),
        Span::raw(" up "),
        if down > 0 {
            Span::styled(
                format!("{}", down),
                Style::default().fg(app.theme.down).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" down "),
        if unknown > 0 {
            Span::styled(
                format!("{}", unknown),
                Style::default().fg(app.theme.unknown),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" unknown │ "),
        Span::styled(
            format!("{}", app.targets.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" targets │ "),
        Span::raw(app.backend_label.clone()),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows the pending fetch error if there is one, otherwise the time
/// since the last successful refresh and the available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref err) = app.last_error {
        let paragraph = Paragraph::new(format!(" Error: {} | r:refresh q:quit", err))
            .style(Style::default().fg(app.theme.down));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(updated) = app.last_updated {
        format!(
            " Updated {:.1}s ago | ↑↓:select a:add d:delete r:refresh ?:help q:quit",
            updated.elapsed().as_secs_f64(),
        )
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ↑/↓ j/k     Select target"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Click       Select row under cursor"),
        Line::from("  Scroll      Move selection"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Targets",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  a         Add a target"),
        Line::from("  d         Delete selected target"),
        Line::from("  r         Refresh now"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ?         Toggle this help"),
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
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 22u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
