//! Add-target form overlay.
//!
//! A small centered modal with one line per field. Input handling lives
//! in the events module; this only draws the current form state.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, FormField};

/// Render the add-target form as a centered modal, if it is open.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref form) = app.form else {
        return;
    };

    let enabled = if form.enabled { "yes" } else { "no" };
    let lines = vec![
        field_line(app, "Name", &form.name, form.focus == FormField::Name, true),
        field_line(app, "URL", &form.url, form.focus == FormField::Url, true),
        field_line(
            app,
            "Interval (s)",
            &form.interval_sec,
            form.focus == FormField::IntervalSec,
            true,
        ),
        field_line(
            app,
            "Timeout (s)",
            &form.timeout_sec,
            form.focus == FormField::TimeoutSec,
            true,
        ),
        field_line(app, "Enabled", enabled, form.focus == FormField::Enabled, false),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Tab:next field  Space:toggle  Enter:create  Esc:cancel",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Add target ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(lines).block(block);

    let form_width = 60u16.min(area.width.saturating_sub(4));
    let form_height = 9u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(form_width)) / 2;
    let y = area.y + (area.height.saturating_sub(form_height)) / 2;
    let form_area = Rect::new(x, y, form_width, form_height);

    frame.render_widget(Clear, form_area);
    frame.render_widget(paragraph, form_area);
}

fn field_line(app: &App, label: &str, value: &str, focused: bool, text: bool) -> Line<'static> {
    let marker = if focused { "▶ " } else { "  " };
    let label_style = if focused {
        Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut spans = vec![
        Span::raw(marker.to_string()),
        Span::styled(format!("{:<12} ", label), label_style),
        Span::raw(value.to_string()),
    ];
    // Text-entry cursor
    if focused && text {
        spans.push(Span::raw("_"));
    }

    Line::from(spans)
}
