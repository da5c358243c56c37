//! Terminal rendering using ratatui.
//!
//! Every function here is a pure projection of [`App`](crate::app::App)
//! state onto a `Frame`; nothing in this module mutates state or talks
//! to the backend.
//!
//! ## Submodules
//!
//! - [`alerts`]: Recent alert feed
//! - [`chart`]: Response-time chart for the selected target
//! - [`common`]: Header, status bar, and help overlay
//! - [`form`]: Add-target form overlay
//! - [`targets`]: Target table with probe status and availability
//! - [`theme`]: Light/dark color themes with terminal auto-detection

pub mod alerts;
pub mod chart;
pub mod common;
pub mod form;
pub mod targets;
pub mod theme;

pub use theme::Theme;

use std::rc::Rc;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Minimum terminal size for a usable display.
const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 20;

/// Split an area into the dashboard's five vertical panels.
///
/// Shared with mouse handling so hit testing always matches what was
/// drawn.
pub fn layout_chunks(area: Rect) -> Rc<[Rect]> {
    Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Min(6),    // Target table
        Constraint::Length(9), // Response-time chart
        Constraint::Length(7), // Alert feed
        Constraint::Length(1), // Status bar
    ])
    .split(area)
}

/// Draw one frame of the dashboard.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Check for minimum terminal size
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = layout_chunks(area);

    common::render_header(frame, app, chunks[0]);
    targets::render(frame, app, chunks[1]);
    chart::render(frame, app, chunks[2]);
    alerts::render(frame, app, chunks[3]);
    common::render_status_bar(frame, app, chunks[4]);

    // Overlays
    form::render_overlay(frame, app, area);
    if app.show_help {
        common::render_help(frame, app, area);
    }
}
