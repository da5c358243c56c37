use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::{App, FormField};
use crate::poll::Poller;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, poller: &Poller, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If the add-target form is open, it captures all input
    if app.form.is_some() {
        handle_form_input(app, poller, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => move_selection(app, poller, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(app, poller, 1),
        KeyCode::PageUp => move_selection(app, poller, -10),
        KeyCode::PageDown => move_selection(app, poller, 10),
        KeyCode::Home => {
            let len = app.targets.len() as isize;
            move_selection(app, poller, -len);
        }
        KeyCode::End => {
            let len = app.targets.len() as isize;
            move_selection(app, poller, len);
        }

        // Refresh now
        KeyCode::Char('r') => poller.request_tick(app.selected()),

        // Add target
        KeyCode::Char('a') => app.open_form(),

        // Delete the selected target
        KeyCode::Char('d') => {
            if let Some(id) = app.selected() {
                poller.request_delete(id);
            }
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Move the selection by `offset` rows and fetch the chart for the
/// target it lands on.
fn move_selection(app: &mut App, poller: &Poller, offset: isize) {
    if let Some(id) = app.selection_neighbor(offset) {
        if app.select(id) {
            poller.request_timeseries(id);
        }
    }
}

/// Handle key input while the add-target form is open
fn handle_form_input(app: &mut App, poller: &Poller, key: KeyEvent) {
    match key.code {
        // Cancel without submitting
        KeyCode::Esc => app.close_form(),

        // Field focus
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.form.as_mut() {
                form.focus = form.focus.next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.form.as_mut() {
                form.focus = form.focus.prev();
            }
        }

        // Submit
        KeyCode::Enter => submit_form(app, poller),

        // Backspace
        KeyCode::Backspace => {
            if let Some(form) = app.form.as_mut() {
                if let Some(text) = form.focused_text_mut() {
                    text.pop();
                }
            }
        }

        // Space toggles the enabled flag when it has focus
        KeyCode::Char(' ') => {
            if let Some(form) = app.form.as_mut() {
                if form.focus == FormField::Enabled {
                    form.enabled = !form.enabled;
                } else if let Some(text) = form.focused_text_mut() {
                    text.push(' ');
                }
            }
        }

        // Type characters
        KeyCode::Char(c) => {
            if let Some(form) = app.form.as_mut() {
                if let Some(text) = form.focused_text_mut() {
                    text.push(c);
                }
            }
        }

        _ => {}
    }
}

/// Validate and submit the form. A validation failure keeps the form
/// open with the message on the status line.
fn submit_form(app: &mut App, poller: &Poller) {
    let Some(ref form) = app.form else {
        return;
    };
    match form.validate() {
        Ok(payload) => {
            app.close_form();
            app.clear_error();
            poller.request_create(payload);
        }
        Err(err) => app.set_error(err.to_string()),
    }
}

/// Handle mouse events. `table_area` is the target table's rectangle in
/// the current frame's layout.
pub fn handle_mouse_event(app: &mut App, poller: &Poller, mouse: MouseEvent, table_area: Rect) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => move_selection(app, poller, -1),
        MouseEventKind::ScrollDown => move_selection(app, poller, 1),

        // Click to select
        MouseEventKind::Down(MouseButton::Left) => {
            if mouse.column < table_area.x || mouse.column >= table_area.x + table_area.width {
                return;
            }

            // First data row sits below the block border and table header
            let first_row = table_area.y + 2;
            let last_row = table_area.y + table_area.height.saturating_sub(1);
            if mouse.row < first_row || mouse.row >= last_row {
                return;
            }

            let index = (mouse.row - first_row) as usize;
            if let Some(target) = app.targets.get(index) {
                let id = target.id;
                if app.select(id) {
                    poller.request_timeseries(id);
                }
            }
        }

        _ => {}
    }
}
