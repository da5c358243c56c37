//! Application state and reconciliation logic.
//!
//! [`App`] owns everything the renderer reads. Fetch results arrive as
//! whole values and are applied through the `apply_*` methods; each one
//! leaves the state self-consistent, so the table, availability column,
//! selection, and chart can never disagree mid-update.

use std::collections::BTreeMap;
use std::time::Instant;

use thiserror::Error;

use crate::api::{AlertRecord, NewTarget, Target, TargetId, TimeseriesPoint};
use crate::ui::Theme;

/// How an overview refresh affected the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// The selection kept its previous value.
    Unchanged,
    /// A different target is now selected (first load, or fallback after
    /// the selected target vanished from the list).
    Selected(TargetId),
    /// The selection was dropped because the target list is empty.
    Cleared,
}

/// A response-time series tagged with the target it was fetched for.
///
/// The tag is checked when the result is applied and again at render
/// time, so a series can never be drawn under another target's name.
#[derive(Debug, Clone)]
pub struct TaggedSeries {
    pub target_id: TargetId,
    pub points: Vec<TimeseriesPoint>,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Backend data, each replaced wholesale by its own cycle
    pub targets: Vec<Target>,
    pub availability: BTreeMap<TargetId, Option<f64>>,
    pub alerts: Vec<AlertRecord>,
    timeseries: Option<TaggedSeries>,

    // Selection and status line
    selected: Option<TargetId>,
    pub last_error: Option<String>,
    pub last_updated: Option<Instant>,

    // Add-target form overlay
    pub form: Option<TargetForm>,

    // UI
    pub theme: Theme,
    pub backend_label: String,
}

impl App {
    /// Create an empty App. `backend_label` is shown in the header
    /// (typically the backend base URL).
    pub fn new(backend_label: &str, theme: Theme) -> Self {
        Self {
            running: true,
            show_help: false,
            targets: Vec::new(),
            availability: BTreeMap::new(),
            alerts: Vec::new(),
            timeseries: None,
            selected: None,
            last_error: None,
            last_updated: None,
            form: None,
            theme,
            backend_label: backend_label.to_string(),
        }
    }

    /// Apply a completed overview cycle: the new target list and the
    /// availability batch computed over it, in one atomic step.
    ///
    /// The selection is reconciled by exact precedence: nothing selected
    /// and a non-empty list selects the first target; a selection no
    /// longer present falls back to the first target (or none); an
    /// existing, still-valid selection is never moved.
    pub fn apply_overview(
        &mut self,
        targets: Vec<Target>,
        availability: BTreeMap<TargetId, Option<f64>>,
    ) -> SelectionChange {
        self.targets = targets;
        self.availability = availability;
        self.last_updated = Some(Instant::now());
        self.last_error = None;

        let change = match self.selected {
            None => match self.targets.first() {
                Some(first) => SelectionChange::Selected(first.id),
                None => SelectionChange::Unchanged,
            },
            Some(id) if !self.contains_target(id) => match self.targets.first() {
                Some(first) => SelectionChange::Selected(first.id),
                None => SelectionChange::Cleared,
            },
            Some(_) => SelectionChange::Unchanged,
        };

        match change {
            SelectionChange::Selected(id) => {
                self.selected = Some(id);
            }
            SelectionChange::Cleared => {
                self.selected = None;
                self.timeseries = None;
            }
            SelectionChange::Unchanged => {}
        }

        change
    }

    /// Apply a completed timeseries fetch.
    ///
    /// A result tagged with anything other than the current selection
    /// lost a race against a selection change; it is dropped without any
    /// effect and the method returns false.
    pub fn apply_timeseries(&mut self, target_id: TargetId, points: Vec<TimeseriesPoint>) -> bool {
        if self.selected != Some(target_id) {
            return false;
        }
        self.timeseries = Some(TaggedSeries { target_id, points });
        self.last_error = None;
        true
    }

    /// Replace the alert list with a fresh fetch, in backend order.
    pub fn apply_alerts(&mut self, alerts: Vec<AlertRecord>) {
        self.alerts = alerts;
        self.last_error = None;
    }

    /// Select a target explicitly (row click or key navigation).
    /// Returns true if the selection actually moved.
    ///
    /// Presence is not checked: selecting an id the next refresh drops
    /// is harmless, the reconciler fixes it up.
    pub fn select(&mut self, id: TargetId) -> bool {
        if self.selected == Some(id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Currently selected target id.
    pub fn selected(&self) -> Option<TargetId> {
        self.selected
    }

    /// The selected target's row data, if it is in the current list.
    pub fn selected_target(&self) -> Option<&Target> {
        self.selected.and_then(|id| self.targets.iter().find(|t| t.id == id))
    }

    /// Index of the selected target in display order.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|id| self.targets.iter().position(|t| t.id == id))
    }

    /// Id of the row `offset` steps away from the current selection in
    /// display order, clamped to the list ends. With no selection the
    /// walk starts from the first row.
    pub fn selection_neighbor(&self, offset: isize) -> Option<TargetId> {
        if self.targets.is_empty() {
            return None;
        }
        let current = self
            .selected
            .and_then(|id| self.targets.iter().position(|t| t.id == id))
            .unwrap_or(0);
        let last = self.targets.len() - 1;
        let index = current.saturating_add_signed(offset).min(last);
        Some(self.targets[index].id)
    }

    /// The series to draw, only if the stored one is tagged with the
    /// current selection. Between a selection change and the next fetch
    /// this is None and the chart shows a placeholder instead.
    pub fn chart_series(&self) -> Option<&TaggedSeries> {
        match (&self.timeseries, self.selected) {
            (Some(series), Some(id)) if series.target_id == id => Some(series),
            _ => None,
        }
    }

    /// Availability for a target; None is the unknown sentinel (no data
    /// or the fetch failed this cycle).
    pub fn availability_of(&self, id: TargetId) -> Option<f64> {
        self.availability.get(&id).copied().flatten()
    }

    /// Name for a target id. None when the target was deleted since the
    /// referencing alert fired.
    pub fn target_name(&self, id: TargetId) -> Option<&str> {
        self.targets.iter().find(|t| t.id == id).map(|t| t.name.as_str())
    }

    /// Whether a target id is in the current list.
    pub fn contains_target(&self, id: TargetId) -> bool {
        self.targets.iter().any(|t| t.id == id)
    }

    /// Surface a failure on the status line. Stays until the next
    /// successful cycle clears it.
    pub fn set_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    /// Clear the status line after a successful mutation.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Open the add-target form with default values.
    pub fn open_form(&mut self) {
        self.form = Some(TargetForm::default());
    }

    /// Close the form without submitting.
    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

/// Input field focused in the add-target form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Url,
    IntervalSec,
    TimeoutSec,
    Enabled,
}

impl FormField {
    /// Cycle to the next field.
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Url,
            FormField::Url => FormField::IntervalSec,
            FormField::IntervalSec => FormField::TimeoutSec,
            FormField::TimeoutSec => FormField::Enabled,
            FormField::Enabled => FormField::Name,
        }
    }

    /// Cycle to the previous field.
    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Enabled,
            FormField::Url => FormField::Name,
            FormField::IntervalSec => FormField::Url,
            FormField::TimeoutSec => FormField::IntervalSec,
            FormField::Enabled => FormField::TimeoutSec,
        }
    }
}

/// Client-side validation failures for the add-target form.
///
/// These never reach the network; the form stays open with the message
/// on the status line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name and url are required")]
    MissingField,
    #[error("{field} must be a positive integer")]
    InvalidNumber { field: &'static str },
}

/// State of the add-target form overlay.
#[derive(Debug, Clone)]
pub struct TargetForm {
    pub name: String,
    pub url: String,
    pub interval_sec: String,
    pub timeout_sec: String,
    pub enabled: bool,
    pub focus: FormField,
}

impl Default for TargetForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            interval_sec: "60".to_string(),
            timeout_sec: "10".to_string(),
            enabled: true,
            focus: FormField::Name,
        }
    }
}

impl TargetForm {
    /// Validate the form and build the creation request.
    pub fn validate(&self) -> Result<NewTarget, ValidationError> {
        let name = self.name.trim();
        let url = self.url.trim();
        if name.is_empty() || url.is_empty() {
            return Err(ValidationError::MissingField);
        }
        let interval_sec = parse_positive(&self.interval_sec, "interval")?;
        let timeout_sec = parse_positive(&self.timeout_sec, "timeout")?;
        Ok(NewTarget {
            name: name.to_string(),
            url: url.to_string(),
            interval_sec,
            timeout_sec,
            enabled: self.enabled,
        })
    }

    /// Text of the focused field, if it is a text field.
    pub fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Name => Some(&mut self.name),
            FormField::Url => Some(&mut self.url),
            FormField::IntervalSec => Some(&mut self.interval_sec),
            FormField::TimeoutSec => Some(&mut self.timeout_sec),
            FormField::Enabled => None,
        }
    }
}

fn parse_positive(text: &str, field: &'static str) -> Result<u32, ValidationError> {
    match text.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ValidationError::InvalidNumber { field }),
    }
}
