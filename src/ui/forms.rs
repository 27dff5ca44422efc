use std::path::Path;

use chrono::NaiveDateTime;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{AgendaEntry, Priority};
use crate::search::CHOOSE_PRIORITY_LABEL;
use crate::validation::AgendaDraft;

/// Fields of the agenda form, in focus order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum AgendaField {
    #[default]
    Title,
    Description,
    Date,
    Time,
    Priority,
}

impl AgendaField {
    pub(crate) const ORDER: [AgendaField; 5] = [
        AgendaField::Title,
        AgendaField::Description,
        AgendaField::Date,
        AgendaField::Time,
        AgendaField::Priority,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            AgendaField::Title => "Title",
            AgendaField::Description => "Description",
            AgendaField::Date => "Date",
            AgendaField::Time => "Time",
            AgendaField::Priority => "Priority",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            AgendaField::Title => "<required, 3+ characters>",
            AgendaField::Description => "<optional>",
            AgendaField::Date => "<YYYY-MM-DD>",
            AgendaField::Time => "<HH:MM>",
            AgendaField::Priority => CHOOSE_PRIORITY_LABEL,
        }
    }

    fn row(self) -> u16 {
        match self {
            AgendaField::Title => 0,
            AgendaField::Description => 1,
            AgendaField::Date => 2,
            AgendaField::Time => 3,
            AgendaField::Priority => 4,
        }
    }
}

/// Form state for creating or editing an agenda entry.
#[derive(Clone, Debug, Default)]
pub(crate) struct AgendaForm {
    pub(crate) draft: AgendaDraft,
    pub(crate) active: AgendaField,
    pub(crate) error: Option<String>,
}

impl AgendaForm {
    /// Blank form for a new entry, dated `now`.
    pub(crate) fn new_entry(now: NaiveDateTime) -> Self {
        Self {
            draft: AgendaDraft::starting_at(now),
            ..Self::default()
        }
    }

    /// Populate the form from a stored entry.
    pub(crate) fn from_entry(entry: &AgendaEntry) -> Self {
        Self {
            draft: AgendaDraft::from_entry(entry),
            ..Self::default()
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.draft.id.is_some()
    }

    pub(crate) fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Agenda"
        } else {
            "New Agenda"
        }
    }

    /// Move focus forward (or backward) through the fields, wrapping.
    pub(crate) fn step_field(&mut self, forward: bool) {
        let len = AgendaField::ORDER.len();
        let idx = AgendaField::ORDER
            .iter()
            .position(|field| *field == self.active)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.active = AgendaField::ORDER[next];
    }

    /// Append a character to the active text field. The priority field only
    /// reacts to space, which cycles the selection.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            AgendaField::Title => self.draft.title.push(ch),
            AgendaField::Description => self.draft.description.push(ch),
            AgendaField::Date => {
                if !(ch.is_ascii_digit() || ch == '-') {
                    return false;
                }
                self.draft.date.push(ch);
            }
            AgendaField::Time => {
                if !(ch.is_ascii_digit() || ch == ':') {
                    return false;
                }
                self.draft.time.push(ch);
            }
            AgendaField::Priority => {
                if ch != ' ' {
                    return false;
                }
                self.cycle_priority(1);
            }
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            AgendaField::Title => {
                self.draft.title.pop();
            }
            AgendaField::Description => {
                self.draft.description.pop();
            }
            AgendaField::Date => {
                self.draft.date.pop();
            }
            AgendaField::Time => {
                self.draft.time.pop();
            }
            AgendaField::Priority => self.draft.priority = None,
        }
    }

    /// Step the priority selection. From "nothing chosen" the first step lands
    /// on the lowest (forward) or highest (backward) priority.
    pub(crate) fn cycle_priority(&mut self, offset: isize) {
        self.draft.priority = Some(match self.draft.priority {
            Some(priority) => priority.cycle(offset),
            None if offset < 0 => Priority::Urgent,
            None => Priority::Rendah,
        });
    }

    fn value(&self, field: AgendaField) -> String {
        match field {
            AgendaField::Title => self.draft.title.clone(),
            AgendaField::Description => self.draft.description.clone(),
            AgendaField::Date => self.draft.date.clone(),
            AgendaField::Time => self.draft.time.clone(),
            AgendaField::Priority => self
                .draft
                .priority
                .map(|p| p.label().to_string())
                .unwrap_or_default(),
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: AgendaField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            field.placeholder().to_string()
        } else if field == AgendaField::Priority {
            format!("< {value} >")
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Cursor position inside the form body, relative to its top-left corner.
    /// The priority field is a selector and shows no cursor.
    pub(crate) fn cursor_offset(&self) -> Option<(u16, u16)> {
        if self.active == AgendaField::Priority {
            return None;
        }
        let prefix = self.active.label().len() as u16 + 2;
        let len = self.value(self.active).chars().count() as u16;
        Some((prefix + len, self.active.row()))
    }
}

/// What a path prompt will do with the path once confirmed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Transfer {
    Export,
    Import,
}

/// Single-line file path input used by export and import.
#[derive(Clone, Debug)]
pub(crate) struct PathPrompt {
    pub(crate) transfer: Transfer,
    pub(crate) path: String,
    pub(crate) error: Option<String>,
}

impl PathPrompt {
    pub(crate) fn new(transfer: Transfer, initial: &Path) -> Self {
        Self {
            transfer,
            path: initial.display().to_string(),
            error: None,
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        match self.transfer {
            Transfer::Export => "Export Agenda to JSON",
            Transfer::Import => "Import Agenda from JSON",
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.path.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.path.pop();
    }
}

/// A validated entry waiting for a confirmation, plus the form to return to
/// if the user declines.
#[derive(Clone, Debug)]
pub(crate) struct PendingSave {
    pub(crate) entry: AgendaEntry,
    pub(crate) form: AgendaForm,
}

impl PendingSave {
    pub(crate) fn is_update(&self) -> bool {
        self.entry.is_persisted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 10)
            .unwrap()
            .and_hms_opt(8, 15, 42)
            .unwrap()
    }

    #[test]
    fn new_form_starts_at_now_without_priority() {
        let form = AgendaForm::new_entry(now());
        assert_eq!(form.draft.date, "2025-04-10");
        assert_eq!(form.draft.time, "08:15");
        assert_eq!(form.draft.priority, None);
        assert_eq!(form.active, AgendaField::Title);
        assert!(!form.is_editing());
    }

    #[test]
    fn date_and_time_fields_reject_letters() {
        let mut form = AgendaForm::default();
        form.active = AgendaField::Date;
        assert!(form.push_char('2'));
        assert!(form.push_char('-'));
        assert!(!form.push_char('x'));
        form.active = AgendaField::Time;
        assert!(form.push_char(':'));
        assert!(!form.push_char('-'));
        assert_eq!(form.draft.date, "2-");
        assert_eq!(form.draft.time, ":");
    }

    #[test]
    fn field_focus_wraps_both_ways() {
        let mut form = AgendaForm::default();
        form.step_field(false);
        assert_eq!(form.active, AgendaField::Priority);
        form.step_field(true);
        assert_eq!(form.active, AgendaField::Title);
    }

    #[test]
    fn priority_selector_cycles_and_clears() {
        let mut form = AgendaForm::default();
        form.active = AgendaField::Priority;
        assert!(form.push_char(' '));
        assert_eq!(form.draft.priority, Some(Priority::Rendah));
        form.cycle_priority(-1);
        assert_eq!(form.draft.priority, Some(Priority::Urgent));
        assert!(!form.push_char('x'));
        form.backspace();
        assert_eq!(form.draft.priority, None);
        form.cycle_priority(-1);
        assert_eq!(form.draft.priority, Some(Priority::Urgent));
    }

    #[test]
    fn cursor_follows_active_text_field() {
        let mut form = AgendaForm::default();
        form.draft.title = "Rapat".into();
        assert_eq!(form.cursor_offset(), Some(("Title: ".len() as u16 + 5, 0)));
        form.active = AgendaField::Priority;
        assert_eq!(form.cursor_offset(), None);
    }
}
