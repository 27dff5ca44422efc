//! Domain models that mirror the `agenda` table and get passed throughout the
//! TUI. These types stay light-weight data holders; persistence lives in `db`
//! and the JSON wire shape lives in `interchange`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// Storage and interchange format for `scheduled_at`. Second granularity, no
/// time zone.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Format used for the date column in the table and form.
pub const DATE_LABEL_FORMAT: &str = "%d-%m-%Y";
/// Format used for the time column in the table and form.
pub const TIME_LABEL_FORMAT: &str = "%H:%M";

/// Id carried by an entry that has not been persisted yet.
pub const UNSAVED_ID: i64 = -1;

/// Closed set of priority labels. The labels are stored verbatim in SQLite and
/// in exported JSON, so renaming a variant's label is a data migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Rendah,
    Sedang,
    Tinggi,
    Urgent,
}

impl Priority {
    /// Every priority, lowest first. The form and the filter cycle in this order.
    pub const ALL: [Priority; 4] = [
        Priority::Rendah,
        Priority::Sedang,
        Priority::Tinggi,
        Priority::Urgent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Rendah => "Rendah",
            Priority::Sedang => "Sedang",
            Priority::Tinggi => "Tinggi",
            Priority::Urgent => "Urgent",
        }
    }

    /// Step through `ALL`, wrapping at either end.
    pub fn cycle(self, offset: isize) -> Priority {
        let len = Priority::ALL.len() as isize;
        let idx = Priority::ALL.iter().position(|p| *p == self).unwrap_or(0) as isize;
        Priority::ALL[(idx + offset).rem_euclid(len) as usize]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a label does not name one of the four priorities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority label `{0}`")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| UnknownPriority(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One scheduled item. `id` is `UNSAVED_ID` until the store assigns one.
pub struct AgendaEntry {
    pub id: i64,
    pub title: String,
    /// Free text, empty when the user left it blank.
    pub description: String,
    /// Always truncated to whole seconds; see [`truncate_to_seconds`].
    pub scheduled_at: NaiveDateTime,
    pub priority: Priority,
}

impl AgendaEntry {
    /// Build an unsaved entry. The timestamp is truncated to whole seconds so
    /// the in-memory value matches what survives a round trip through storage.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        scheduled_at: NaiveDateTime,
        priority: Priority,
    ) -> Self {
        Self {
            id: UNSAVED_ID,
            title: title.into(),
            description: description.into(),
            scheduled_at: truncate_to_seconds(scheduled_at),
            priority,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id >= 0
    }

    /// `dd-MM-yyyy`, used by the table's date column.
    pub fn date_label(&self) -> String {
        self.scheduled_at.format(DATE_LABEL_FORMAT).to_string()
    }

    /// `HH:mm`, used by the table's time column.
    pub fn time_label(&self) -> String {
        self.scheduled_at.format(TIME_LABEL_FORMAT).to_string()
    }

    pub fn datetime_label(&self) -> String {
        format!("{} {}", self.date_label(), self.time_label())
    }

    /// Indonesian weekday name for the scheduled day.
    pub fn day_name(&self) -> &'static str {
        match self.scheduled_at.weekday() {
            Weekday::Sun => "Minggu",
            Weekday::Mon => "Senin",
            Weekday::Tue => "Selasa",
            Weekday::Wed => "Rabu",
            Weekday::Thu => "Kamis",
            Weekday::Fri => "Jumat",
            Weekday::Sat => "Sabtu",
        }
    }

    /// The storage representation of `scheduled_at`.
    pub fn scheduled_at_text(&self) -> String {
        format_datetime(&self.scheduled_at)
    }
}

impl fmt::Display for AgendaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Agenda #{} '{}' on {} [{}]",
            self.id,
            self.title,
            self.date_label(),
            self.priority
        )
    }
}

/// Drop any sub-second component.
pub fn truncate_to_seconds(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}

pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

pub fn parse_datetime(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT)
}
