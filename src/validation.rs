//! Form input rules that gate every create and update. The rules run in a
//! fixed order and the first failure wins, so the user always sees the message
//! for the earliest field that needs attention.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::models::{truncate_to_seconds, AgendaEntry, Priority, UNSAVED_ID};

/// Minimum number of characters in a trimmed title.
pub const MIN_TITLE_CHARS: usize = 3;
/// Date format accepted by the form.
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";
/// Time format accepted by the form. Seconds are always zero.
pub const FORM_TIME_FORMAT: &str = "%H:%M";

/// Raw form content before any parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaDraft {
    /// `None` for a new entry, the row id when editing.
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub priority: Option<Priority>,
}

impl AgendaDraft {
    /// Pre-fill the form from a stored entry.
    pub fn from_entry(entry: &AgendaEntry) -> Self {
        Self {
            id: Some(entry.id),
            title: entry.title.clone(),
            description: entry.description.clone(),
            date: entry.scheduled_at.format(FORM_DATE_FORMAT).to_string(),
            time: entry.scheduled_at.format(FORM_TIME_FORMAT).to_string(),
            priority: Some(entry.priority),
        }
    }

    /// A blank form with the date and time set to `now`, priority unset.
    pub fn starting_at(now: NaiveDateTime) -> Self {
        Self {
            date: now.format(FORM_DATE_FORMAT).to_string(),
            time: now.format(FORM_TIME_FORMAT).to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must not be empty.")]
    TitleEmpty,
    #[error("Title must be at least 3 characters.")]
    TitleTooShort,
    #[error("A date must be selected.")]
    DateMissing,
    #[error("Date must look like YYYY-MM-DD.")]
    DateInvalid,
    #[error("Time must look like HH:MM.")]
    TimeInvalid,
    #[error("A priority must be selected.")]
    PriorityMissing,
}

/// Outcome of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated {
    Ready(AgendaEntry),
    /// The moment is already in the past; save only after the user confirms.
    NeedsConfirmation(AgendaEntry),
}

impl Validated {
    pub fn entry(&self) -> &AgendaEntry {
        match self {
            Validated::Ready(entry) | Validated::NeedsConfirmation(entry) => entry,
        }
    }

    pub fn into_entry(self) -> AgendaEntry {
        match self {
            Validated::Ready(entry) | Validated::NeedsConfirmation(entry) => entry,
        }
    }
}

/// Check `draft` against the form rules and build the entry to persist.
///
/// The past-time check compares against `now` once; it is not repeated when the
/// entry is finally written.
pub fn validate(draft: &AgendaDraft, now: NaiveDateTime) -> Result<Validated, ValidationError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleEmpty);
    }
    if title.chars().count() < MIN_TITLE_CHARS {
        return Err(ValidationError::TitleTooShort);
    }

    let date = draft.date.trim();
    if date.is_empty() {
        return Err(ValidationError::DateMissing);
    }
    let date = NaiveDate::parse_from_str(date, FORM_DATE_FORMAT)
        .map_err(|_| ValidationError::DateInvalid)?;

    let time = match draft.time.trim() {
        "" => NaiveTime::MIN,
        raw => NaiveTime::parse_from_str(raw, FORM_TIME_FORMAT)
            .map_err(|_| ValidationError::TimeInvalid)?,
    };

    let priority = draft.priority.ok_or(ValidationError::PriorityMissing)?;

    let mut entry = AgendaEntry::new(
        title,
        draft.description.trim(),
        date.and_time(time),
        priority,
    );
    entry.id = draft.id.unwrap_or(UNSAVED_ID);

    if entry.scheduled_at < truncate_to_seconds(now) {
        Ok(Validated::NeedsConfirmation(entry))
    } else {
        Ok(Validated::Ready(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 30)
            .unwrap()
    }

    fn draft(title: &str) -> AgendaDraft {
        AgendaDraft {
            id: None,
            title: title.to_string(),
            description: "  notes  ".to_string(),
            date: "2025-06-02".to_string(),
            time: "09:30".to_string(),
            priority: Some(Priority::Sedang),
        }
    }

    #[test]
    fn rejects_blank_titles() {
        assert_eq!(validate(&draft(""), now()), Err(ValidationError::TitleEmpty));
        assert_eq!(validate(&draft("   "), now()), Err(ValidationError::TitleEmpty));
    }

    #[test]
    fn enforces_minimum_title_length_after_trimming() {
        assert_eq!(validate(&draft("ab"), now()), Err(ValidationError::TitleTooShort));
        assert_eq!(validate(&draft("  ab  "), now()), Err(ValidationError::TitleTooShort));
        assert!(validate(&draft("abc"), now()).is_ok());
    }

    #[test]
    fn first_failing_rule_wins() {
        let mut input = draft("ab");
        input.date.clear();
        input.priority = None;
        assert_eq!(validate(&input, now()), Err(ValidationError::TitleTooShort));

        input.title = "abc".into();
        assert_eq!(validate(&input, now()), Err(ValidationError::DateMissing));

        input.date = "2025-06-02".into();
        assert_eq!(validate(&input, now()), Err(ValidationError::PriorityMissing));
    }

    #[test]
    fn rejects_unparsable_date_and_time() {
        let mut input = draft("Meeting");
        input.date = "02-06-2025".into();
        assert_eq!(validate(&input, now()), Err(ValidationError::DateInvalid));

        input.date = "2025-06-02".into();
        input.time = "9h".into();
        assert_eq!(validate(&input, now()), Err(ValidationError::TimeInvalid));
    }

    #[test]
    fn empty_time_means_midnight() {
        let mut input = draft("Meeting");
        input.time.clear();
        let entry = validate(&input, now()).unwrap().into_entry();
        assert_eq!(entry.time_label(), "00:00");
    }

    #[test]
    fn builds_trimmed_unsaved_entry() {
        let validated = validate(&draft("  Meeting  "), now()).unwrap();
        let Validated::Ready(entry) = validated else {
            panic!("future entry should not need confirmation");
        };
        assert_eq!(entry.id, UNSAVED_ID);
        assert_eq!(entry.title, "Meeting");
        assert_eq!(entry.description, "notes");
        assert_eq!(entry.scheduled_at_text(), "2025-06-02 09:30:00");
        assert_eq!(entry.priority, Priority::Sedang);
    }

    #[test]
    fn keeps_id_when_editing() {
        let mut input = draft("Meeting");
        input.id = Some(42);
        assert_eq!(validate(&input, now()).unwrap().entry().id, 42);
    }

    #[test]
    fn past_moments_need_confirmation() {
        let mut input = draft("Meeting");
        input.date = "2025-06-01".into();
        input.time = "11:59".into();
        assert!(matches!(
            validate(&input, now()),
            Ok(Validated::NeedsConfirmation(_))
        ));

        input.time = "12:01".into();
        assert!(matches!(validate(&input, now()), Ok(Validated::Ready(_))));
    }

    #[test]
    fn from_entry_round_trips_through_validation() {
        let entry = validate(&draft("Meeting"), now()).unwrap().into_entry();
        let stored = AgendaEntry { id: 7, ..entry };
        let again = validate(&AgendaDraft::from_entry(&stored), now())
            .unwrap()
            .into_entry();
        assert_eq!(again, stored);
    }
}
