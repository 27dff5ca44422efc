//! JSON export and import of the whole agenda.
//!
//! Exports are wrapped in an envelope carrying the export date, entry count and
//! format version. Imports accept that envelope or a bare array of entries, and
//! always insert fresh rows: ids found in the file are discarded.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::db::AgendaStore;
use crate::error::InterchangeError;
use crate::models::{format_datetime, parse_datetime, AgendaEntry, Priority};
use crate::validation::MIN_TITLE_CHARS;

/// Format version written into every export.
pub const APP_VERSION: &str = "1.0";
/// Extension appended to export paths that lack it.
pub const JSON_EXTENSION: &str = "json";

/// One agenda entry as it appears in JSON files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "judul", default)]
    pub title: Option<String>,
    #[serde(rename = "deskripsi", default)]
    pub description: Option<String>,
    /// `yyyy-MM-dd HH:mm:ss`, local wall-clock time.
    #[serde(rename = "tanggalWaktu", default)]
    pub scheduled_at: Option<String>,
    #[serde(rename = "prioritas", default)]
    pub priority: Option<String>,
}

impl From<&AgendaEntry> for EntryRecord {
    fn from(entry: &AgendaEntry) -> Self {
        Self {
            id: Some(entry.id),
            title: Some(entry.title.clone()),
            description: Some(entry.description.clone()),
            scheduled_at: Some(format_datetime(&entry.scheduled_at)),
            priority: Some(entry.priority.label().to_string()),
        }
    }
}

/// Why a single imported record could not become an entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("title is missing or shorter than {min} characters", min = MIN_TITLE_CHARS)]
    Title,
    #[error("date/time is missing")]
    MissingSchedule,
    #[error("date/time `{0}` is not yyyy-MM-dd HH:mm:ss")]
    InvalidSchedule(String),
    #[error("priority is missing")]
    MissingPriority,
    #[error(transparent)]
    UnknownPriority(#[from] crate::models::UnknownPriority),
}

impl TryFrom<EntryRecord> for AgendaEntry {
    type Error = RecordError;

    /// The resulting entry is always unsaved; the record's id is dropped.
    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let title = record.title.unwrap_or_default();
        let title = title.trim();
        if title.chars().count() < MIN_TITLE_CHARS {
            return Err(RecordError::Title);
        }

        let raw_schedule = record.scheduled_at.ok_or(RecordError::MissingSchedule)?;
        let scheduled_at = parse_datetime(&raw_schedule)
            .map_err(|_| RecordError::InvalidSchedule(raw_schedule.clone()))?;

        let priority = record
            .priority
            .ok_or(RecordError::MissingPriority)?
            .trim()
            .parse::<Priority>()?;

        Ok(AgendaEntry::new(
            title,
            record.description.unwrap_or_default(),
            scheduled_at,
            priority,
        ))
    }
}

/// Metadata wrapper around an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    #[serde(default)]
    pub export_date: String,
    #[serde(default)]
    pub total_agenda: usize,
    #[serde(default)]
    pub app_version: String,
    pub agenda_list: Vec<EntryRecord>,
}

impl ExportEnvelope {
    pub fn new(entries: &[AgendaEntry], now: NaiveDateTime) -> Self {
        Self {
            export_date: format_datetime(&now),
            total_agenda: entries.len(),
            app_version: APP_VERSION.to_string(),
            agenda_list: entries.iter().map(EntryRecord::from).collect(),
        }
    }
}

/// The two accepted file shapes, tried in declaration order: the envelope
/// first, a bare list only if the envelope does not decode.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportShape {
    Envelope(ExportEnvelope),
    Bare(Vec<EntryRecord>),
}

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// `agenda_export_yyyyMMdd_HHmmss.json`
pub fn default_export_file_name(now: NaiveDateTime) -> String {
    format!(
        "agenda_export_{}.{JSON_EXTENSION}",
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Append `.json` unless the file name already ends with it (any case).
pub fn ensure_json_extension(path: &Path) -> PathBuf {
    let has_extension = path
        .file_name()
        .map(|name| {
            name.to_string_lossy()
                .to_lowercase()
                .ends_with(&format!(".{JSON_EXTENSION}"))
        })
        .unwrap_or(false);

    if has_extension {
        path.to_path_buf()
    } else {
        let mut raw = path.as_os_str().to_owned();
        raw.push(format!(".{JSON_EXTENSION}"));
        PathBuf::from(raw)
    }
}

/// Write `entries` as a pretty-printed envelope. Returns the path actually
/// written, which may have gained a `.json` suffix.
pub fn export_to_path(
    entries: &[AgendaEntry],
    path: &Path,
    now: NaiveDateTime,
) -> Result<PathBuf, InterchangeError> {
    let path = ensure_json_extension(path);
    let envelope = ExportEnvelope::new(entries, now);
    let json = serde_json::to_string_pretty(&envelope).map_err(InterchangeError::Encode)?;

    fs::write(&path, json).map_err(|source| InterchangeError::Write {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), total = entries.len(), "agenda exported");
    Ok(path)
}

/// Decode an export. Either shape is accepted; anything else is rejected as a
/// whole, never as a partial list.
pub fn parse_import(text: &str) -> Result<Vec<EntryRecord>, InterchangeError> {
    let shape: ImportShape =
        serde_json::from_str(text).map_err(|source| InterchangeError::Malformed { source })?;

    Ok(match shape {
        ImportShape::Envelope(envelope) => {
            info!(
                export_date = %envelope.export_date,
                total = envelope.total_agenda,
                version = %envelope.app_version,
                "reading agenda export"
            );
            envelope.agenda_list
        }
        ImportShape::Bare(records) => {
            info!(total = records.len(), "reading plain agenda list");
            records
        }
    })
}

pub fn import_from_path(path: &Path) -> Result<Vec<EntryRecord>, InterchangeError> {
    let text = fs::read_to_string(path).map_err(|source| InterchangeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_import(&text)
}

/// Insert every record as a new row. Records that do not convert, and rows the
/// store refuses, are counted as failed; the rest of the import continues.
pub fn import_into_store(store: &mut AgendaStore, records: Vec<EntryRecord>) -> ImportReport {
    let mut report = ImportReport::default();

    for (index, record) in records.into_iter().enumerate() {
        let outcome = AgendaEntry::try_from(record)
            .map_err(anyhow::Error::from)
            .and_then(|entry| store.create(&entry).map_err(anyhow::Error::from));

        match outcome {
            Ok(_) => report.succeeded += 1,
            Err(err) => {
                warn!(index, error = %err, "skipping imported agenda");
                report.failed += 1;
            }
        }
    }

    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "agenda import finished"
    );
    report
}
