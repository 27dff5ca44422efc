use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use tracing::Level;

/// SQLite file name, resolved against the working directory.
const DB_FILE_NAME: &str = "agenda.db";
/// Log file name stored inside the application data directory.
const LOG_FILE_NAME: &str = "agenda.log";
/// Quiet period after the last keystroke before the search runs.
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
/// Upper bound on how long the event loop waits for input before redrawing.
const TICK_RATE: Duration = Duration::from_millis(250);

/// Runtime settings. Everything has a fixed default; nothing is read from the
/// environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub log_path: PathBuf,
    /// Directory used to pre-fill export and import prompts.
    pub export_dir: PathBuf,
    pub search_debounce: Duration,
    pub tick_rate: Duration,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DB_FILE_NAME),
            log_path: default_log_path(),
            export_dir: PathBuf::from("."),
            search_debounce: SEARCH_DEBOUNCE,
            tick_rate: TICK_RATE,
            log_level: Level::INFO,
        }
    }
}

/// `<platform data dir>/agenda-manager/agenda.log`, or `agenda.log` in the
/// working directory when the platform has no home directory.
fn default_log_path() -> PathBuf {
    ProjectDirs::from("", "", "agenda-manager")
        .map(|dirs| dirs.data_dir().join(LOG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
}
