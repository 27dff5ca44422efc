//! Core library surface for the agenda manager TUI.
//!
//! The `bin` target only wires configuration, logging and the store together;
//! everything it drives lives behind these modules so integration tests can
//! exercise the same code paths.
pub mod config;
pub mod db;
pub mod debounce;
pub mod error;
pub mod interchange;
pub mod logging;
pub mod models;
pub mod search;
pub mod ui;
pub mod validation;

pub use config::AppConfig;
pub use db::AgendaStore;
pub use error::{InterchangeError, StoreError};

/// The entity every other layer manipulates.
pub use models::{AgendaEntry, Priority};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
