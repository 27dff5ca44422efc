//! SQLite persistence for agenda entries.

mod agenda;
mod connection;

pub use agenda::AgendaStore;
