//! Binary entry point: load settings, start logging, open the agenda database
//! and drive the Ratatui event loop until the user exits.
use agenda_manager::{logging, run_app, AgendaStore, App, AppConfig};
use tracing::{error, info};

/// A database that cannot be opened is not fatal. The UI starts on a detached
/// store and every query reports the failure in the status line instead.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::default();
    logging::init(&config)?;
    info!(database = %config.database_path.display(), "starting agenda manager");

    let store = match AgendaStore::open(&config.database_path) {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "failed to open agenda database");
            AgendaStore::detached(&config.database_path)
        }
    };

    let mut app = App::new(store, config);
    let result = run_app(&mut app);

    let mut store = app.into_store();
    if let Err(err) = store.close() {
        error!(error = %err, "failed to close agenda database");
    }
    info!("agenda manager stopped");
    result
}
