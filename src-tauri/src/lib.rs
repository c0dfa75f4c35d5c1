pub mod analysis;
mod commands;
mod error;
pub mod session;

use std::sync::Mutex;

use tauri::{Emitter, Manager};
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub use analysis::{StrokeReport, StrokeScores};
pub use error::CoachError;
pub use session::{Session, SessionStore};

/// Shared application state: the session store behind a lock.
pub struct CoachState {
    pub store: Mutex<SessionStore>,
}

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .setup(|app| {
            let data_dir = app.path().app_data_dir()?;
            let mut store = SessionStore::open(&data_dir.join("sessions.json"))?;

            let handle = app.handle().clone();
            store.subscribe(move |sessions| {
                if let Err(e) = handle.emit("sessions-changed", sessions.len()) {
                    warn!("Failed to emit sessions-changed: {}", e);
                }
            });

            app.manage(CoachState {
                store: Mutex::new(store),
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::analyze::analyze_video,
            commands::sessions::list_sessions,
            commands::sessions::select_session,
            commands::sessions::active_session,
            commands::credential::get_api_key,
            commands::credential::set_api_key,
            commands::credential::delete_api_key,
            commands::config::get_preference,
            commands::config::set_preference,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
