//! Session list and selection commands.

use tauri::State;
use tracing::info;

use super::analyze::poisoned;
use crate::session::Session;
use crate::CoachState;

/// All stored sessions, newest first.
#[tauri::command]
pub fn list_sessions(state: State<'_, CoachState>) -> Result<Vec<Session>, String> {
    let store = state.store.lock().map_err(|_| poisoned())?;
    Ok(store.sessions().to_vec())
}

/// Make an existing session the active one.
#[tauri::command]
pub fn select_session(state: State<'_, CoachState>, id: i64) -> Result<(), String> {
    let mut store = state.store.lock().map_err(|_| poisoned())?;
    if store.select(id) {
        info!("Selected session {}", id);
        Ok(())
    } else {
        Err(format!("Unknown session id: {}", id))
    }
}

/// The currently selected session, if any.
#[tauri::command]
pub fn active_session(state: State<'_, CoachState>) -> Result<Option<Session>, String> {
    let store = state.store.lock().map_err(|_| poisoned())?;
    Ok(store.selected().cloned())
}
