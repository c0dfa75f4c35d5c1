//! API key commands.
//!
//! The key lives in the session store document next to the history, so
//! get/set/delete is just a thin wrapper around the store.

use tauri::State;
use tracing::info;

use super::analyze::poisoned;
use crate::CoachState;

/// The saved key, or None when no key has been configured.
#[tauri::command]
pub fn get_api_key(state: State<'_, CoachState>) -> Result<Option<String>, String> {
    let store = state.store.lock().map_err(|_| poisoned())?;
    let key = store.api_key();
    Ok((!key.is_empty()).then(|| key.to_string()))
}

#[tauri::command]
pub fn set_api_key(state: State<'_, CoachState>, key: String) -> Result<(), String> {
    let mut store = state.store.lock().map_err(|_| poisoned())?;
    store.set_api_key(&key).map_err(String::from)?;
    info!("API key updated");
    Ok(())
}

#[tauri::command]
pub fn delete_api_key(state: State<'_, CoachState>) -> Result<(), String> {
    let mut store = state.store.lock().map_err(|_| poisoned())?;
    store.set_api_key("").map_err(String::from)?;
    info!("API key removed");
    Ok(())
}
