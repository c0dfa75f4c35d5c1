//! The analysis workflow command: one uploaded video in, one stored
//! session out.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Local, Utc};
use serde::Deserialize;
use tauri::State;
use tracing::info;

use crate::analysis;
use crate::error::CoachError;
use crate::session::Session;
use crate::CoachState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub video_base64: String,
    pub mime_type: String,
}

/// Run the full workflow: validate the payload, call Gemini, store the
/// resulting session and make it the active one.
///
/// The state lock is never held across the network call; the key is
/// cloned out up front and the store is locked again only to record
/// the result.
#[tauri::command]
pub async fn analyze_video(
    state: State<'_, CoachState>,
    request: AnalyzeRequest,
) -> Result<Session, String> {
    let api_key = {
        let store = state.store.lock().map_err(|_| poisoned())?;
        store.api_key().to_string()
    };
    if api_key.is_empty() {
        return Err(CoachError::MissingApiKey.into());
    }

    STANDARD
        .decode(&request.video_base64)
        .map_err(|e| CoachError::InvalidPayload(e.to_string()))?;

    info!("Starting analysis of a {} upload", request.mime_type);
    let report = analysis::analyze_video(&api_key, &request.video_base64, &request.mime_type)
        .await
        .map_err(String::from)?;

    let mut store = state.store.lock().map_err(|_| poisoned())?;
    let id = store.allocate_id(Utc::now().timestamp_millis());
    let date = Local::now().format("%Y-%m-%d").to_string();
    let video_data = video_data_uri(&request.mime_type, &request.video_base64);

    let session = Session::from_report(id, date, video_data, report);
    store.add(session.clone()).map_err(String::from)?;
    store.select(session.id);
    info!("Stored session {} with average score {}", session.id, session.average_score());

    Ok(session)
}

fn video_data_uri(mime_type: &str, base64: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64)
}

pub(crate) fn poisoned() -> String {
    "Session store lock poisoned".to_string()
}
