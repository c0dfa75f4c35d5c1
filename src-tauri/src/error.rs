use thiserror::Error;

/// Errors raised by the analysis workflow and the session store.
///
/// Every kind is surfaced to the user as a plain message at the command
/// boundary; nothing is retried and nothing is fatal to the app.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("No Gemini API key configured. Add one in Settings before uploading.")]
    MissingApiKey,

    #[error("Invalid video payload: {0}")]
    InvalidPayload(String),

    #[error("Gemini request failed: {0}")]
    Request(String),

    /// Non-success HTTP status from the inference endpoint. The display
    /// text is the service-provided message verbatim when the body
    /// carried one.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Gemini returned no analysis text")]
    EmptyResponse,

    #[error("Failed to parse analysis JSON: {0}")]
    MalformedReport(String),

    #[error("Session store error: {0}")]
    Store(String),
}

impl From<CoachError> for String {
    fn from(err: CoachError) -> Self {
        err.to_string()
    }
}
