//! The Gemini `generateContent` call for tennis stroke analysis.
//!
//! One POST per workflow run: prompt text plus the video as an inline
//! base64 part, JSON output requested, strict safety thresholds. No
//! retries and no explicit timeout; a hung call is bounded only by the
//! transport itself.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::prompts::stroke_analysis_prompt;
use super::types::StrokeReport;
use crate::error::CoachError;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Harm categories blocked at low-and-above severity on every request.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HARASSMENT",
];
const BLOCK_THRESHOLD: &str = "BLOCK_LOW_AND_ABOVE";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Run one stroke analysis against the Gemini API.
///
/// Never issues a request when the credential is empty: the caller gets
/// the missing-key error before any network activity.
pub async fn analyze_video(
    api_key: &str,
    video_base64: &str,
    mime_type: &str,
) -> Result<StrokeReport, CoachError> {
    if api_key.trim().is_empty() {
        return Err(CoachError::MissingApiKey);
    }

    info!(
        "Requesting stroke analysis for a {} upload ({} base64 chars)",
        mime_type,
        video_base64.len()
    );

    let request = build_request(video_base64, mime_type);
    let url = format!("{}/{}:generateContent", BASE_URL, DEFAULT_MODEL);

    let response = reqwest::Client::new()
        .post(&url)
        .query(&[("key", api_key)])
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            error!("Gemini request failed before a response arrived: {}", e);
            CoachError::Request(e.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        return Err(map_http_error(status, &body));
    }

    let body_text = response
        .text()
        .await
        .map_err(|e| CoachError::Request(format!("failed to read response body: {}", e)))?;

    let parsed: GenerateContentResponse = serde_json::from_str(&body_text).map_err(|e| {
        error!("Unexpected Gemini response wrapper: {}", e);
        CoachError::MalformedReport(format!("unexpected response wrapper: {}", e))
    })?;

    let text = extract_text(parsed).ok_or(CoachError::EmptyResponse)?;
    parse_report(&text)
}

fn build_request(video_base64: &str, mime_type: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text {
                    text: stroke_analysis_prompt().to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.to_string(),
                        data: video_base64.to_string(),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
        },
        safety_settings: SAFETY_CATEGORIES
            .iter()
            .map(|category| SafetySetting {
                category: category.to_string(),
                threshold: BLOCK_THRESHOLD.to_string(),
            })
            .collect(),
    }
}

/// Map a non-success status to an error carrying the service-provided
/// message when the body held one, else a generic status line.
fn map_http_error(status: StatusCode, body: &str) -> CoachError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .unwrap_or_else(|| format!("Gemini API error: {}", status));
    error!("Gemini API returned {}: {}", status, message);
    CoachError::Api {
        status: status.as_u16(),
        message,
    }
}

/// First text part of the first candidate, if the response carried one.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|part| part.text)
}

/// Strip a surrounding markdown code fence, if any, then parse the
/// model's answer into a report. Fails closed on anything unexpected;
/// no deeper recovery is attempted.
pub(crate) fn parse_report(text: &str) -> Result<StrokeReport, CoachError> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(cleaned).map_err(|e| {
        let echo: String = cleaned.chars().take(200).collect();
        error!("Analysis JSON did not parse: {} (text started: {})", e, echo);
        CoachError::MalformedReport(format!("{} (got: {})", e, echo))
    })
}

/// Remove a ```json ... ``` wrapper. The opening fence may carry a
/// language tag, with or without a newline after it; a missing closing
/// fence is tolerated.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // The tag is alphabetic and the payload is JSON, so eating leading
    // letters never touches the payload itself.
    let rest = rest
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .trim_start();
    let rest = rest.trim_end();
    rest.strip_suffix("```").map(str::trim_end).unwrap_or(rest)
}
