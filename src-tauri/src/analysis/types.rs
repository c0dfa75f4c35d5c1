//! Type definitions for the stroke analysis result.
//!
//! Wire names are camelCase to match the JSON shape the model is asked
//! to produce.

use serde::{Deserialize, Serialize};

/// Scores for one stroke category. Each metric is 0-100, or absent when
/// the model could not judge it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeScores {
    pub power_score: Option<u8>,
    pub technique_score: Option<u8>,
    pub consistency_score: Option<u8>,
}

/// Structured result of one video analysis.
///
/// A stroke key that is null or missing means the stroke was not
/// detected in the video. `analysis` and `tips` default to empty when
/// the model leaves them out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeReport {
    #[serde(default)]
    pub forehand: Option<StrokeScores>,
    #[serde(default)]
    pub backhand: Option<StrokeScores>,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub tips: Vec<String>,
}
