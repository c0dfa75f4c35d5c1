//! The session record: one analyzed upload with its video and report.

use serde::{Deserialize, Serialize};

use crate::analysis::{StrokeReport, StrokeScores};

/// One completed analysis run.
///
/// `video_data` is a full data URI so the frontend can feed it straight
/// into a `<video>` element without another conversion step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub date: String,
    pub video_data: String,
    #[serde(default)]
    pub forehand: Option<StrokeScores>,
    #[serde(default)]
    pub backhand: Option<StrokeScores>,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl Session {
    pub fn from_report(id: i64, date: String, video_data: String, report: StrokeReport) -> Self {
        Self {
            id,
            date,
            video_data,
            forehand: report.forehand,
            backhand: report.backhand,
            analysis: report.analysis,
            tips: report.tips,
        }
    }

    /// Overall score shown in the history list: the mean of all six
    /// stroke metrics, counting an absent stroke's metrics as zero.
    pub fn average_score(&self) -> u8 {
        let sum = score_sum(&self.forehand) + score_sum(&self.backhand);
        (sum as f64 / 6.0).round() as u8
    }
}

fn score_sum(scores: &Option<StrokeScores>) -> u32 {
    match scores {
        Some(s) => {
            u32::from(s.power_score.unwrap_or(0))
                + u32::from(s.technique_score.unwrap_or(0))
                + u32::from(s.consistency_score.unwrap_or(0))
        }
        None => 0,
    }
}
