//! The fixed instruction prompt for stroke analysis.

/// Prompt sent with every uploaded video.
///
/// The JSON response format is already pinned by `responseMimeType` in
/// the request; the prompt restates the shape because the model still
/// occasionally wraps its answer in a markdown code fence.
pub fn stroke_analysis_prompt() -> &'static str {
    r#"Analyze this tennis video for forehand and backhand strokes if present.
Return a JSON object with these keys:
- forehand: {"powerScore": 0-100 or null if not present, "techniqueScore": 0-100 or null, "consistencyScore": 0-100 or null}
- backhand: same shape as forehand, with null scores when the stroke is not present
- analysis: detailed coaching feedback covering every detected stroke
- tips: exactly 3 short bullet points for improvement

If a stroke type does not appear in the video at all, set its key to null.
Respond with the JSON object only."#
}
