//! Gemini-backed stroke analysis for uploaded tennis videos.

pub mod gemini;
pub mod prompts;
pub mod types;

pub use gemini::analyze_video;
pub use types::{StrokeReport, StrokeScores};
