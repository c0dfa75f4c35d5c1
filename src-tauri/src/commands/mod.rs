//! Tauri command handlers exposed to the frontend.

pub mod analyze;
pub mod config;
pub mod credential;
pub mod sessions;
