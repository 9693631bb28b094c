//! JSON wire types for the human-typer HTTP control surface.
//!
//! Shared by the daemon (serialization) and the clients (deserialization).
//! Field names follow the browser client: camelCase keys, percent units
//! for `variance` and `mistakeRate`.

use serde::{Deserialize, Serialize};

/// Default port of the local control surface.
pub const DEFAULT_PORT: u16 = 8765;

/// Pause reason reported while a session is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PauseReason {
    FocusLost,
}

/// How the most recent session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Stopped,
}

/// Typing settings as exchanged over the wire.
///
/// Every field is optional on input: missing fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wpm: Option<f64>,
    /// Variance in percent, `[0, 100)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<f64>,
    /// Mistake rate in percent, `[0, 100]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mistake_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_pause: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_correction: Option<bool>,
    /// Pause after every N paragraphs, 0 disables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_breaks: Option<u32>,
}

/// Fully resolved settings reported back to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub wpm: f64,
    pub variance: f64,
    pub mistake_rate: f64,
    pub thinking_pause: bool,
    pub self_correction: bool,
    pub paragraph_breaks: u32,
}

/// `POST /type` request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub settings: SettingsPatch,
}

/// `POST /type` and `POST /restart` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeResponse {
    pub success: bool,
    pub text_length: usize,
    pub message: String,
}

/// `POST /stop` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopResponse {
    pub success: bool,
    pub message: String,
}

/// `POST /resume` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeResponse {
    pub success: bool,
    pub resume_position: usize,
}

/// `POST /update-settings` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsResponse {
    pub success: bool,
    pub current_settings: Settings,
}

/// Failure body shared by all endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Progress block of `GET /status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub percentage: f64,
    pub typed_so_far: String,
    pub remaining: String,
}

/// Counters of `GET /status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub interruptions: u32,
    pub mistakes: u32,
}

/// `GET /status` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub is_typing: bool,
    pub paused: bool,
    pub progress: Progress,
    pub pause_reason: Option<PauseReason>,
    pub stats: Stats,
    pub last_outcome: Option<Outcome>,
    pub settings: Settings,
}

/// Optional capabilities advertised by `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    pub window_tracking: bool,
    pub sound_alerts: bool,
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub timestamp: String,
    pub features: Features,
}
