//! Control-plane error kinds.

use thiserror::Error;

/// Failures reported synchronously to control-plane callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A session is already running or paused.
    #[error("Already typing")]
    SessionBusy,
    /// Start requested with no text.
    #[error("No text")]
    EmptyText,
    /// Stop or resume requested with no active session.
    #[error("Not typing")]
    NotTyping,
    /// Restart requested before any text was ever submitted.
    #[error("No previous session")]
    NoPreviousSession,
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}
