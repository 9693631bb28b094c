//! Shared state of the typing session.
//!
//! The engine task and the control plane both go through [`SharedSession`];
//! every multi-field read or write happens under its single lock.

use std::sync::Arc;
use std::time::Duration;

use human_typer_proto::SettingsPatch;
use tokio::sync::{Mutex, MutexGuard, Notify};
use tokio::time::Instant;

use crate::error::SessionError;
use crate::settings::TypingSettings;

/// Maximum characters in the typed / remaining views of a status snapshot.
pub const VIEW_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    FocusLost,
}

/// How a session terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Stopped,
}

/// The in-flight session record plus its control signals.
#[derive(Debug)]
pub struct SessionState {
    pub is_typing: bool,
    pub is_paused: bool,
    pub pause_reason: Option<PauseReason>,
    /// Index of the next character to type.
    pub cursor: usize,
    pub text: Arc<[char]>,
    pub settings: TypingSettings,
    pub interruption_count: u32,
    pub mistakes: u32,
    /// Sticky until the engine terminates.
    pub stop_requested: bool,
    /// Cleared by the engine once observed.
    pub resume_requested: bool,
    pub settings_updated_at: Option<Instant>,
    pub last_outcome: Option<SessionOutcome>,
}

impl SessionState {
    pub fn new(settings: TypingSettings) -> Self {
        Self {
            is_typing: false,
            is_paused: false,
            pause_reason: None,
            cursor: 0,
            text: Arc::from(Vec::<char>::new()),
            settings,
            interruption_count: 0,
            mistakes: 0,
            stop_requested: false,
            resume_requested: false,
            settings_updated_at: None,
            last_outcome: None,
        }
    }

    /// Reset for a new session over `text`.
    pub fn begin(&mut self, text: Arc<[char]>, settings: TypingSettings) {
        self.is_typing = true;
        self.is_paused = false;
        self.pause_reason = None;
        self.cursor = 0;
        self.text = text;
        self.settings = settings;
        self.interruption_count = 0;
        self.mistakes = 0;
        self.stop_requested = false;
        self.resume_requested = false;
        self.settings_updated_at = None;
        self.last_outcome = None;
    }

    /// Mark the session terminated and consume pending signals.
    pub fn finish(&mut self, outcome: SessionOutcome) {
        self.is_typing = false;
        self.is_paused = false;
        self.pause_reason = None;
        self.stop_requested = false;
        self.resume_requested = false;
        self.last_outcome = Some(outcome);
    }

    pub fn pause(&mut self, reason: PauseReason) {
        self.is_paused = true;
        self.pause_reason = Some(reason);
        self.resume_requested = false;
        self.interruption_count += 1;
    }

    pub fn request_stop(&mut self) -> Result<(), SessionError> {
        if !self.is_typing {
            return Err(SessionError::NotTyping);
        }
        self.stop_requested = true;
        Ok(())
    }

    /// Clear the pause and raise the resume signal. Returns the resume position.
    ///
    /// A running, unpaused session is left untouched.
    pub fn request_resume(&mut self) -> Result<usize, SessionError> {
        if !self.is_typing {
            return Err(SessionError::NotTyping);
        }
        if self.is_paused {
            self.is_paused = false;
            self.pause_reason = None;
            self.resume_requested = true;
        }
        Ok(self.cursor)
    }

    /// Merge `patch` into the live settings and start the focus grace period.
    pub fn update_settings(
        &mut self,
        patch: &SettingsPatch,
        now: Instant,
    ) -> Result<TypingSettings, SessionError> {
        self.settings = self.settings.merged(patch)?;
        self.settings_updated_at = Some(now);
        Ok(self.settings.clone())
    }

    /// Whether a settings update happened less than `grace` before `now`.
    pub fn in_focus_grace(&self, now: Instant, grace: Duration) -> bool {
        self.settings_updated_at
            .is_some_and(|at| now.saturating_duration_since(at) < grace)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let cursor = self.cursor.min(self.text.len());
        let typed_from = cursor.saturating_sub(VIEW_LIMIT);
        let remaining_to = (cursor + VIEW_LIMIT).min(self.text.len());
        StatusSnapshot {
            is_typing: self.is_typing,
            is_paused: self.is_paused,
            pause_reason: self.pause_reason,
            cursor,
            total: self.text.len(),
            typed_so_far: self.text[typed_from..cursor].iter().collect(),
            remaining: self.text[cursor..remaining_to].iter().collect(),
            interruptions: self.interruption_count,
            mistakes: self.mistakes,
            settings: self.settings.clone(),
            last_outcome: self.last_outcome,
        }
    }
}

/// Point-in-time copy of [`SessionState`] for the control plane.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub is_typing: bool,
    pub is_paused: bool,
    pub pause_reason: Option<PauseReason>,
    pub cursor: usize,
    pub total: usize,
    pub typed_so_far: String,
    pub remaining: String,
    pub interruptions: u32,
    pub mistakes: u32,
    pub settings: TypingSettings,
    pub last_outcome: Option<SessionOutcome>,
}

impl StatusSnapshot {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.cursor as f64 / self.total as f64 * 100.0
    }
}

/// Lock-guarded session state plus a wake-up for a paused engine.
#[derive(Clone)]
pub struct SharedSession {
    state: Arc<Mutex<SessionState>>,
    wake: Arc<Notify>,
}

impl SharedSession {
    pub fn new(settings: TypingSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new(settings))),
            wake: Arc::new(Notify::new()),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Wake the engine if it is waiting for a signal.
    pub fn wake(&self) {
        self.wake.notify_one();
    }

    /// Wait for [`wake`](Self::wake) or until `timeout` elapses.
    pub async fn wait_for_signal(&self, timeout: Duration) {
        let _ = tokio::time::timeout(timeout, self.wake.notified()).await;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
