//! Controller owns the session and launches typing engines.
//!
//! Every control-plane operation validates and mutates the shared session
//! under its lock, then returns immediately; typing itself happens on a
//! spawned engine task.

use std::sync::Arc;

use human_typer_proto::SettingsPatch;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::engine::{EngineTiming, SharedKeyboard, TypingEngine};
use crate::error::SessionError;
use crate::feedback::Feedback;
use crate::focus::FocusOracle;
use crate::inject::KeystrokeSink;
use crate::session::{SessionOutcome, SharedSession, StatusSnapshot};
use crate::settings::TypingSettings;

/// Side-effecting collaborators handed to every engine.
pub struct Collaborators {
    pub keyboard: Box<dyn KeystrokeSink>,
    pub focus: Arc<dyn FocusOracle>,
    pub feedback: Arc<dyn Feedback>,
}

/// Optional capabilities of this daemon instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub window_tracking: bool,
    pub sound_alerts: bool,
}

/// Controller for the single typing session.
pub struct Controller {
    session: SharedSession,
    defaults: TypingSettings,
    timing: EngineTiming,
    keyboard: SharedKeyboard,
    focus: Arc<dyn FocusOracle>,
    feedback: Arc<dyn Feedback>,
    task: Mutex<Option<JoinHandle<SessionOutcome>>>,
    seed: Option<u64>,
}

impl Controller {
    pub fn new(config: &Config, collaborators: Collaborators) -> Self {
        Self {
            session: SharedSession::new(config.typing.clone()),
            defaults: config.typing.clone(),
            timing: EngineTiming::from(&config.session),
            keyboard: Arc::new(Mutex::new(collaborators.keyboard)),
            focus: collaborators.focus,
            feedback: collaborators.feedback,
            task: Mutex::new(None),
            seed: None,
        }
    }

    /// Seed every engine's random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start typing `text` with the configured defaults overridden by `patch`.
    ///
    /// Returns the text length in characters.
    pub async fn start_session(
        &self,
        text: &str,
        patch: &SettingsPatch,
    ) -> Result<usize, SessionError> {
        if text.is_empty() {
            return Err(SessionError::EmptyText);
        }

        let length = {
            let mut state = self.session.lock().await;
            if state.is_typing {
                return Err(SessionError::SessionBusy);
            }
            let settings = self.defaults.merged(patch)?;
            let text: Arc<[char]> = text.chars().collect();
            let length = text.len();
            state.begin(text, settings);
            length
        };

        self.launch().await;
        Ok(length)
    }

    /// Type the previous session's text again with the live settings.
    pub async fn restart_session(&self) -> Result<usize, SessionError> {
        let length = {
            let mut state = self.session.lock().await;
            if state.is_typing {
                return Err(SessionError::SessionBusy);
            }
            if state.text.is_empty() {
                return Err(SessionError::NoPreviousSession);
            }
            let text = Arc::clone(&state.text);
            let settings = state.settings.clone();
            state.begin(text, settings);
            state.text.len()
        };

        info!(length, "Restarting previous session");
        self.launch().await;
        Ok(length)
    }

    async fn launch(&self) {
        let mut engine = TypingEngine::new(
            self.session.clone(),
            Arc::clone(&self.keyboard),
            Arc::clone(&self.focus),
            Arc::clone(&self.feedback),
            self.timing.clone(),
        );
        if let Some(seed) = self.seed {
            engine = engine.with_seed(seed);
        }

        let session = self.session.clone();
        let handle = tokio::spawn(async move {
            match tokio::spawn(engine.run()).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(error = %e, "Typing engine task failed, ending session");
                    session.lock().await.finish(SessionOutcome::Stopped);
                    SessionOutcome::Stopped
                }
            }
        });
        // Any previous engine has already cleared is_typing and is exiting.
        *self.task.lock().await = Some(handle);
    }

    /// Ask the active session to stop at the next character boundary.
    pub async fn stop_session(&self) -> Result<(), SessionError> {
        self.session.lock().await.request_stop()?;
        self.session.wake();
        info!("Stop requested");
        Ok(())
    }

    /// Resume a paused session. Returns the position typing continues from.
    pub async fn resume_session(&self) -> Result<usize, SessionError> {
        let position = self.session.lock().await.request_resume()?;
        self.session.wake();
        info!(position, "Resume requested");
        Ok(position)
    }

    /// Merge `patch` into the live settings, whether or not a session runs.
    pub async fn update_settings(
        &self,
        patch: &SettingsPatch,
    ) -> Result<TypingSettings, SessionError> {
        let settings = self
            .session
            .lock()
            .await
            .update_settings(patch, Instant::now())?;
        info!(wpm = settings.words_per_minute, "Settings updated");
        Ok(settings)
    }

    pub async fn status(&self) -> StatusSnapshot {
        self.session.snapshot().await
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            window_tracking: self.focus.is_supported(),
            sound_alerts: self.feedback.audible(),
        }
    }

    /// Wait for the most recent engine task. `None` if none was launched.
    pub async fn join(&self) -> Option<SessionOutcome> {
        let handle = self.task.lock().await.take()?;
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(error = %e, "Typing engine task failed");
                None
            }
        }
    }

    /// Stop an active session and wait for its engine to finish.
    pub async fn shutdown(&self) {
        if self.stop_session().await.is_ok() {
            info!("Stopping active session for shutdown");
        }
        if let Some(outcome) = self.join().await {
            info!(?outcome, "Engine finished");
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
