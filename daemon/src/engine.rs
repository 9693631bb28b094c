//! Typing engine: drives one session's text into the keystroke sink.
//!
//! The engine is the only writer of the session's progress fields. Per
//! character it:
//! - honours a pending stop request
//! - checks the foreground window every few characters and pauses on change
//! - optionally types an adjacent-key typo and corrects it
//! - types the character and advances the cursor
//! - waits the humanized delay, plus thinking and paragraph pauses
//!
//! Pausing is cooperative: sleeps are never cut short, so a stop is observed
//! at the next character boundary.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::delay::{self, ParagraphTracker, PARAGRAPH_PAUSE};
use crate::feedback::{Feedback, FeedbackEvent};
use crate::focus::{self, FocusOracle};
use crate::inject::{Key, Keystroke, KeystrokeSink};
use crate::session::{PauseReason, SessionOutcome, SharedSession};
use crate::settings::TypingSettings;
use crate::typo;

/// Log progress every this many characters.
const PROGRESS_EVERY: usize = 100;

/// Keystroke sink shared between sessions; held by one engine at a time.
pub type SharedKeyboard = Arc<Mutex<Box<dyn KeystrokeSink>>>;

/// Engine timing that is fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineTiming {
    pub countdown: Duration,
    pub focus_check_every: usize,
    pub focus_grace: Duration,
    pub resume_poll: Duration,
}

impl From<&SessionConfig> for EngineTiming {
    fn from(config: &SessionConfig) -> Self {
        Self {
            countdown: config.countdown(),
            focus_check_every: config.focus_check_every,
            focus_grace: config.focus_grace(),
            resume_poll: config.resume_poll(),
        }
    }
}

impl Default for EngineTiming {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

/// Result of waiting while paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Resumed,
    Stopped,
}

/// One typing session's worth of engine state.
pub struct TypingEngine {
    session: SharedSession,
    keyboard: SharedKeyboard,
    focus: Arc<dyn FocusOracle>,
    feedback: Arc<dyn Feedback>,
    timing: EngineTiming,
    rng: StdRng,
}

impl TypingEngine {
    pub fn new(
        session: SharedSession,
        keyboard: SharedKeyboard,
        focus: Arc<dyn FocusOracle>,
        feedback: Arc<dyn Feedback>,
        timing: EngineTiming,
    ) -> Self {
        Self {
            session,
            keyboard,
            focus,
            feedback,
            timing,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Use a fixed seed for reproducible delays and typos.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Type the session's text to completion or until stopped.
    ///
    /// The session must already have been started with
    /// [`SessionState::begin`](crate::session::SessionState::begin).
    pub async fn run(mut self) -> SessionOutcome {
        let text = self.session.lock().await.text.clone();
        let keyboard = Arc::clone(&self.keyboard);
        let mut keyboard = keyboard.lock().await;

        let outcome = self.type_text(&text, &mut **keyboard).await;

        let (position, mistakes) = {
            let mut state = self.session.lock().await;
            state.finish(outcome);
            (state.cursor, state.mistakes)
        };
        match outcome {
            SessionOutcome::Completed => self.feedback.notify(&FeedbackEvent::Completed {
                typed: position,
                mistakes,
            }),
            SessionOutcome::Stopped => self.feedback.notify(&FeedbackEvent::Stopped { position }),
        }
        outcome
    }

    async fn type_text(
        &mut self,
        text: &[char],
        keyboard: &mut dyn KeystrokeSink,
    ) -> SessionOutcome {
        self.feedback.notify(&FeedbackEvent::Started {
            length: text.len(),
        });

        if self.countdown().await == Some(Wake::Stopped) {
            return SessionOutcome::Stopped;
        }

        let mut target = focus::capture_target(self.focus.as_ref());
        match &target {
            Some(title) => info!(window = %title, "Tracking target window"),
            None => debug!("Focus tracking unavailable for this session"),
        }

        let mut paragraphs = ParagraphTracker::new();

        for (i, &c) in text.iter().enumerate() {
            if self.session.lock().await.stop_requested {
                return SessionOutcome::Stopped;
            }

            if target.is_some()
                && self.focus_check_due(i).await
                && let Some(actual) = target
                    .as_deref()
                    .and_then(|expected| focus::focus_lost(self.focus.as_ref(), expected))
            {
                let expected = target.take().unwrap_or_default();
                self.pause_for_focus_loss(i, expected, actual).await;
                if self.wait_for_resume().await == Wake::Stopped {
                    return SessionOutcome::Stopped;
                }
                self.feedback.notify(&FeedbackEvent::Resumed { position: i });
                if self.countdown().await == Some(Wake::Stopped) {
                    return SessionOutcome::Stopped;
                }
                target = focus::capture_target(self.focus.as_ref());
            }

            let settings = self.settings().await;
            if let Some(wrong) = typo::pick_mistake(c, &settings, &mut self.rng) {
                self.make_mistake(i, wrong, &settings, keyboard).await;
            }

            if let Some(stroke) = Keystroke::for_char(c)
                && let Err(e) = keyboard.send(stroke)
            {
                warn!(position = i, error = %e, "Keystroke failed, continuing");
            }

            let mistakes = {
                let mut state = self.session.lock().await;
                state.cursor = i + 1;
                state.mistakes
            };

            if (i + 1) % PROGRESS_EVERY == 0 {
                self.feedback.notify(&FeedbackEvent::Progress {
                    position: i + 1,
                    total: text.len(),
                    mistakes,
                });
            }

            let settings = self.settings().await;
            let extra = delay::extra_pause(c, &settings, &mut self.rng);
            if settings.thinking_pause && delay::is_thinking_punctuation(c) {
                self.feedback.notify(&FeedbackEvent::ThinkingPause {
                    position: i,
                    pause: extra,
                });
            }
            tokio::time::sleep(delay::calculate_delay(&settings, &mut self.rng) + extra).await;

            if paragraphs.observe(c, settings.paragraph_break_every) {
                self.feedback.notify(&FeedbackEvent::ParagraphPause {
                    paragraph: paragraphs.paragraphs(),
                    position: i + 1,
                });
                tokio::time::sleep(PARAGRAPH_PAUSE).await;
            }
        }

        SessionOutcome::Completed
    }

    async fn settings(&self) -> TypingSettings {
        self.session.lock().await.settings.clone()
    }

    /// Count down before typing. Returns `Some(Stopped)` if a stop arrived.
    async fn countdown(&self) -> Option<Wake> {
        for remaining in (1..=self.timing.countdown.as_secs()).rev() {
            if self.session.lock().await.stop_requested {
                return Some(Wake::Stopped);
            }
            self.feedback.notify(&FeedbackEvent::Countdown { remaining });
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        None
    }

    async fn focus_check_due(&self, index: usize) -> bool {
        let every = self.timing.focus_check_every;
        if index == 0 || every == 0 || index % every != 0 {
            return false;
        }
        let state = self.session.lock().await;
        !state.in_focus_grace(Instant::now(), self.timing.focus_grace)
    }

    async fn pause_for_focus_loss(&self, position: usize, expected: String, actual: String) {
        self.session.lock().await.pause(PauseReason::FocusLost);
        self.feedback.notify(&FeedbackEvent::FocusLost {
            expected,
            actual,
            position,
        });
    }

    /// Poll for resume or stop, waking early on a control-plane signal.
    async fn wait_for_resume(&self) -> Wake {
        loop {
            {
                let mut state = self.session.lock().await;
                if state.stop_requested {
                    return Wake::Stopped;
                }
                if state.resume_requested {
                    state.resume_requested = false;
                    return Wake::Resumed;
                }
            }
            self.session.wait_for_signal(self.timing.resume_poll).await;
        }
    }

    /// Type `wrong`, notice it, and erase it.
    async fn make_mistake(
        &mut self,
        position: usize,
        wrong: char,
        settings: &TypingSettings,
        keyboard: &mut dyn KeystrokeSink,
    ) {
        if let Err(e) = keyboard.send_char(wrong) {
            warn!(position, error = %e, "Typo keystroke failed, skipping correction");
            return;
        }
        self.feedback.notify(&FeedbackEvent::Mistake { position, wrong });

        let pause = delay::calculate_delay(settings, &mut self.rng);
        tokio::time::sleep(pause + delay::realization_delay(&mut self.rng)).await;

        if let Err(e) = keyboard.send_key(Key::Backspace) {
            warn!(position, error = %e, "Correction backspace failed");
        }
        self.session.lock().await.mistakes += 1;

        tokio::time::sleep(pause.mul_f64(1.5)).await;
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
