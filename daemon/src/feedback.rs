//! User feedback for session milestones.
//!
//! Fire-and-forget: a sink never reports failure back to the engine.

use std::time::Duration;

use tracing::{debug, info, warn};

/// Session milestones worth telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackEvent {
    Started {
        length: usize,
    },
    Countdown {
        remaining: u64,
    },
    FocusLost {
        expected: String,
        actual: String,
        position: usize,
    },
    Resumed {
        position: usize,
    },
    ThinkingPause {
        position: usize,
        pause: Duration,
    },
    ParagraphPause {
        paragraph: u32,
        position: usize,
    },
    Mistake {
        position: usize,
        wrong: char,
    },
    Progress {
        position: usize,
        total: usize,
        mistakes: u32,
    },
    Completed {
        typed: usize,
        mistakes: u32,
    },
    Stopped {
        position: usize,
    },
}

pub trait Feedback: Send + Sync {
    fn notify(&self, event: &FeedbackEvent);

    /// Whether this sink produces sound.
    fn audible(&self) -> bool {
        false
    }
}

/// Reports feedback through the daemon log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn notify(&self, event: &FeedbackEvent) {
        match event {
            FeedbackEvent::Started { length } => {
                info!(length, "Starting typing session");
            }
            FeedbackEvent::Countdown { remaining } => {
                info!(remaining, "Focus your typing field...");
            }
            FeedbackEvent::FocusLost {
                expected,
                actual,
                position,
            } => {
                warn!(%expected, %actual, position, "Focus lost, typing paused");
            }
            FeedbackEvent::Resumed { position } => {
                info!(position, "Typing resumed");
            }
            FeedbackEvent::ThinkingPause { position, pause } => {
                debug!(position, pause_secs = pause.as_secs_f64(), "Thinking pause");
            }
            FeedbackEvent::ParagraphPause {
                paragraph,
                position,
            } => {
                debug!(paragraph, position, "Paragraph pause");
            }
            FeedbackEvent::Mistake { position, wrong } => {
                debug!(position, wrong = ?wrong, "Typo injected");
            }
            FeedbackEvent::Progress {
                position,
                total,
                mistakes,
            } => {
                let percentage = *position as f64 / *total as f64 * 100.0;
                info!(position, total, mistakes, "Progress: {:.1}%", percentage);
            }
            FeedbackEvent::Completed { typed, mistakes } => {
                info!(typed, mistakes, "Typing completed");
            }
            FeedbackEvent::Stopped { position } => {
                info!(position, "Typing stopped by user");
            }
        }
    }
}
