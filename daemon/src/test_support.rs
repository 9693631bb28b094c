//! Test doubles for the engine's collaborators.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, bail};

use crate::engine::EngineTiming;
use crate::feedback::{Feedback, FeedbackEvent};
use crate::focus::FocusOracle;
use crate::inject::{Key, Keystroke, KeystrokeSink};
use crate::settings::TypingSettings;

pub type StrokeLog = Arc<Mutex<Vec<Keystroke>>>;

/// Records every keystroke; optionally rejects one character.
pub struct RecordingKeyboard {
    strokes: StrokeLog,
    fail_on: Option<char>,
}

impl RecordingKeyboard {
    pub fn new() -> (Self, StrokeLog) {
        let strokes = StrokeLog::default();
        (
            Self {
                strokes: Arc::clone(&strokes),
                fail_on: None,
            },
            strokes,
        )
    }

    pub fn failing_on(c: char) -> (Self, StrokeLog) {
        let (mut keyboard, strokes) = Self::new();
        keyboard.fail_on = Some(c);
        (keyboard, strokes)
    }
}

/// Panics when asked to type `panic_on`, records everything else.
pub struct PanickingKeyboard {
    inner: RecordingKeyboard,
    panic_on: char,
}

impl PanickingKeyboard {
    pub fn new(panic_on: char) -> (Self, StrokeLog) {
        let (inner, strokes) = RecordingKeyboard::new();
        (Self { inner, panic_on }, strokes)
    }
}

impl KeystrokeSink for PanickingKeyboard {
    fn send_char(&mut self, c: char) -> Result<()> {
        if c == self.panic_on {
            panic!("keyboard driver crashed on {c:?}");
        }
        self.inner.send_char(c)
    }

    fn send_key(&mut self, key: Key) -> Result<()> {
        self.inner.send_key(key)
    }
}

impl KeystrokeSink for RecordingKeyboard {
    fn send_char(&mut self, c: char) -> Result<()> {
        if self.fail_on == Some(c) {
            bail!("injection rejected for {c:?}");
        }
        self.strokes.lock().unwrap().push(Keystroke::Char(c));
        Ok(())
    }

    fn send_key(&mut self, key: Key) -> Result<()> {
        self.strokes.lock().unwrap().push(Keystroke::Key(key));
        Ok(())
    }
}

/// Replays window titles in order, then repeats `fallback`.
pub struct ScriptedFocus {
    script: Mutex<VecDeque<Result<String, String>>>,
    fallback: String,
}

impl ScriptedFocus {
    pub fn new(script: &[&str], fallback: &str) -> Self {
        Self {
            script: Mutex::new(script.iter().map(|s| Ok(s.to_string())).collect()),
            fallback: fallback.to_string(),
        }
    }

    /// Capture succeeds with `target`, every later query errors.
    pub fn broken_after(target: &str) -> Self {
        let script = std::iter::once(Ok(target.to_string()))
            .chain(std::iter::repeat_n(Err("no display".to_string()), 1000))
            .collect();
        Self {
            script: Mutex::new(script),
            fallback: target.to_string(),
        }
    }
}

impl FocusOracle for ScriptedFocus {
    fn active_window_title(&self) -> Result<String> {
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(title)) => Ok(title),
            Some(Err(e)) => bail!(e),
            None => Ok(self.fallback.clone()),
        }
    }
}

#[derive(Default)]
pub struct RecordingFeedback {
    events: Mutex<Vec<FeedbackEvent>>,
}

impl RecordingFeedback {
    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&FeedbackEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl Feedback for RecordingFeedback {
    fn notify(&self, event: &FeedbackEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// No countdown, default focus cadence.
pub fn fast_timing() -> EngineTiming {
    EngineTiming {
        countdown: Duration::ZERO,
        focus_check_every: 10,
        focus_grace: Duration::from_secs(2),
        resume_poll: Duration::from_millis(100),
    }
}

/// Settings without typos or thinking pauses.
pub fn plain_settings() -> TypingSettings {
    TypingSettings {
        words_per_minute: 60.0,
        variance: 0.2,
        mistake_rate: 0.0,
        thinking_pause: false,
        self_correction: true,
        paragraph_break_every: 0,
    }
}

/// Text a target field ends up with after replaying `strokes`.
pub fn rendered(strokes: &[Keystroke]) -> String {
    let mut out = String::new();
    for stroke in strokes {
        match stroke {
            Keystroke::Char(c) => out.push(*c),
            Keystroke::Key(Key::Enter) => out.push('\n'),
            Keystroke::Key(Key::Tab) => out.push('\t'),
            Keystroke::Key(Key::Backspace) => {
                out.pop();
            }
        }
    }
    out
}
