//! Delay model: inter-character timing, thinking pauses and paragraph pacing.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

use crate::settings::TypingSettings;

/// Assumed average word length used to turn WPM into characters per second.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Lower bound of every inter-character delay.
pub const MIN_DELAY: Duration = Duration::from_millis(20);

/// Upper bound of every inter-character delay.
pub const MAX_DELAY: Duration = Duration::from_secs(60);

/// Fixed pause after every Nth paragraph.
pub const PARAGRAPH_PAUSE: Duration = Duration::from_secs(2);

const THINKING_PAUSE_SECS: RangeInclusive<f64> = 0.5..=2.0;
const LINE_END_PAUSE_SECS: RangeInclusive<f64> = 0.5..=1.5;
const REALIZATION_SECS: RangeInclusive<f64> = 0.15..=0.4;

/// Mean delay between characters in seconds.
pub fn base_delay_secs(words_per_minute: f64) -> f64 {
    60.0 / (words_per_minute * CHARS_PER_WORD)
}

/// Draw the next inter-character delay.
///
/// Uniform in `[base * (1 - variance), base * (1 + variance)]`, clamped to
/// [`MIN_DELAY`]..=[`MAX_DELAY`]. Very low WPM values type at `MAX_DELAY`.
pub fn calculate_delay<R: Rng + ?Sized>(settings: &TypingSettings, rng: &mut R) -> Duration {
    let max_secs = MAX_DELAY.as_secs_f64();
    let base = base_delay_secs(settings.words_per_minute).min(max_secs);
    let spread = base * settings.variance;
    let secs = if spread > 0.0 {
        rng.random_range((base - spread)..=(base + spread))
    } else {
        base
    };
    Duration::from_secs_f64(secs.clamp(0.0, max_secs)).clamp(MIN_DELAY, MAX_DELAY)
}

/// Sentence and clause punctuation that triggers a thinking pause.
pub fn is_thinking_punctuation(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | ',' | ':' | ';')
}

/// Extra delay after `c` on top of the inter-character delay.
///
/// Thinking pauses apply to punctuation when enabled; newlines always add
/// an end-of-line pause.
pub fn extra_pause<R: Rng + ?Sized>(c: char, settings: &TypingSettings, rng: &mut R) -> Duration {
    if settings.thinking_pause && is_thinking_punctuation(c) {
        return random_secs(THINKING_PAUSE_SECS, rng);
    }
    if c == '\n' {
        return random_secs(LINE_END_PAUSE_SECS, rng);
    }
    Duration::ZERO
}

/// Pause between typing a wrong character and noticing it.
pub fn realization_delay<R: Rng + ?Sized>(rng: &mut R) -> Duration {
    random_secs(REALIZATION_SECS, rng)
}

fn random_secs<R: Rng + ?Sized>(range: RangeInclusive<f64>, rng: &mut R) -> Duration {
    Duration::from_secs_f64(rng.random_range(range))
}

/// Counts paragraph boundaries in the typed stream.
///
/// A boundary is a run of two or more newlines and is counted once, on the
/// second newline of the run. `'\r'` does not break a run.
#[derive(Debug, Default)]
pub struct ParagraphTracker {
    newline_run: usize,
    paragraphs: u32,
}

impl ParagraphTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the character just typed. Returns true when a paragraph pause is due.
    pub fn observe(&mut self, c: char, every: u32) -> bool {
        match c {
            '\n' => {
                self.newline_run += 1;
                if self.newline_run != 2 {
                    return false;
                }
                self.paragraphs += 1;
                every > 0 && self.paragraphs % every == 0
            }
            '\r' => false,
            _ => {
                self.newline_run = 0;
                false
            }
        }
    }

    /// Paragraph boundaries seen so far.
    pub fn paragraphs(&self) -> u32 {
        self.paragraphs
    }
}

#[cfg(test)]
#[path = "delay_test.rs"]
mod tests;
