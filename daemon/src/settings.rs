//! Live typing settings and merging of partial updates.

use human_typer_proto::{Settings, SettingsPatch};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Effective settings of a typing session.
///
/// Replaced as a whole on update; the engine re-reads it before every
/// delay computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingSettings {
    pub words_per_minute: f64,
    /// Fraction in `[0, 1)`.
    pub variance: f64,
    /// Probability in `[0, 1]` of a mistake on each eligible character.
    pub mistake_rate: f64,
    pub thinking_pause: bool,
    pub self_correction: bool,
    /// Pause after every N paragraphs, 0 disables.
    pub paragraph_break_every: u32,
}

impl Default for TypingSettings {
    fn default() -> Self {
        Self {
            words_per_minute: 60.0,
            variance: 0.2,
            mistake_rate: 0.05,
            thinking_pause: true,
            self_correction: true,
            paragraph_break_every: 0,
        }
    }
}

impl TypingSettings {
    pub fn validate(&self) -> Result<(), SessionError> {
        if !self.words_per_minute.is_finite() || self.words_per_minute <= 0.0 {
            return Err(SessionError::InvalidSettings(
                "words per minute must be greater than 0".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.variance) {
            return Err(SessionError::InvalidSettings(
                "variance must be in [0, 100) percent".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mistake_rate) {
            return Err(SessionError::InvalidSettings(
                "mistake rate must be in [0, 100] percent".to_string(),
            ));
        }
        Ok(())
    }

    /// Return a copy with the provided wire fields applied.
    ///
    /// Nothing is changed if the result would be invalid.
    pub fn merged(&self, patch: &SettingsPatch) -> Result<Self, SessionError> {
        let mut next = self.clone();
        if let Some(wpm) = patch.wpm {
            next.words_per_minute = wpm;
        }
        if let Some(variance) = patch.variance {
            next.variance = variance / 100.0;
        }
        if let Some(rate) = patch.mistake_rate {
            next.mistake_rate = rate / 100.0;
        }
        if let Some(thinking) = patch.thinking_pause {
            next.thinking_pause = thinking;
        }
        if let Some(correction) = patch.self_correction {
            next.self_correction = correction;
        }
        if let Some(every) = patch.paragraph_breaks {
            next.paragraph_break_every = every;
        }
        next.validate()?;
        Ok(next)
    }

    /// Wire representation (percent units).
    pub fn to_wire(&self) -> Settings {
        Settings {
            wpm: self.words_per_minute,
            variance: self.variance * 100.0,
            mistake_rate: self.mistake_rate * 100.0,
            thinking_pause: self.thinking_pause,
            self_correction: self.self_correction,
            paragraph_breaks: self.paragraph_break_every,
        }
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
