//! Mistake model: which characters get mistyped and what gets typed instead.
//!
//! Wrong characters come from a QWERTY adjacency table so typos land on
//! physically neighbouring keys, with the original character's case.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::settings::TypingSettings;

/// Keys physically adjacent to each lowercase letter on a QWERTY layout.
fn neighbors(c: char) -> &'static [char] {
    match c {
        'a' => &['s', 'q', 'z', 'w'],
        'b' => &['v', 'g', 'n', 'h'],
        'c' => &['x', 'd', 'v', 'f'],
        'd' => &['s', 'e', 'f', 'c', 'x'],
        'e' => &['w', 'r', 'd', 's'],
        'f' => &['d', 'r', 'g', 'v', 'c'],
        'g' => &['f', 't', 'h', 'b', 'v'],
        'h' => &['g', 'y', 'j', 'n', 'b'],
        'i' => &['u', 'o', 'k', 'j'],
        'j' => &['h', 'u', 'k', 'm', 'n'],
        'k' => &['j', 'i', 'l', 'o'],
        'l' => &['k', 'o', 'p'],
        'm' => &['n', 'j', 'k'],
        'n' => &['b', 'h', 'j', 'm'],
        'o' => &['i', 'p', 'l', 'k'],
        'p' => &['o', 'l'],
        'q' => &['w', 'a', 's'],
        'r' => &['e', 't', 'f', 'd'],
        's' => &['a', 'w', 'd', 'x', 'z'],
        't' => &['r', 'y', 'g', 'f'],
        'u' => &['y', 'i', 'j', 'h'],
        'v' => &['c', 'f', 'b', 'g'],
        'w' => &['q', 'e', 's', 'a'],
        'x' => &['z', 's', 'c', 'd'],
        'y' => &['t', 'u', 'h', 'g'],
        'z' => &['a', 's', 'x'],
        _ => &[],
    }
}

/// Pick a neighbouring key for `c`, preserving case.
///
/// Returns `None` for characters outside the table (digits, punctuation,
/// non-ASCII letters).
pub fn adjacent_key<R: Rng + ?Sized>(c: char, rng: &mut R) -> Option<char> {
    let wrong = *neighbors(c.to_ascii_lowercase()).choose(rng)?;
    if c.is_ascii_uppercase() {
        Some(wrong.to_ascii_uppercase())
    } else {
        Some(wrong)
    }
}

/// Decide whether to mistype `c` and, if so, with which character.
///
/// Only ASCII letters are eligible, one independent draw per character.
/// Mistakes are only made when self-correction is enabled since every
/// wrong character is immediately corrected.
pub fn pick_mistake<R: Rng + ?Sized>(
    c: char,
    settings: &TypingSettings,
    rng: &mut R,
) -> Option<char> {
    if !settings.self_correction || !c.is_ascii_alphabetic() || settings.mistake_rate <= 0.0 {
        return None;
    }
    if !rng.random_bool(settings.mistake_rate.min(1.0)) {
        return None;
    }
    adjacent_key(c, rng)
}

#[cfg(test)]
#[path = "typo_test.rs"]
mod tests;
