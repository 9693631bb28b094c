//! Keystroke injection into the focused window.
//!
//! The engine talks to a [`KeystrokeSink`]. The real sink drives `enigo` on a
//! dedicated thread; the dry-run sink only logs.

use anyhow::{Context, Result, anyhow};
use enigo::{Direction, Enigo, Keyboard, Settings};
use std::sync::mpsc;
use tracing::{debug, info};

/// Named keys the engine needs besides literal characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Backspace,
}

impl Key {
    pub fn name(&self) -> &'static str {
        match self {
            Key::Enter => "enter",
            Key::Tab => "tab",
            Key::Backspace => "backspace",
        }
    }
}

/// One keystroke as emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Key(Key),
}

impl Keystroke {
    /// Keystroke that types `c`. `'\r'` maps to nothing so CRLF text types one Enter.
    pub fn for_char(c: char) -> Option<Self> {
        match c {
            '\n' => Some(Keystroke::Key(Key::Enter)),
            '\t' => Some(Keystroke::Key(Key::Tab)),
            '\r' => None,
            c => Some(Keystroke::Char(c)),
        }
    }
}

/// Destination of emitted keystrokes. Not reentrant: only the engine uses it.
pub trait KeystrokeSink: Send {
    fn send_char(&mut self, c: char) -> Result<()>;

    fn send_key(&mut self, key: Key) -> Result<()>;

    fn send(&mut self, stroke: Keystroke) -> Result<()> {
        match stroke {
            Keystroke::Char(c) => self.send_char(c),
            Keystroke::Key(key) => self.send_key(key),
        }
    }
}

struct InjectRequest {
    stroke: Keystroke,
    reply: mpsc::Sender<Result<()>>,
}

/// Injects keystrokes into the focused application via `enigo`.
///
/// `Enigo` lives on its own thread; each keystroke is a request/reply round
/// trip, so errors are reported per keystroke.
///
/// On macOS, this requires Accessibility permissions to be granted.
pub struct EnigoKeyboard {
    tx: mpsc::Sender<InjectRequest>,
}

impl EnigoKeyboard {
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::channel::<InjectRequest>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        std::thread::Builder::new()
            .name("keystroke-injector".to_string())
            .spawn(move || {
                let mut enigo = match Enigo::new(&Settings::default()) {
                    Ok(enigo) => {
                        let _ = ready_tx.send(Ok(()));
                        enigo
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(anyhow!("Failed to initialize enigo: {}", e)));
                        return;
                    }
                };
                while let Ok(request) = rx.recv() {
                    let _ = request.reply.send(press(&mut enigo, request.stroke));
                }
                debug!("Keystroke injector thread exiting");
            })
            .context("Failed to spawn keystroke injector thread")?;

        ready_rx
            .recv()
            .context("Keystroke injector thread exited during startup")??;
        info!("Keystroke injector ready");

        Ok(Self { tx })
    }

    fn request(&self, stroke: Keystroke) -> Result<()> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(InjectRequest {
                stroke,
                reply: reply_tx,
            })
            .map_err(|_| anyhow!("Keystroke injector thread is gone"))?;
        reply_rx
            .recv()
            .map_err(|_| anyhow!("Keystroke injector thread is gone"))?
    }
}

impl KeystrokeSink for EnigoKeyboard {
    fn send_char(&mut self, c: char) -> Result<()> {
        self.request(Keystroke::Char(c))
    }

    fn send_key(&mut self, key: Key) -> Result<()> {
        self.request(Keystroke::Key(key))
    }
}

fn press(enigo: &mut Enigo, stroke: Keystroke) -> Result<()> {
    let result = match stroke {
        Keystroke::Char(c) => {
            let mut buf = [0u8; 4];
            enigo.text(c.encode_utf8(&mut buf))
        }
        Keystroke::Key(key) => enigo.key(enigo_key(key), Direction::Click),
    };
    result.map_err(|e| anyhow!("Failed to inject {:?}: {}", stroke, e))
}

fn enigo_key(key: Key) -> enigo::Key {
    match key {
        Key::Enter => enigo::Key::Return,
        Key::Tab => enigo::Key::Tab,
        Key::Backspace => enigo::Key::Backspace,
    }
}

/// Logs keystrokes instead of injecting them.
#[derive(Debug, Default)]
pub struct DryRunKeyboard {
    sent: usize,
}

impl DryRunKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keystrokes accepted so far.
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl KeystrokeSink for DryRunKeyboard {
    fn send_char(&mut self, c: char) -> Result<()> {
        self.sent += 1;
        debug!(char = ?c, "Dry run keystroke");
        Ok(())
    }

    fn send_key(&mut self, key: Key) -> Result<()> {
        self.sent += 1;
        debug!(key = key.name(), "Dry run key press");
        Ok(())
    }
}

#[cfg(test)]
#[path = "inject_test.rs"]
mod tests;
