//! Foreground window inspection used for focus-loss detection.

use anyhow::Result;
#[cfg(any(target_os = "macos", target_os = "linux"))]
use anyhow::Context;
#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::process::Command;
use tracing::debug;

/// Title reported when the foreground window cannot be determined.
pub const UNKNOWN_WINDOW: &str = "unknown";

/// Reports the title of the current foreground window.
pub trait FocusOracle: Send + Sync {
    fn active_window_title(&self) -> Result<String>;

    /// Whether this oracle can actually observe window changes.
    fn is_supported(&self) -> bool {
        true
    }
}

/// Queries the operating system for the foreground window.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFocus;

impl FocusOracle for SystemFocus {
    fn active_window_title(&self) -> Result<String> {
        get_active_window_title()
    }

    fn is_supported(&self) -> bool {
        cfg!(any(target_os = "macos", target_os = "linux"))
    }
}

/// Oracle used when focus tracking is disabled: never observes a change.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFocusTracking;

impl FocusOracle for NoFocusTracking {
    fn active_window_title(&self) -> Result<String> {
        Ok(UNKNOWN_WINDOW.to_string())
    }

    fn is_supported(&self) -> bool {
        false
    }
}

fn is_known(title: &str) -> bool {
    let title = title.trim();
    !title.is_empty() && title != UNKNOWN_WINDOW
}

/// Capture the window typing is aimed at. `None` disables tracking.
pub fn capture_target(oracle: &dyn FocusOracle) -> Option<String> {
    match oracle.active_window_title() {
        Ok(title) if is_known(&title) => Some(title),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Could not capture target window, focus tracking disabled");
            None
        }
    }
}

/// Returns the new foreground title if it differs from `target`.
///
/// Oracle failures and unknown titles count as focus unchanged.
pub fn focus_lost(oracle: &dyn FocusOracle, target: &str) -> Option<String> {
    match oracle.active_window_title() {
        Ok(title) if is_known(&title) && title != target => Some(title),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Focus check failed, presuming focus unchanged");
            None
        }
    }
}

/// Get the frontmost application and window name on macOS.
#[cfg(target_os = "macos")]
fn get_active_window_title() -> Result<String> {
    let script = r#"tell application "System Events"
    set frontApp to first application process whose frontmost is true
    set appName to name of frontApp
    try
        set winName to name of front window of frontApp
    on error
        set winName to ""
    end try
end tell
return appName & " - " & winName"#;

    let output = Command::new("osascript")
        .args(["-e", script])
        .output()
        .context("Failed to execute osascript")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("osascript failed: {}", stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Get the active window title on X11 via xdotool.
#[cfg(target_os = "linux")]
fn get_active_window_title() -> Result<String> {
    let output = Command::new("xdotool")
        .args(["getactivewindow", "getwindowname"])
        .output()
        .context("Failed to execute xdotool")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("xdotool failed: {}", stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn get_active_window_title() -> Result<String> {
    Ok(UNKNOWN_WINDOW.to_string())
}

#[cfg(test)]
#[path = "focus_test.rs"]
mod tests;
