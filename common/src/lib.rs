//! Shared utilities for human-typer: XDG paths and the daemon HTTP client.

pub mod client;
pub mod dirs;
