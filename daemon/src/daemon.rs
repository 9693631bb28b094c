//! Daemon runner that wires the collaborators and serves the control surface.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::controller::{Collaborators, Controller};
use crate::feedback::LogFeedback;
use crate::focus::{FocusOracle, NoFocusTracking, SystemFocus};
use crate::inject::{DryRunKeyboard, EnigoKeyboard, KeystrokeSink};
use crate::server::create_router;

/// Paths used by the daemon at runtime.
pub struct DaemonPaths {
    pub pid: PathBuf,
}

impl DaemonPaths {
    /// Create paths using XDG state directory defaults.
    pub fn from_xdg() -> Result<Self> {
        Ok(Self {
            pid: human_typer_common::dirs::pid_path()?,
        })
    }
}

/// Run the daemon with default XDG paths.
pub async fn run(config: Config) -> Result<()> {
    run_with_paths(config, DaemonPaths::from_xdg()?).await
}

/// Run the daemon with custom paths until Ctrl-C.
pub async fn run_with_paths(config: Config, paths: DaemonPaths) -> Result<()> {
    let pid_file = paths.pid;

    let pid = std::process::id();
    std::fs::write(&pid_file, pid.to_string()).context("Failed to write PID file")?;
    info!(pid = pid, path = %pid_file.display(), "Wrote PID file");

    let result = serve_config(&config).await;

    let _ = std::fs::remove_file(&pid_file);
    info!("Daemon stopped");
    result
}

async fn serve_config(config: &Config) -> Result<()> {
    let collaborators = build_collaborators(config)?;
    let controller = Arc::new(Controller::new(config, collaborators));

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "Listening for HTTP control requests");

    serve(listener, Arc::clone(&controller), shutdown_signal()).await
}

/// Serve the control surface on `listener` until `shutdown` resolves.
///
/// An active session is stopped and its engine awaited before returning.
pub async fn serve<F>(listener: TcpListener, controller: Arc<Controller>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Daemon started");
    let result = axum::serve(listener, create_router(Arc::clone(&controller)))
        .with_graceful_shutdown(shutdown)
        .await;

    controller.shutdown().await;
    result.context("Server error")
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
    }
}

/// Pick the keystroke sink and focus oracle the config asks for.
fn build_collaborators(config: &Config) -> Result<Collaborators> {
    let keyboard: Box<dyn KeystrokeSink> = if config.injection.dry_run {
        info!("Dry run: keystrokes are logged, not injected");
        Box::new(DryRunKeyboard::new())
    } else {
        Box::new(EnigoKeyboard::new().context("Failed to initialize keystroke injection")?)
    };

    let focus: Arc<dyn FocusOracle> = if config.session.focus_tracking {
        Arc::new(SystemFocus)
    } else {
        Arc::new(NoFocusTracking)
    };
    if !focus.is_supported() {
        info!("Focus tracking disabled");
    }

    Ok(Collaborators {
        keyboard,
        focus,
        feedback: Arc::new(LogFeedback),
    })
}
