pub mod config;
pub mod controller;
pub mod daemon;
pub mod delay;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod focus;
pub mod inject;
pub mod server;
pub mod session;
pub mod settings;
pub mod typo;

#[cfg(test)]
pub(crate) mod test_support;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Application-specific environment variable for log filtering (overrides config).
const LOG_ENV_VAR: &str = "HT_LOG";

/// Entry point for the daemon process: configures logging and launches the daemon.
pub async fn run(config: config::Config) -> anyhow::Result<()> {
    let log_path =
        human_typer_common::dirs::log_path().context("Failed to determine log path")?;
    let log_dir = log_path.parent().context("Log path has no parent")?;
    let log_filename = log_path.file_name().context("Log path has no file name")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // HT_LOG env var overrides config file level
    let filter = EnvFilter::builder()
        .with_env_var(LOG_ENV_VAR)
        .with_default_directive(config.logging.level.as_directive().parse()?)
        .from_env()?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter)
        .init();

    daemon::run(config).await
}
