use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use human_typer_daemon::config::Config;

/// Human-like typing daemon with a local HTTP control surface.
#[derive(Parser)]
#[command(name = "htd", version, about)]
struct Args {
    /// Config file (default: ~/.config/human-typer/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Log keystrokes instead of injecting them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.dry_run {
        config.injection.dry_run = true;
    }

    human_typer_daemon::run(config).await
}
