//! `htctl`: command-line control of a running human-typer daemon.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use human_typer_common::client::{DaemonClient, default_url};
use human_typer_proto::{HealthResponse, Outcome, Settings, SettingsPatch, StatusResponse};

#[derive(Parser)]
#[command(name = "htctl")]
#[command(about = "Human-typer CLI - type text like a person would")]
#[command(version)]
pub struct Cli {
    /// Daemon address
    #[arg(long, global = true, default_value_t = default_url())]
    pub url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current session
    Status,
    /// Check that the daemon is up
    Health,
    /// Type the contents of FILE, or stdin when omitted
    Type {
        file: Option<PathBuf>,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Stop the active session
    Stop,
    /// Resume a session paused by focus loss
    Resume,
    /// Type the previous text again
    Restart,
    /// Change settings of the live session
    Set {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// Settings overrides; omitted flags leave the daemon's value in place.
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct SettingsArgs {
    /// Words per minute
    #[arg(long)]
    pub wpm: Option<f64>,
    /// Delay variance in percent
    #[arg(long)]
    pub variance: Option<f64>,
    /// Chance of a corrected typo per letter, in percent
    #[arg(long)]
    pub mistake_rate: Option<f64>,
    /// Pause after punctuation
    #[arg(long)]
    pub thinking_pause: Option<bool>,
    /// Make and correct typos
    #[arg(long)]
    pub self_correction: Option<bool>,
    /// Pause after every N paragraphs (0 disables)
    #[arg(long)]
    pub paragraph_breaks: Option<u32>,
}

impl SettingsArgs {
    pub fn to_patch(&self) -> SettingsPatch {
        SettingsPatch {
            wpm: self.wpm,
            variance: self.variance,
            mistake_rate: self.mistake_rate,
            thinking_pause: self.thinking_pause,
            self_correction: self.self_correction,
            paragraph_breaks: self.paragraph_breaks,
        }
    }
}

/// Execute one CLI command against the daemon.
pub async fn run(cli: Cli) -> Result<()> {
    let client = DaemonClient::new(&cli.url)?;
    tracing::debug!(url = client.base_url(), "Using daemon");

    match cli.command {
        Commands::Status => {
            let status = client.status().await?;
            println!("{}", format_status(&status));
        }
        Commands::Health => {
            let health = client.health().await?;
            println!("{}", format_health(&health));
        }
        Commands::Type { file, settings } => {
            let text = read_text(file.as_deref())?;
            if text.is_empty() {
                bail!("Nothing to type");
            }
            let resp = client.start_typing(&text, settings.to_patch()).await?;
            println!("{} ({} characters)", resp.message, resp.text_length);
        }
        Commands::Stop => {
            let resp = client.stop().await?;
            println!("{}", resp.message);
        }
        Commands::Resume => {
            let resp = client.resume().await?;
            println!("Resuming at character {}", resp.resume_position);
        }
        Commands::Restart => {
            let resp = client.restart().await?;
            println!("{} ({} characters)", resp.message, resp.text_length);
        }
        Commands::Set { settings } => {
            let patch = settings.to_patch();
            if patch == SettingsPatch::default() {
                bail!("No settings given");
            }
            let resp = client.update_settings(&patch).await?;
            println!("{}", format_settings(&resp.current_settings));
        }
    }

    Ok(())
}

fn read_text(file: Option<&std::path::Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

pub fn format_status(status: &StatusResponse) -> String {
    let state = match (status.is_typing, status.paused) {
        (true, true) => "paused (focus lost)",
        (true, false) => "typing",
        (false, _) => "idle",
    };
    let mut lines = vec![
        format!("Daemon {} (v{})", status.status, status.version),
        format!("State: {state}"),
    ];
    if status.progress.total > 0 {
        lines.push(format!(
            "Progress: {}/{} ({:.1}%)",
            status.progress.current, status.progress.total, status.progress.percentage
        ));
        lines.push(format!(
            "Interruptions: {}, mistakes: {}",
            status.stats.interruptions, status.stats.mistakes
        ));
    }
    if let Some(outcome) = status.last_outcome {
        let outcome = match outcome {
            Outcome::Completed => "completed",
            Outcome::Stopped => "stopped",
        };
        lines.push(format!("Last session: {outcome}"));
    }
    lines.push(format_settings(&status.settings));
    lines.join("\n")
}

pub fn format_health(health: &HealthResponse) -> String {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    format!(
        "Healthy: {} at {}\nWindow tracking: {}\nSound alerts: {}",
        yes_no(health.healthy),
        health.timestamp,
        yes_no(health.features.window_tracking),
        yes_no(health.features.sound_alerts)
    )
}

pub fn format_settings(settings: &Settings) -> String {
    format!(
        "Settings: {} wpm, variance {}%, mistakes {}%, thinking pause {}, self-correction {}, paragraph breaks {}",
        settings.wpm,
        settings.variance,
        settings.mistake_rate,
        settings.thinking_pause,
        settings.self_correction,
        settings.paragraph_breaks
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use human_typer_proto::{Features, Progress, Stats};

    fn sample_settings() -> Settings {
        Settings {
            wpm: 60.0,
            variance: 20.0,
            mistake_rate: 5.0,
            thinking_pause: true,
            self_correction: true,
            paragraph_breaks: 0,
        }
    }

    #[test]
    fn test_parse_type_with_settings() {
        let cli = Cli::parse_from([
            "htctl",
            "type",
            "notes.txt",
            "--wpm",
            "90",
            "--thinking-pause",
            "false",
        ]);
        assert_eq!(cli.url, "http://127.0.0.1:8765");
        let Commands::Type { file, settings } = cli.command else {
            panic!("expected type command");
        };
        assert_eq!(file, Some(PathBuf::from("notes.txt")));
        let patch = settings.to_patch();
        assert_eq!(patch.wpm, Some(90.0));
        assert_eq!(patch.thinking_pause, Some(false));
        assert_eq!(patch.variance, None);
    }

    #[test]
    fn test_parse_url_override() {
        let cli = Cli::parse_from(["htctl", "status", "--url", "http://localhost:9000"]);
        assert_eq!(cli.url, "http://localhost:9000");
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_format_status_paused() {
        let status = StatusResponse {
            status: "online".to_string(),
            version: "0.1.0".to_string(),
            is_typing: true,
            paused: true,
            progress: Progress {
                current: 10,
                total: 40,
                percentage: 25.0,
                typed_so_far: "0123456789".to_string(),
                remaining: "rest".to_string(),
            },
            pause_reason: Some(human_typer_proto::PauseReason::FocusLost),
            stats: Stats {
                interruptions: 1,
                mistakes: 2,
            },
            last_outcome: Some(Outcome::Stopped),
            settings: sample_settings(),
        };

        let text = format_status(&status);

        assert!(text.contains("State: paused (focus lost)"));
        assert!(text.contains("Progress: 10/40 (25.0%)"));
        assert!(text.contains("Interruptions: 1, mistakes: 2"));
        assert!(text.contains("Last session: stopped"));
        assert!(text.contains("60 wpm"));
    }

    #[test]
    fn test_format_health() {
        let health = HealthResponse {
            healthy: true,
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            features: Features {
                window_tracking: true,
                sound_alerts: false,
            },
        };
        let text = format_health(&health);
        assert!(text.contains("Window tracking: yes"));
        assert!(text.contains("Sound alerts: no"));
    }
}
