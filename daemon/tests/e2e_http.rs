//! End-to-end test of the HTTP control surface.
//!
//! Serves the daemon in-process on an ephemeral port with a dry-run
//! keyboard and no focus tracking, then drives a full session through the
//! shared client.

use std::sync::Arc;
use std::time::Duration;

use human_typer_common::client::DaemonClient;
use human_typer_daemon::config::{Config, InjectionConfig, SessionConfig};
use human_typer_daemon::controller::{Collaborators, Controller};
use human_typer_daemon::daemon::serve;
use human_typer_daemon::feedback::LogFeedback;
use human_typer_daemon::focus::NoFocusTracking;
use human_typer_daemon::inject::DryRunKeyboard;
use human_typer_proto::{Outcome, SettingsPatch};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

async fn wait_until_idle(client: &DaemonClient, timeout: Duration) {
    let start = std::time::Instant::now();
    loop {
        if start.elapsed() > timeout {
            panic!("Timed out waiting for session to finish");
        }
        if !client.status().await.unwrap().is_typing {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
async fn test_daemon_http_lifecycle() {
    let config = Config {
        session: SessionConfig {
            countdown_secs: 0,
            focus_tracking: false,
            ..SessionConfig::default()
        },
        injection: InjectionConfig { dry_run: true },
        ..Config::default()
    };
    let collaborators = Collaborators {
        keyboard: Box::new(DryRunKeyboard::new()),
        focus: Arc::new(NoFocusTracking),
        feedback: Arc::new(LogFeedback),
    };
    let controller = Arc::new(Controller::new(&config, collaborators));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, controller, async {
        let _ = shutdown_rx.await;
    }));

    let client = DaemonClient::new(format!("http://{addr}")).unwrap();
    assert!(human_typer_common::client::is_daemon_running(client.base_url()).await);

    let health = client.health().await.unwrap();
    assert!(health.healthy);
    assert!(!health.features.window_tracking);

    // Nothing to stop or restart yet
    let err = client.stop().await.unwrap_err();
    assert!(err.to_string().contains("Not typing"));
    let err = client.restart().await.unwrap_err();
    assert!(err.to_string().contains("No previous session"));
    let err = client
        .start_typing("", SettingsPatch::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("No text"));

    let fast = SettingsPatch {
        wpm: Some(1200.0),
        mistake_rate: Some(0.0),
        thinking_pause: Some(false),
        ..SettingsPatch::default()
    };
    let accepted = client.start_typing("Hello, world", fast).await.unwrap();
    assert!(accepted.success);
    assert_eq!(accepted.text_length, 12);

    let err = client
        .start_typing("again", SettingsPatch::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Already typing"));

    wait_until_idle(&client, Duration::from_secs(10)).await;
    let status = client.status().await.unwrap();
    assert_eq!(status.progress.current, 12);
    assert_eq!(status.progress.typed_so_far, "Hello, world");
    assert_eq!(status.last_outcome, Some(Outcome::Completed));

    // Restart a long text at the live speed, then stop it
    let slow = SettingsPatch {
        wpm: Some(30.0),
        ..SettingsPatch::default()
    };
    let updated = client.update_settings(&slow).await.unwrap();
    assert!((updated.current_settings.wpm - 30.0).abs() < f64::EPSILON);

    let restarted = client.restart().await.unwrap();
    assert_eq!(restarted.text_length, 12);
    let resumed = client.resume().await.unwrap();
    assert!(resumed.success);
    client.stop().await.unwrap();

    wait_until_idle(&client, Duration::from_secs(10)).await;
    let status = client.status().await.unwrap();
    assert_eq!(status.last_outcome, Some(Outcome::Stopped));
    assert!(status.progress.current < 12);

    shutdown_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
