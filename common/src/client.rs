//! HTTP client for communicating with the human-typer daemon.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use human_typer_proto::{
    DEFAULT_PORT, ErrorResponse, HealthResponse, ResumeResponse, SettingsPatch, StatusResponse,
    StopResponse, TypeRequest, TypeResponse, UpdateSettingsResponse,
};
use serde::de::DeserializeOwned;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Default base URL of a locally running daemon.
pub fn default_url() -> String {
    format!("http://127.0.0.1:{DEFAULT_PORT}")
}

/// Client for the daemon's control surface.
#[derive(Debug, Clone)]
pub struct DaemonClient {
    base_url: String,
    http: reqwest::Client,
}

impl DaemonClient {
    /// Create a client for the daemon at `base_url` (e.g. `http://127.0.0.1:8765`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn status(&self) -> Result<StatusResponse> {
        let resp = self
            .http
            .get(self.url("/status"))
            .send()
            .await
            .context("Failed to connect to daemon")?;
        decode(resp).await
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .context("Failed to connect to daemon")?;
        decode(resp).await
    }

    /// Submit text for typing. Returns once the session has been accepted.
    pub async fn start_typing(&self, text: &str, settings: SettingsPatch) -> Result<TypeResponse> {
        let body = TypeRequest {
            text: text.to_string(),
            settings,
        };
        self.post("/type", &body).await
    }

    pub async fn stop(&self) -> Result<StopResponse> {
        self.post("/stop", &Empty {}).await
    }

    pub async fn resume(&self) -> Result<ResumeResponse> {
        self.post("/resume", &Empty {}).await
    }

    pub async fn restart(&self) -> Result<TypeResponse> {
        self.post("/restart", &Empty {}).await
    }

    pub async fn update_settings(&self, patch: &SettingsPatch) -> Result<UpdateSettingsResponse> {
        self.post("/update-settings", patch).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .context("Failed to connect to daemon")?;
        decode(resp).await
    }
}

/// Check if a daemon answers on `base_url`.
pub async fn is_daemon_running(base_url: &str) -> bool {
    match DaemonClient::new(base_url) {
        Ok(client) => client.health().await.is_ok(),
        Err(_) => false,
    }
}

/// `{}` body for endpoints without parameters.
#[derive(serde::Serialize)]
struct Empty {}

/// Decode a success body, or turn the daemon's error body into an error.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return resp
            .json::<T>()
            .await
            .context("Failed to decode daemon response");
    }

    match resp.json::<ErrorResponse>().await {
        Ok(err) => bail!("{}", err.error),
        Err(_) => bail!("Daemon returned HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = DaemonClient::new("http://127.0.0.1:9999/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9999");
        assert_eq!(client.url("/status"), "http://127.0.0.1:9999/status");
    }

    #[test]
    fn test_default_url_uses_default_port() {
        assert_eq!(default_url(), "http://127.0.0.1:8765");
    }

    #[tokio::test]
    async fn test_is_daemon_running_false_when_nothing_listens() {
        // Port 9 (discard) is practically never served over HTTP locally.
        assert!(!is_daemon_running("http://127.0.0.1:9").await);
    }
}
