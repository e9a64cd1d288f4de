use anyhow::{Context, Result};
use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::{demo_payload, WidgetPayload};

/// Where the displayed payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetMode {
    /// Canned demo data.
    Demo,
    /// Data from the configured endpoint.
    Live,
}

/// A payload together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSnapshot {
    /// How the payload was obtained.
    pub mode: WidgetMode,
    /// Payload to display.
    pub payload: WidgetPayload,
}

impl WidgetSnapshot {
    /// Snapshot of the demo payload.
    pub fn demo() -> Self {
        Self {
            mode: WidgetMode::Demo,
            payload: demo_payload(),
        }
    }
}

/// Failures talking to the widget endpoint.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Transport-level failure.
    #[error("widget request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status.
    #[error("widget endpoint returned {0}")]
    Status(StatusCode),
    /// Body is not a widget payload.
    #[error("malformed widget payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Events emitted by the background widget task.
#[derive(Debug)]
pub enum WidgetEvent {
    /// A payload is ready to display.
    Loaded(WidgetSnapshot),
    /// The endpoint failed; the message is user-facing.
    Failed(String),
}

/// Fetches the widget payload.
#[derive(Debug, Clone)]
pub struct WidgetClient {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl WidgetClient {
    /// Client for `endpoint`; blank or missing means demo mode.
    pub fn new(endpoint: Option<&str>) -> Self {
        Self {
            endpoint: endpoint
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            client: reqwest::Client::new(),
        }
    }

    /// Whether a live endpoint is configured.
    pub fn is_live(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Fetch the payload, or the demo payload without an endpoint.
    pub async fn fetch(&self) -> Result<WidgetSnapshot, WidgetError> {
        let Some(url) = &self.endpoint else {
            return Ok(WidgetSnapshot::demo());
        };
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::Status(status));
        }
        let body = response.text().await?;
        Ok(WidgetSnapshot {
            mode: WidgetMode::Live,
            payload: serde_json::from_str(&body)?,
        })
    }

    /// Fetch once and report the result on `sender`.
    pub async fn run(&self, sender: mpsc::Sender<WidgetEvent>) -> Result<()> {
        let event = match self.fetch().await {
            Ok(snapshot) => {
                info!(mode = ?snapshot.mode, "Widget data refreshed");
                WidgetEvent::Loaded(snapshot)
            }
            Err(err) => {
                warn!(%err, "Widget refresh failed");
                WidgetEvent::Failed(format!("Failed to update player data: {err}"))
            }
        };
        sender
            .send(event)
            .await
            .context("failed to send widget event")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn without_endpoint_serves_demo() -> anyhow::Result<()> {
        let client = WidgetClient::new(Some("   "));
        assert!(!client.is_live());
        let snapshot = client.fetch().await?;
        assert_eq!(snapshot.mode, WidgetMode::Demo);
        assert_eq!(snapshot.payload.player.personaname, "GameMaster Pro");
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_endpoint_reports_failure() -> anyhow::Result<()> {
        let client = WidgetClient::new(Some("http://127.0.0.1:9/widget"));
        let (tx, mut rx) = mpsc::channel(1);
        client.run(tx).await?;
        match rx.recv().await {
            Some(WidgetEvent::Failed(message)) => {
                assert!(message.starts_with("Failed to update player data"))
            }
            other => panic!("unexpected event: {other:?}"),
        }
        Ok(())
    }
}
