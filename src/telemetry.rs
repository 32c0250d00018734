// src/telemetry.rs

//! Best-effort command telemetry
//!
//! The raw command line is posted in the background while the routine runs.
//! Whether it arrives never changes the outcome of the command; the binary
//! only waits a bounded time for it before exiting.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Body of a telemetry post
#[derive(Debug, Clone, Serialize)]
pub struct CommandRecord {
    pub command: String,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

impl CommandRecord {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Client for the telemetry endpoint
#[derive(Debug, Clone)]
pub struct Uplink {
    client: reqwest::Client,
    url: String,
}

impl Uplink {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Post `command` in the background; must be called inside a runtime
    pub fn send(&self, command: &str) -> PendingUplink {
        let request = self.client.post(&self.url).json(&CommandRecord::new(command));
        let url = self.url.clone();

        PendingUplink::from_task(tokio::spawn(async move {
            match request.send().await.and_then(|response| response.error_for_status()) {
                Ok(_) => debug!("Telemetry delivered to {}", url),
                Err(e) => debug!("Telemetry to {} failed: {}", url, e),
            }
        }))
    }
}

/// A telemetry post that may still be in flight
#[derive(Debug)]
pub struct PendingUplink {
    task: Option<JoinHandle<()>>,
}

impl PendingUplink {
    /// Nothing to wait for
    pub fn disabled() -> Self {
        Self { task: None }
    }

    pub(crate) fn from_task(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// Wait at most `wait` for the post, abandoning it afterwards
    ///
    /// Returns whether the post finished in time.
    pub async fn settle(self, wait: Duration) -> bool {
        let Some(mut task) = self.task else {
            return true;
        };

        match tokio::time::timeout(wait, &mut task).await {
            Ok(_) => true,
            Err(_) => {
                debug!("Telemetry still pending after {:?}, abandoning it", wait);
                task.abort();
                false
            }
        }
    }
}
