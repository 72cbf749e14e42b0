//! Sheet Client: the single outbound channel for evaluation records.
//!
//! The spreadsheet script answers with a redirect/opaque page that tells us
//! nothing about whether the row was written, so a dispatch counts as done
//! once the request completes without a transport error. Status and body are
//! never interpreted. There is no retry: every failure goes back to the user.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::record::EvaluationRecord;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to spreadsheet endpoint timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("failed to serialize record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SinkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SinkError::Timeout
        } else {
            SinkError::Http(e)
        }
    }
}

/// What the caller learns about delivery. Only `Opaque` exists today: the
/// request left, nothing more is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Acknowledgment {
    Opaque,
}

/// Destination for finished records. `AppState` carries an `Arc<dyn RecordSink>`.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn dispatch(&self, record: &EvaluationRecord) -> Result<Acknowledgment, SinkError>;
}

/// POSTs the JSON record to the configured spreadsheet endpoint.
#[derive(Clone)]
pub struct SheetClient {
    client: Client,
    endpoint: String,
}

impl SheetClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SinkError::Client)?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl RecordSink for SheetClient {
    async fn dispatch(&self, record: &EvaluationRecord) -> Result<Acknowledgment, SinkError> {
        // Sent as text/plain, the only body type a no-cors browser POST allows;
        // the script parses the raw body itself.
        let body = serde_json::to_string(record)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "text/plain;charset=UTF-8")
            .body(body)
            .send()
            .await?;

        debug!(
            "Spreadsheet endpoint answered with status {} (not interpreted)",
            response.status()
        );

        Ok(Acknowledgment::Opaque)
    }
}
