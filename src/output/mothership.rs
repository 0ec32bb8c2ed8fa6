//! HTTP client for the remote collector
//!
//! Batches are sent as a JSON `POST`:
//!
//! ```json
//! {"records": [{"label": "...", "value": "...", "metadata": "..."}]}
//! ```

use crate::config::{MothershipConfig, UserAgentConfig};
use crate::crawler::Record;
use crate::output::traits::{DispatchError, DispatchResult, Dispatcher};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Wire form of one delivery
#[derive(Debug, Serialize)]
pub struct RecordBatch<'a> {
    pub records: &'a [Record],
}

/// Builds the HTTP client used for deliveries
pub fn build_mothership_client(
    user_agent: &UserAgentConfig,
    config: &MothershipConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
}

/// Dispatcher that `POST`s batches to the mothership endpoint
#[derive(Debug, Clone)]
pub struct MothershipClient {
    client: Client,
    endpoint: String,
}

impl MothershipClient {
    /// Creates a client for the configured endpoint
    pub fn new(
        user_agent: &UserAgentConfig,
        config: &MothershipConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_mothership_client(user_agent, config)?;
        Ok(Self::with_client(client, &config.endpoint))
    }

    /// Creates a client around an existing `reqwest::Client`
    pub fn with_client(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    fn classify(&self, e: reqwest::Error) -> DispatchError {
        if e.is_connect() {
            DispatchError::ConnectionRefused {
                endpoint: self.endpoint.clone(),
            }
        } else if e.is_timeout() {
            DispatchError::Timeout {
                endpoint: self.endpoint.clone(),
            }
        } else {
            DispatchError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl Dispatcher for MothershipClient {
    async fn send(&self, records: &[Record]) -> DispatchResult<()> {
        let body = serde_json::to_vec(&RecordBatch { records })?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!("Delivered {} records to {}", records.len(), self.endpoint);
        Ok(())
    }
}
