//! HTTP client for the agent backend.

use std::time::Duration;

use streaming::DataSourceError;
use tracing::{debug, warn};

use crate::protocol::{AgentReply, AgentRequest, AgentResponse};

#[derive(Debug, Clone)]
pub struct AgentClient {
    client: reqwest::Client,
    endpoint: String,
}

impl AgentClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, DataSourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataSourceError::with_source("failed to build HTTP client", e))?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `request` and returns the agent's reply.
    ///
    /// Never fails: any transport or decoding problem yields
    /// [`AgentReply::fallback`].
    pub async fn ask(&self, request: &AgentRequest) -> AgentReply {
        match self.post(request).await {
            Ok(response) => {
                let reply = AgentReply::from(response);
                debug!("agent replied with {} command(s)", reply.commands.len());
                reply
            }
            Err(e) => {
                warn!("agent request to {} failed: {e}", self.endpoint);
                AgentReply::fallback()
            }
        }
    }

    async fn post(&self, request: &AgentRequest) -> Result<AgentResponse, DataSourceError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| DataSourceError::with_source("HTTP request failed", e))?;

        if !resp.status().is_success() {
            return Err(DataSourceError::new(format!(
                "HTTP error: {}",
                resp.status()
            )));
        }

        resp.json::<AgentResponse>()
            .await
            .map_err(|e| DataSourceError::with_source("failed to decode agent response", e))
    }
}
