use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;

use crate::config::Credentials;

/// Raw answer from the chat-messages API, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound seam of the proxy. The production implementation talks HTTP;
/// tests substitute a recorder.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, credentials: Credentials<'_>, payload: &Value) -> Result<UpstreamReply>;
}

// Blocking-mode client for a Dify-style `chat-messages` endpoint
pub struct ChatMessagesClient {
    client: Client,
}

impl ChatMessagesClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ChatMessagesClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for ChatMessagesClient {
    async fn send(&self, credentials: Credentials<'_>, payload: &Value) -> Result<UpstreamReply> {
        let url = credentials.chat_messages_url();
        info!("Forwarding generation request to {}", url);
        debug!("Payload: {}", payload);

        let response = self
            .client
            .post(&url)
            .bearer_auth(credentials.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        // Read as text so error bodies can be relayed without parsing
        let body = response.text().await?;
        info!("Upstream responded with status {} ({} bytes)", status, body.len());

        Ok(UpstreamReply { status, body })
    }
}
