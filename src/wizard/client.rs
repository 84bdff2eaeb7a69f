use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::Value;

use crate::web::models::{is_truthy, GenerationRequest, GenerationResult};

const UNKNOWN_ERROR: &str = "An unknown error occurred.";

/// How the wizard reaches `/api/generate`. Failures carry the message that
/// will be shown to the user as-is.
#[async_trait]
pub trait GenerateApi: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, String>;
}

#[async_trait]
impl<T: GenerateApi + ?Sized> GenerateApi for Arc<T> {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, String> {
        (**self).generate(request).await
    }
}

pub struct HttpGenerateApi {
    endpoint: String,
    client: Client,
}

impl HttpGenerateApi {
    /// `base_url` is the origin serving the proxy, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl GenerateApi for HttpGenerateApi {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, String> {
        debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| non_empty_message(e.to_string()))?;

        let ok = response.status().is_success();
        let body: Value = response
            .json()
            .await
            .map_err(|e| non_empty_message(e.to_string()))?;

        if !ok {
            let message = failure_message(&body);
            error!("Generation failed: {}", message);
            return Err(message);
        }

        serde_json::from_value(body).map_err(|e| non_empty_message(e.to_string()))
    }
}

/// Turns a proxy error body into a user-facing message.
///
/// A string `details` holds the upstream body verbatim. It is decoded when it
/// is JSON; when it is not, the raw text is the message.
pub fn failure_message(body: &Value) -> String {
    let info = match body.get("details").filter(|d| is_truthy(d)) {
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(parsed) => parsed,
            Err(_) => return raw.clone(),
        },
        Some(details) => details.clone(),
        None => body.clone(),
    };

    match info.get("message") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        _ => non_empty_message(info.to_string()),
    }
}

fn non_empty_message(message: String) -> String {
    if message.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}
