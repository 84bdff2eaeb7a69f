use std::env;

use log::warn;

use crate::error::ProxyError;

/// Settings for the outbound chat-messages API.
///
/// Both values are optional at load time. A missing value does not stop the
/// server from starting; every proxied request fails instead.
#[derive(Debug, Clone, Default)]
pub struct UpstreamConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

/// Borrowed, validated view of [`UpstreamConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub base_url: &'a str,
    pub api_key: &'a str,
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: non_empty(base_url.into()),
            api_key: non_empty(api_key.into()),
        }
    }

    pub fn from_env() -> Self {
        let config = Self {
            base_url: env::var("DIFY_API_URL").ok().and_then(non_empty),
            api_key: env::var("DIFY_API_KEY").ok().and_then(non_empty),
        };
        if config.credentials().is_err() {
            warn!("DIFY_API_URL or DIFY_API_KEY is not set; /api/generate will reject every request");
        }
        config
    }

    pub fn credentials(&self) -> Result<Credentials<'_>, ProxyError> {
        match (self.base_url.as_deref(), self.api_key.as_deref()) {
            (Some(base_url), Some(api_key)) => Ok(Credentials { base_url, api_key }),
            _ => Err(ProxyError::Configuration),
        }
    }
}

impl Credentials<'_> {
    pub fn chat_messages_url(&self) -> String {
        format!("{}/chat-messages", self.base_url.trim_end_matches('/'))
    }
}

/// Where the web server listens and where it finds its assets.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub template_glob: String,
    pub static_dir: String,
    /// Origin the wizard uses to reach `/api/generate`.
    pub api_base: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let template_glob =
            env::var("TEMPLATE_GLOB").unwrap_or_else(|_| "templates/**/*".to_string());
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string());
        let api_base = env::var("GENERATE_API_BASE")
            .ok()
            .and_then(non_empty)
            .unwrap_or_else(|| loopback_origin(&host, port));

        Self {
            host,
            port,
            template_glob,
            static_dir,
            api_base,
        }
    }
}

// A wildcard bind address is not something a client can connect to
fn loopback_origin(host: &str, port: u16) -> String {
    let host = match host {
        "0.0.0.0" | "::" | "[::]" => "127.0.0.1",
        other => other,
    };
    format!("http://{}:{}", host, port)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_count_as_unset() {
        let config = UpstreamConfig::new("", "key");
        assert!(matches!(config.credentials(), Err(ProxyError::Configuration)));

        let config = UpstreamConfig::new("https://api.example.com/v1", "");
        assert!(config.credentials().is_err());
    }

    #[test]
    fn whitespace_values_are_kept_as_set() {
        let config = UpstreamConfig::new(" ", "  ");
        let creds = config.credentials().unwrap();
        assert_eq!(creds.base_url, " ");
        assert_eq!(creds.api_key, "  ");
    }

    #[test]
    fn wildcard_bind_maps_to_loopback() {
        assert_eq!(loopback_origin("0.0.0.0", 8080), "http://127.0.0.1:8080");
        assert_eq!(loopback_origin("localhost", 3000), "http://localhost:3000");
    }

    #[test]
    fn chat_messages_url_joins_base() {
        let config = UpstreamConfig::new("https://api.example.com/v1/", "key");
        let creds = config.credentials().unwrap();
        assert_eq!(creds.chat_messages_url(), "https://api.example.com/v1/chat-messages");
    }
}
