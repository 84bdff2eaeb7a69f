pub mod config;
pub mod error;
pub mod upstream;
pub mod web;
pub mod wizard;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use tera::Tera;
use tokio::sync::Mutex;

use config::UpstreamConfig;
use upstream::ChatBackend;
use wizard::client::GenerateApi;
use wizard::Wizard;

// App state structure
pub struct AppState {
    pub tera: Tera,
    pub upstream: UpstreamConfig,
    pub backend: Arc<dyn ChatBackend>,
    // The single browser session this server drives; locked for the whole
    // of a generate/modify round-trip.
    pub wizard: Mutex<Wizard<Arc<dyn GenerateApi>>>,
}

impl AppState {
    pub fn new(
        tera: Tera,
        upstream: UpstreamConfig,
        backend: Arc<dyn ChatBackend>,
        api: Arc<dyn GenerateApi>,
    ) -> Self {
        Self {
            tera,
            upstream,
            backend,
            wizard: Mutex::new(Wizard::new(api)),
        }
    }
}
