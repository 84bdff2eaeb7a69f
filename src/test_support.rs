//! Fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tera::Tera;

use crate::config::{Credentials, UpstreamConfig};
use crate::upstream::{ChatBackend, UpstreamReply};
use crate::web::models::{GenerationRequest, GenerationResult};
use crate::wizard::client::GenerateApi;
use crate::AppState;

pub enum Canned {
    Reply(u16, &'static str),
    Fail,
}

/// Chat API stand-in that records `(url, api key, payload)` per call.
pub struct RecordingBackend {
    canned: Canned,
    sent: Mutex<Vec<(String, String, Value)>>,
}

impl RecordingBackend {
    pub fn new(canned: Canned) -> Arc<Self> {
        Arc::new(Self {
            canned,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<(String, String, Value)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for RecordingBackend {
    async fn send(
        &self,
        credentials: Credentials<'_>,
        payload: &Value,
    ) -> anyhow::Result<UpstreamReply> {
        self.sent.lock().unwrap().push((
            credentials.chat_messages_url(),
            credentials.api_key.to_string(),
            payload.clone(),
        ));
        match self.canned {
            Canned::Reply(status, body) => Ok(UpstreamReply {
                status,
                body: body.to_string(),
            }),
            Canned::Fail => Err(anyhow::anyhow!("connection reset")),
        }
    }
}

/// `/api/generate` stand-in for the wizard: replies are queued up front and
/// every request is kept for inspection.
#[derive(Clone, Default)]
pub struct ScriptedApi {
    replies: Arc<Mutex<VecDeque<Result<GenerationResult, String>>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedApi {
    pub fn reply(self, reply: Result<GenerationResult, String>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerateApi for ScriptedApi {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, String> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply".to_string()))
    }
}

pub fn answer(text: &str, conversation: Option<&str>) -> Result<GenerationResult, String> {
    Ok(GenerationResult {
        answer: text.to_string(),
        conversation_id: conversation.map(str::to_string),
    })
}

pub fn valid_body() -> Map<String, Value> {
    let value = json!({
        "slideTheme": "新商品の紹介",
        "audience": "クライアント",
        "purpose": "魅力を伝える",
        "keyMessage": "コスト20%削減",
        "slideCount": 10,
        "designStyle": "ビジネス",
        "tone": "フォーマル",
        "fontStyle": "メイリオ",
        "mainColor": "#2563eb",
        "subColor": "#d1d5db",
    });
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

pub fn configured() -> UpstreamConfig {
    UpstreamConfig::new("https://dify.example.com/v1", "secret-key")
}

/// App state with the real page template loaded.
pub fn app_state(
    upstream: UpstreamConfig,
    backend: Arc<RecordingBackend>,
    api: ScriptedApi,
) -> AppState {
    let mut tera = Tera::default();
    tera.add_raw_template("index.html", include_str!("../templates/index.html"))
        .unwrap();
    tera.autoescape_on(vec![".html"]);
    AppState::new(tera, upstream, backend, Arc::new(api))
}
