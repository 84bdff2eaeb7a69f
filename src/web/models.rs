use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields that must be present and truthy, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 10] = [
    "slideTheme",
    "audience",
    "purpose",
    "keyMessage",
    "slideCount",
    "designStyle",
    "tone",
    "fontStyle",
    "mainColor",
    "subColor",
];

/// Query sent upstream when the caller supplies none.
pub const DEFAULT_QUERY: &str = "プロンプト生成";

/// Fixed end-user identifier reported to the chat API.
pub const UPSTREAM_USER: &str = "slide-prompt-generator-user-1";

pub const DEFAULT_SLIDE_COUNT: u32 = 10;

/// Everything the wizard collects across its first three steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub slide_theme: String,
    pub audience: String,
    pub purpose: String,
    pub key_message: String,
    pub slide_count: u32,
    pub design_style: String,
    pub tone: String,
    pub font_style: String,
    pub main_color: String,
    pub sub_color: String,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            slide_theme: String::new(),
            audience: String::new(),
            purpose: String::new(),
            key_message: String::new(),
            slide_count: DEFAULT_SLIDE_COUNT,
            design_style: String::new(),
            tone: String::new(),
            font_style: String::new(),
            main_color: String::new(),
            sub_color: String::new(),
        }
    }
}

/// Body of `POST /api/generate` as the wizard sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(flatten)]
    pub form: FormData,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Success payload relayed from the chat API. Only the fields the wizard
/// reads are typed; the proxy itself passes the JSON through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Payload for `<base-url>/chat-messages`.
#[derive(Debug, Serialize)]
pub struct ForwardPayload {
    pub inputs: Map<String, Value>,
    pub query: Value,
    pub response_mode: &'static str,
    pub user: &'static str,
    pub conversation_id: Value,
}

impl ForwardPayload {
    /// Splits a validated request body into the chat API's shape: `query` and
    /// `conversation_id` are lifted out, everything else becomes `inputs`.
    pub fn from_body(mut body: Map<String, Value>) -> Self {
        let query = body
            .remove("query")
            .filter(is_truthy)
            .unwrap_or_else(|| Value::String(DEFAULT_QUERY.to_string()));
        let conversation_id = body
            .remove("conversation_id")
            .filter(is_truthy)
            .unwrap_or_else(|| Value::String(String::new()));

        Self {
            inputs: body,
            query,
            response_mode: "blocking",
            user: UPSTREAM_USER,
            conversation_id,
        }
    }
}

/// JSON truthiness: null, false, zero and the empty string are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns the first required field that is absent or falsy.
pub fn first_missing_field(body: &Map<String, Value>) -> Option<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .find(|key| !body.get(*key).is_some_and(is_truthy))
}
