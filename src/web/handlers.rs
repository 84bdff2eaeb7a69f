use actix_web::{web, HttpResponse, Responder};
use anyhow::{anyhow, Context as _};
use log::{debug, error, info};
use serde::de::IgnoredAny;
use serde_json::{json, Value};

use crate::error::ProxyError;
use crate::web::models::{first_missing_field, ForwardPayload};
use crate::AppState;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Generation proxy endpoint
pub async fn generate(
    data: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ProxyError> {
    match forward_generation(&data, &body).await {
        Ok(answer) => {
            info!("Relaying upstream answer to client ({} bytes)", answer.len());
            Ok(HttpResponse::Ok()
                .content_type("application/json")
                .body(answer))
        }
        Err(e) => {
            match &e {
                ProxyError::Unexpected(cause) => error!("Unexpected error: {:#}", cause),
                ProxyError::Upstream { status, body } => {
                    error!("Upstream API error: status {}", status);
                    error!("Upstream body: {}", body);
                }
                other => error!("{}", other),
            }
            Err(e)
        }
    }
}

/// Returns the upstream success body verbatim once it is known to be JSON.
async fn forward_generation(state: &AppState, raw: &[u8]) -> Result<String, ProxyError> {
    let credentials = state.upstream.credentials()?;

    let body: Value = serde_json::from_slice(raw).context("request body is not valid JSON")?;
    debug!("Received generation request: {}", body);
    let Value::Object(body) = body else {
        return Err(anyhow!("request body is not a JSON object").into());
    };

    if let Some(field) = first_missing_field(&body) {
        return Err(ProxyError::MissingField(field));
    }
    debug!("Required fields present");

    let payload = serde_json::to_value(ForwardPayload::from_body(body))
        .context("failed to encode forward payload")?;

    let reply = state.backend.send(credentials, &payload).await?;
    if !reply.is_success() {
        return Err(ProxyError::Upstream {
            status: reply.status,
            body: reply.body,
        });
    }

    serde_json::from_str::<IgnoredAny>(&reply.body).context("upstream body is not valid JSON")?;
    debug!("Upstream answer: {}", reply.body);
    Ok(reply.body)
}
