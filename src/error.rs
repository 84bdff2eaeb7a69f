use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Every way `/api/generate` can fail. Each variant maps to exactly one
/// status code and a JSON body of the form `{"error": ..., "details"?: ...}`.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Server configuration error")]
    Configuration,

    #[error("Upstream API returned an error")]
    Upstream { status: u16, body: String },

    #[error("Unexpected internal server error")]
    Unexpected(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingField(_) => StatusCode::BAD_REQUEST,
            ProxyError::Configuration | ProxyError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            ProxyError::Upstream { body, .. } => Some(body.clone()),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            details,
        })
    }
}
