use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template invalid: {0}")]
    TemplateInvalid(String),

    #[error("Template too sparse: {0}")]
    TemplateTooSparse(String),

    #[error("Road graph unavailable: {0}")]
    GraphUnavailable(String),

    #[error("No path between nodes {from} and {to}")]
    NoPath { from: u64, to: u64 },

    #[error("Connector too long: {length_m:.1}m exceeds {max_m:.1}m")]
    ConnectorTooLong { length_m: f64, max_m: f64 },

    #[error("Distance fit failed: {0}")]
    FitFailed(String),

    #[error("Output unavailable: {0}")]
    OutputUnavailable(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable kind string carried in the response envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BadRequest",
            AppError::TemplateNotFound(_) => "TemplateNotFound",
            AppError::TemplateInvalid(_) => "TemplateInvalid",
            AppError::TemplateTooSparse(_) => "TemplateTooSparse",
            AppError::GraphUnavailable(_) => "GraphUnavailable",
            AppError::NoPath { .. } => "NoPath",
            AppError::ConnectorTooLong { .. } => "ConnectorTooLong",
            AppError::FitFailed(_) => "FitFailed",
            AppError::OutputUnavailable(_) => "OutputUnavailable",
            AppError::Cancelled => "Cancelled",
            AppError::Internal(_) => "Internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::TemplateInvalid(_)
            | AppError::TemplateTooSparse(_) => StatusCode::BAD_REQUEST,
            AppError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Convert AppError into the {ok:false, error:{kind, message}} envelope
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                "Internal server error".to_string()
            }
            AppError::GraphUnavailable(e) => {
                tracing::error!("Road graph unavailable: {}", e);
                self.to_string()
            }
            AppError::OutputUnavailable(e) => {
                tracing::error!("Output unavailable: {}", e);
                self.to_string()
            }
            AppError::FitFailed(e) => {
                tracing::warn!("Distance fit failed: {}", e);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "ok": false,
            "error": {
                "kind": self.kind(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
