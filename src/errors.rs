use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("authorization denied: {description}")]
    AuthorizationDenied { description: String },

    #[error("missing state")]
    MissingState,

    #[error("missing authorization code")]
    MissingCode,

    #[error("invalid or expired state")]
    InvalidOrExpiredState,

    #[error("missing user/org in stored state")]
    CorruptState,

    #[error("token exchange failed with status {status}")]
    TokenExchangeFailure { status: u16, body: String },

    #[error("no credentials found")]
    CredentialsNotFound,

    #[error("failed to parse credentials")]
    CredentialsParse(#[source] serde_json::Error),

    #[error("missing access token")]
    MissingAccessToken,

    #[error("vendor request failed with status {status}")]
    VendorRequestFailure { status: u16, body: String },

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Vendor status and raw body for failures that carry them.
    pub fn vendor_response(&self) -> Option<(u16, &str)> {
        match self {
            AppError::TokenExchangeFailure { status, body }
            | AppError::VendorRequestFailure { status, body } => Some((*status, body.as_str())),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        tracing::warn!("vendor request failed: {}", e);
        AppError::Upstream(e.to_string())
    }
}

// Extractor rejections are reported in the same envelope as every other
// error instead of axum's plain-text bodies.

impl From<FormRejection> for AppError {
    fn from(e: FormRejection) -> Self {
        AppError::InvalidRequest(e.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::InvalidRequest(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::InvalidRequest(e.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AppError::AuthorizationDenied { description } => (
                StatusCode::BAD_REQUEST,
                "authorization_error",
                "authorization_denied",
                description.clone(),
            ),
            AppError::MissingState => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "missing_state",
                "Missing state".to_string(),
            ),
            AppError::MissingCode => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "missing_code",
                "Missing authorization code".to_string(),
            ),
            AppError::InvalidOrExpiredState => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "invalid_state",
                "Invalid state parameter".to_string(),
            ),
            AppError::CorruptState => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "corrupt_state",
                "Missing user/org from state".to_string(),
            ),
            AppError::TokenExchangeFailure { .. } => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                "token_exchange_failed",
                "Failed to exchange authorization code".to_string(),
            ),
            AppError::CredentialsNotFound => (
                StatusCode::NOT_FOUND,
                "not_found_error",
                "credentials_not_found",
                "No credentials found. Please reauthorize.".to_string(),
            ),
            AppError::CredentialsParse(e) => {
                tracing::error!("cached credentials unreadable: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "credentials_parse_failed",
                    "Failed to parse credentials".to_string(),
                )
            }
            AppError::MissingAccessToken => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "missing_access_token",
                "Missing access token".to_string(),
            ),
            AppError::VendorRequestFailure { .. } => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                "vendor_request_failed",
                "Failed to fetch contacts".to_string(),
            ),
            AppError::Upstream(e) => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                "upstream_failed",
                e.clone(),
            ),
            AppError::InvalidRequest(e) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "invalid_request",
                e.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
        };

        let mut error = json!({
            "message": msg,
            "type": error_type,
            "code": code,
        });
        // Vendor failures are data for the caller: pass the vendor's answer through.
        if let Some((vendor_status, details)) = self.vendor_response() {
            error["status_code"] = json!(vendor_status);
            error["details"] = json!(details);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
