use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_graphql::ErrorExtensions;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Seeding failed: {0}")]
    SeedWriteError(String),

    #[error("Document too large: {0}")]
    SizeLimitError(String),

    #[error("Backend rejected the request: {0}")]
    BackendRejectedError(String),

    #[error("Backend unavailable: {0}")]
    TransientBackendError(String),

    #[error("Malformed backend response: {0}")]
    MalformedResponseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::SeedWriteError(_) => "SEED_WRITE_ERROR",
            AppError::SizeLimitError(_) => "SIZE_LIMIT_ERROR",
            AppError::BackendRejectedError(_) => "BACKEND_REJECTED_ERROR",
            AppError::TransientBackendError(_) => "TRANSIENT_BACKEND_ERROR",
            AppError::MalformedResponseError(_) => "MALFORMED_RESPONSE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller may reasonably retry the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::TransientBackendError(_))
    }

    /// Maps a raw backend failure message onto the error taxonomy.
    ///
    /// `context` is a short phrase naming the operation, e.g. "loading questions".
    pub fn from_backend_message(context: &str, message: &str) -> Self {
        let lower = message.to_lowercase();

        if lower.contains("exceeds the maximum allowed size")
            || lower.contains("too large")
            || lower.contains("bsonobjecttoolarge")
        {
            return AppError::SizeLimitError(format!(
                "{} failed because the record is larger than the store accepts. \
                 Inline media (embedded data URIs) is the usual cause; use smaller or fewer embedded files. \
                 Original error: {}",
                context, message
            ));
        }

        if lower.contains("permission_denied")
            || lower.contains("insufficient permissions")
            || lower.contains("unauthenticated")
            || lower.contains("not authorized")
            || lower.contains("authentication failed")
            || lower.contains("invalid_argument")
        {
            return AppError::BackendRejectedError(format!(
                "{} was refused by the database. Retrying will not help; \
                 check the credentials, the database security rules and the request. Original error: {}",
                context, message
            ));
        }

        if lower.contains("offline")
            || lower.contains("unreachable")
            || lower.contains("unavailable")
            || lower.contains("connection")
            || lower.contains("timed out")
            || lower.contains("timeout")
        {
            return AppError::TransientBackendError(format!(
                "{} failed: the database appears to be offline or unreachable. \
                 Check the network connection and try again. Original error: {}",
                context, message
            ));
        }

        if lower.contains("quota") || lower.contains("limit exceeded") || lower.contains("resource_exhausted") {
            return AppError::TransientBackendError(format!(
                "{} failed: the database operation quota may be exhausted. \
                 Check the plan limits or try again later. Original error: {}",
                context, message
            ));
        }

        AppError::TransientBackendError(format!(
            "{} failed: {}. Check the database security rules and server logs.",
            context, message
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub kind: &'static str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::SeedWriteError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SizeLimitError(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::BackendRejectedError(_) => StatusCode::BAD_GATEWAY,
            AppError::TransientBackendError(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::MalformedResponseError(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
            kind: self.error_code(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::from_backend_message("Database operation", &err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON serialization error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return AppError::MalformedResponseError(format!(
                "could not decode the database response: {}. Check server-side logs and configuration.",
                err
            ));
        }
        AppError::from_backend_message("Database request", &err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<async_graphql::Error> for AppError {
    fn from(err: async_graphql::Error) -> Self {
        AppError::InternalError(err.message)
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_err, e| {
            e.set("code", self.error_code());
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;
