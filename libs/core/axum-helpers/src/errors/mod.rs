pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use validator::ValidationErrors;

use crate::envelope::Envelope;

/// Operational error raised inside handlers and rendered as an error envelope.
///
/// Every variant carries an HTTP status through [`AppError::status_code`];
/// only [`AppError::Internal`] is non-operational and hides its message from
/// clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("{0}")]
    InvalidPagination(String),

    #[error("{0}")]
    Validation(String),

    #[error("{}", validation_message(.0))]
    InvalidPayload(#[from] ValidationErrors),

    #[error("Invalid JSON body: {0}")]
    JsonRejection(#[from] JsonRejection),

    #[error("Invalid query string: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("{0}")]
    NotFound(String),

    #[error("Can't find {0} on this server")]
    RouteNotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Attached to error responses so the development middleware can expose
/// what went wrong without re-parsing the body.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub detail: String,
}

impl AppError {
    /// `"{resource} not found"`
    pub fn not_found(resource: &str) -> Self {
        Self::NotFound(format!("{resource} not found"))
    }

    pub fn status_code(&self) -> StatusCode {
        self.error_code().status_code()
    }

    /// `"fail"` for client errors, `"error"` otherwise.
    pub fn status(&self) -> &'static str {
        if self.status_code().is_client_error() {
            "fail"
        } else {
            "error"
        }
    }

    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidPagination(_) => ErrorCode::InvalidPagination,
            Self::Validation(_) | Self::InvalidPayload(_) => ErrorCode::ValidationError,
            Self::JsonRejection(_) => ErrorCode::JsonExtraction,
            Self::QueryRejection(_) => ErrorCode::InvalidQuery,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::RouteNotFound(_) => ErrorCode::RouteNotFound,
            Self::Conflict(_) => ErrorCode::Conflict,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Message safe to send to clients.
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => ErrorCode::InternalError.default_message().to_string(),
            other => other.to_string(),
        }
    }
}

fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    if messages.is_empty() {
        ErrorCode::ValidationError.default_message().to_string()
    } else {
        messages.join(", ")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        match &self {
            Self::Internal(_) => {
                tracing::error!(error_code = code.code(), error = ?self, "Request failed")
            }
            Self::JsonRejection(_) | Self::QueryRejection(_) => {
                tracing::warn!(error_code = code.code(), "{}", self)
            }
            _ => tracing::info!(error_code = code.code(), "{}", self),
        }

        let report = ErrorReport {
            message: self.public_message(),
            detail: format!("{self:?}"),
        };
        let mut response = Envelope::error(status, report.message.clone()).into_response();
        response.extensions_mut().insert(report);
        response
    }
}
