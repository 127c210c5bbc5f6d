//! Uniform JSON envelope for every API response.
//!
//! Success:
//!
//! ```json
//! { "success": true, "statusCode": 200, "message": "Brands retrieved successfully",
//!   "data": { ... }, "timestamp": "2024-05-01T10:00:00.000Z" }
//! ```
//!
//! Error:
//!
//! ```json
//! { "success": false, "statusCode": 404, "message": "Brand not found",
//!   "timestamp": "2024-05-01T10:00:00.000Z" }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response wrapper built once per response.
///
/// Only [`Envelope::success`] and [`Envelope::error`] construct one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T = Value> {
    success: bool,
    status_code: u16,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    timestamp: String,
    /// Error detail, only attached in development mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            message: message.into(),
            data,
            timestamp: now(),
            detail: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl Envelope {
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: status.as_u16(),
            message: message.into(),
            data: None,
            timestamp: now(),
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
