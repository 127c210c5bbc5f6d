//! Stable error codes attached to every failed request's log line.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//! use axum::http::StatusCode;
//!
//! let code = ErrorCode::Conflict;
//! assert_eq!(code.as_str(), "CONFLICT");
//! assert_eq!(code.code(), 1409);
//! assert_eq!(code.status_code(), StatusCode::CONFLICT);
//! ```

use axum::http::StatusCode;
use serde::Serialize;
use strum::{Display, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    /// Body was not JSON or did not match the payload shape
    JsonExtraction,
    InvalidPagination,
    /// Query string could not be decoded
    InvalidQuery,
    NotFound,
    RouteNotFound,
    /// Duplicate value on a unique field
    Conflict,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError
            | Self::JsonExtraction
            | Self::InvalidPagination
            | Self::InvalidQuery => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Numeric code for log queries: `1000 + status` for client errors,
    /// `5000` for server errors, with a per-kind offset inside 400/404.
    pub fn code(&self) -> i32 {
        let offset = match self {
            Self::JsonExtraction | Self::RouteNotFound => 10,
            Self::InvalidPagination => 20,
            Self::InvalidQuery => 30,
            _ => 0,
        };
        match self {
            Self::InternalError => 5000,
            other => 1000 + i32::from(other.status_code().as_u16()) + offset,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::JsonExtraction => "Failed to parse request body",
            Self::InvalidPagination => "Page and limit must be positive numbers",
            Self::InvalidQuery => "Invalid query string",
            Self::NotFound => "Resource not found",
            Self::RouteNotFound => "Route not found",
            Self::Conflict => "Resource already exists",
            Self::InternalError => "Internal server error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let all = [
            ErrorCode::ValidationError,
            ErrorCode::JsonExtraction,
            ErrorCode::InvalidPagination,
            ErrorCode::InvalidQuery,
            ErrorCode::NotFound,
            ErrorCode::RouteNotFound,
            ErrorCode::Conflict,
            ErrorCode::InternalError,
        ];
        let mut codes: Vec<i32> = all.iter().map(ErrorCode::code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_code_follows_status() {
        assert_eq!(ErrorCode::ValidationError.code(), 1400);
        assert_eq!(ErrorCode::InvalidPagination.code(), 1420);
        assert_eq!(ErrorCode::NotFound.code(), 1404);
        assert_eq!(ErrorCode::InternalError.code(), 5000);
    }

    #[test]
    fn test_display_matches_serialization() {
        let json = serde_json::to_string(&ErrorCode::InvalidPagination).unwrap();
        assert_eq!(json, format!("\"{}\"", ErrorCode::InvalidPagination));
        assert_eq!(ErrorCode::RouteNotFound.as_str(), "ROUTE_NOT_FOUND");
    }
}
