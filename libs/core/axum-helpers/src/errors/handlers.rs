use axum::{
    extract::OriginalUri,
    response::{IntoResponse, Response},
};

use super::AppError;

/// Fallback for unmatched routes.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    AppError::RouteNotFound(uri.path().to_string()).into_response()
}
