use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{envelope::Envelope, errors::ErrorReport};

/// Re-renders error envelopes with a `detail` field.
///
/// Only mounted in development; production envelopes never carry detail.
pub async fn expose_error_details(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    let rendered = Envelope::error(parts.status, report.message)
        .with_detail(report.detail)
        .into_response();
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, rendered.into_body())
}
