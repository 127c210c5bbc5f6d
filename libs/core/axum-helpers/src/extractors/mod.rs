//! Custom extractors for Axum handlers.
//!
//! Rejections are [`AppError`](crate::errors::AppError)s so they render as
//! error envelopes like every other failure.

pub mod query_pairs;
pub mod validated_json;

pub use query_pairs::QueryPairs;
pub use validated_json::ValidatedJson;
