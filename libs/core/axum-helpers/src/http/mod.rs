//! HTTP middleware module.
//!
//! This module provides HTTP-level middleware for:
//! - CORS configuration
//! - Security headers
//! - Development-only error detail in error envelopes
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{create_cors_layer, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(security_headers))
//!     .layer(create_cors_layer(&origins));
//! ```

pub mod cors;
pub mod error_detail;
pub mod security;

pub use cors::create_cors_layer;
pub use error_detail::expose_error_details;
pub use security::security_headers;
