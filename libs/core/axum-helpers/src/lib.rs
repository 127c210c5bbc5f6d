//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog services.
//!
//! ## Modules
//!
//! - **[`envelope`]**: The uniform success/error response body
//! - **[`errors`]**: Operational error taxonomy with error codes
//! - **[`extractors`]**: Validated JSON bodies and raw query pairs
//! - **[`http`]**: Middleware (CORS, security headers, development error detail)
//! - **[`server`]**: Router composition, health checks, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let router = create_router(Router::new(), &config);
//!     create_app(router, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod envelope;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use envelope::Envelope;

pub use errors::{AppError, ErrorCode, ErrorReport};

pub use extractors::{QueryPairs, ValidatedJson};

pub use http::{create_cors_layer, expose_error_details, security_headers};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
