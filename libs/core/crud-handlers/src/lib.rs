//! # CRUD Handlers
//!
//! Generic list/get/create/update/delete operations over any
//! [`Repository`](query_engine::Repository), parameterized by a
//! [`ResourceDef`] instead of per-resource code.
//!
//! ```ignore
//! use crud_handlers::{CrudHandlers, ResourceDef, router};
//! use query_engine::{CollectionSchema, InMemoryRepository};
//! use std::sync::Arc;
//!
//! let repository = Arc::new(InMemoryRepository::new(CollectionSchema::new("Brand")));
//! let handlers = CrudHandlers::new(repository, ResourceDef::new("Brand").slug_from("name"));
//! let brands = router::<_, CreateBrand, UpdateBrand>(handlers);
//! ```
//!
//! Every operation answers with an [`Envelope`](axum_helpers::Envelope) or
//! an [`AppError`](axum_helpers::AppError); storage failures are never
//! swallowed.

pub mod handlers;
pub mod payload;
pub mod presentation;
pub mod resource;
pub mod router;
pub mod slug;

pub use handlers::{CrudHandlers, parent_filter};
pub use payload::{Payload, parse_payload, to_document};
pub use presentation::Presentation;
pub use resource::ResourceDef;
pub use router::{nested_router, router};
pub use slug::slugify;
