//! MongoDB-backed [`Repository`](crate::Repository).

pub mod convert;
pub mod repository;
pub mod translate;

pub use repository::MongoRepository;
