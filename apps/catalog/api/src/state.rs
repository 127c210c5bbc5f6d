//! Shared application state passed to route builders.

use domain_catalog::Repositories;
use mongodb::{Client, Database};
use query_engine::MongoRepository;

/// Configuration, the MongoDB handles and the catalog repositories.
///
/// Cheap to clone: the client shares its connection pool and repositories
/// are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
    pub repositories: Repositories<MongoRepository>,
}
