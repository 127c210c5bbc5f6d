use mongodb::Database;
use query_engine::{InMemoryRepository, MongoRepository, Repository, StorageResult};
use std::sync::Arc;

use crate::{brand, category, product, subcategory, user};

/// One repository per catalog collection.
pub struct Repositories<R> {
    pub categories: Arc<R>,
    pub subcategories: Arc<R>,
    pub brands: Arc<R>,
    pub products: Arc<R>,
    pub users: Arc<R>,
}

impl<R> Clone for Repositories<R> {
    fn clone(&self) -> Self {
        Self {
            categories: Arc::clone(&self.categories),
            subcategories: Arc::clone(&self.subcategories),
            brands: Arc::clone(&self.brands),
            products: Arc::clone(&self.products),
            users: Arc::clone(&self.users),
        }
    }
}

impl<R: Repository> Repositories<R> {
    pub fn all(&self) -> [(&'static str, &Arc<R>); 5] {
        [
            (category::COLLECTION, &self.categories),
            (subcategory::COLLECTION, &self.subcategories),
            (brand::COLLECTION, &self.brands),
            (product::COLLECTION, &self.products),
            (user::COLLECTION, &self.users),
        ]
    }
}

impl Repositories<MongoRepository> {
    pub fn mongo(db: &Database) -> Self {
        Self {
            categories: Arc::new(MongoRepository::new(db, category::COLLECTION, category::schema())),
            subcategories: Arc::new(MongoRepository::new(
                db,
                subcategory::COLLECTION,
                subcategory::schema(),
            )),
            brands: Arc::new(MongoRepository::new(db, brand::COLLECTION, brand::schema())),
            products: Arc::new(MongoRepository::new(db, product::COLLECTION, product::schema())),
            users: Arc::new(MongoRepository::new(db, user::COLLECTION, user::schema())),
        }
    }

    /// Create the unique indexes every collection declares.
    pub async fn init_indexes(&self) -> StorageResult<()> {
        for (name, repository) in self.all() {
            tracing::debug!(collection = name, "Ensuring indexes");
            repository.init_indexes().await?;
        }
        Ok(())
    }
}

impl Repositories<InMemoryRepository> {
    /// Process-local storage with category references resolvable.
    pub fn in_memory() -> Self {
        let categories = Arc::new(InMemoryRepository::new(category::schema()));

        Self {
            subcategories: Arc::new(
                InMemoryRepository::new(subcategory::schema())
                    .with_reference(category::COLLECTION, Arc::clone(&categories)),
            ),
            products: Arc::new(
                InMemoryRepository::new(product::schema())
                    .with_reference(category::COLLECTION, Arc::clone(&categories)),
            ),
            brands: Arc::new(InMemoryRepository::new(brand::schema())),
            users: Arc::new(InMemoryRepository::new(user::schema())),
            categories,
        }
    }
}

impl Default for Repositories<InMemoryRepository> {
    fn default() -> Self {
        Self::in_memory()
    }
}
