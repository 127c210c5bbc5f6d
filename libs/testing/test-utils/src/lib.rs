//! Shared test utilities for the catalog crates
//!
//! - `TestMongo`: MongoDB container with automatic cleanup
//! - `TestDataBuilder`: Deterministic names, ids and request payloads
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore] // Requires Docker
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let db = mongo.database("my_mongo_test");
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!
//!     let body = builder.brand("main");
//! }
//! ```

mod mongo;

pub use mongo::TestMongo;

use mongodb::bson::oid::ObjectId;
use serde_json::{Value, json};

/// Builder for test data with deterministic values
///
/// The same seed always yields the same names and ids, so failures are
/// reproducible.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed derived from the test name.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_brand");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic, well-formed ObjectId hex string.
    pub fn object_id(&self) -> String {
        let seed = self.seed.to_be_bytes();
        let mut bytes = [0u8; 12];
        bytes[..8].copy_from_slice(&seed);
        bytes[8..].copy_from_slice(&seed[..4]);
        ObjectId::from_bytes(bytes).to_hex()
    }

    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("brand", "main"), "test-brand-7-main");
    /// ```
    /// Short enough for the 32-character name limits.
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed % 100_000, suffix)
    }

    pub fn category(&self, suffix: &str) -> Value {
        json!({ "name": self.name("category", suffix) })
    }

    pub fn brand(&self, suffix: &str) -> Value {
        json!({ "name": self.name("brand", suffix) })
    }

    pub fn subcategory(&self, suffix: &str, category_id: &str) -> Value {
        json!({ "name": self.name("sub", suffix), "category": category_id })
    }

    pub fn product(&self, suffix: &str, category_id: &str, price: f64) -> Value {
        json!({
            "title": self.name("product", suffix),
            "description": format!("A product used by test {} ({})", self.seed, suffix),
            "quantity": 10,
            "price": price,
            "imageCover": "cover.png",
            "category": category_id,
        })
    }
}
