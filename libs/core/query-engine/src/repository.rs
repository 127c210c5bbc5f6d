use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StorageError;
use crate::spec::{Criteria, QuerySpec};

/// A stored document as a JSON object. `_id` is the hex id string.
pub type Document = Map<String, Value>;

pub type StorageResult<T> = Result<T, StorageError>;

/// Replace a reference field with a subset of the referenced document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Populate {
    /// Field holding the referenced id.
    pub path: String,
    /// Collection the id points into.
    pub collection: String,
    /// Fields to keep from the referenced document (`_id` always kept).
    pub select: Vec<String>,
}

impl Populate {
    pub fn new(path: &str, collection: &str, select: &[&str]) -> Self {
        Self {
            path: path.to_string(),
            collection: collection.to_string(),
            select: select.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Storage rules for one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSchema {
    pub name: String,
    /// Fields that must not be absent or null on insert.
    pub required: Vec<String>,
    /// Fields backed by a unique index.
    pub unique: Vec<String>,
    /// Fields holding ids of other documents.
    pub object_id_fields: Vec<String>,
    /// Stamp `createdAt`/`updatedAt`.
    pub timestamps: bool,
}

impl CollectionSchema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            timestamps: true,
            ..Default::default()
        }
    }

    pub fn required(mut self, fields: &[&str]) -> Self {
        self.required = fields.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn unique(mut self, fields: &[&str]) -> Self {
        self.unique = fields.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn references(mut self, fields: &[&str]) -> Self {
        self.object_id_fields = fields.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn is_object_id_field(&self, field: &str) -> bool {
        field == "_id" || self.object_id_fields.iter().any(|f| f == field)
    }

    pub fn is_timestamp_field(&self, field: &str) -> bool {
        self.timestamps && (field == "createdAt" || field == "updatedAt")
    }

    /// Every required field present and non-null.
    pub fn check_required(&self, document: &Document) -> StorageResult<()> {
        let missing: Vec<&str> = self
            .required
            .iter()
            .filter(|f| matches!(document.get(f.as_str()), None | Some(Value::Null)))
            .map(String::as_str)
            .collect();
        self.missing_error(&missing)
    }

    /// A partial update must not null out a required field.
    pub fn check_required_changes(&self, changes: &Document) -> StorageResult<()> {
        let cleared: Vec<&str> = self
            .required
            .iter()
            .filter(|f| matches!(changes.get(f.as_str()), Some(Value::Null)))
            .map(String::as_str)
            .collect();
        self.missing_error(&cleared)
    }

    fn missing_error(&self, fields: &[&str]) -> StorageResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        Err(StorageError::Validation(format!(
            "{} validation failed: {} is required",
            self.name,
            fields.join(", ")
        )))
    }
}

/// Storage access for one collection.
///
/// Implementations must not swallow failures: every backend error surfaces
/// as a [`StorageError`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    /// One page of matching documents, sorted and projected.
    async fn find(&self, spec: &QuerySpec) -> StorageResult<Vec<Document>>;

    /// Number of documents matching `criteria`, ignoring pagination.
    async fn count(&self, criteria: &Criteria) -> StorageResult<u64>;

    async fn find_by_id(&self, id: &str, populate: &[Populate]) -> StorageResult<Option<Document>>;

    async fn find_one(
        &self,
        criteria: &Criteria,
        populate: &[Populate],
    ) -> StorageResult<Option<Document>>;

    /// Insert and return the stored document, including generated fields.
    async fn insert(&self, document: Document) -> StorageResult<Document>;

    /// Set the given fields and return the updated document, or `None` if no
    /// document has this id.
    async fn update_by_id(&self, id: &str, changes: Document) -> StorageResult<Option<Document>>;

    /// Remove and return the document, or `None` if no document has this id.
    async fn delete_by_id(&self, id: &str) -> StorageResult<Option<Document>>;
}
