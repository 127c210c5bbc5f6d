use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Bson, DateTime, doc},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tracing::instrument;

use super::convert::{document_to_json, json_to_document, parse_object_id};
use super::translate::{filter_document, projection_document, sort_document};
use crate::error::StorageError;
use crate::projection::{ID_FIELD, VERSION_FIELD};
use crate::repository::{CollectionSchema, Document, Populate, Repository, StorageResult};
use crate::spec::{Criteria, QuerySpec};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Schema-aware repository over one MongoDB collection.
pub struct MongoRepository {
    database: Database,
    collection: Collection<bson::Document>,
    schema: CollectionSchema,
}

impl MongoRepository {
    pub fn new(db: &Database, collection_name: &str, schema: CollectionSchema) -> Self {
        Self {
            database: db.clone(),
            collection: db.collection::<bson::Document>(collection_name),
            schema,
        }
    }

    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    /// Create one unique index per unique schema field.
    pub async fn init_indexes(&self) -> StorageResult<()> {
        if self.schema.unique.is_empty() {
            return Ok(());
        }

        let indexes: Vec<IndexModel> = self
            .schema
            .unique
            .iter()
            .map(|field| {
                let mut keys = bson::Document::new();
                keys.insert(field.clone(), 1);
                IndexModel::builder()
                    .keys(keys)
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .sparse(true)
                            .name(format!("idx_{field}_unique"))
                            .build(),
                    )
                    .build()
            })
            .collect();

        self.collection
            .create_indexes(indexes)
            .await
            .map_err(map_mongo_error)?;
        tracing::info!(collection = %self.collection.name(), "Indexes created successfully");
        Ok(())
    }

    fn id_filter(&self, id: &str) -> StorageResult<bson::Document> {
        Ok(doc! { "_id": parse_object_id(ID_FIELD, id)? })
    }

    async fn populate(&self, mut document: bson::Document, populate: &[Populate]) -> StorageResult<Document> {
        for p in populate {
            let Ok(reference) = document.get_object_id(&p.path) else {
                continue;
            };

            let mut projection = bson::Document::new();
            for field in &p.select {
                projection.insert(field.clone(), 1);
            }

            let resolved = self
                .database
                .collection::<bson::Document>(&p.collection)
                .find_one(doc! { "_id": reference })
                .projection(projection)
                .await
                .map_err(map_mongo_error)?;

            document.insert(p.path.clone(), resolved.map_or(Bson::Null, Bson::Document));
        }
        Ok(document_to_json(document))
    }
}

#[async_trait]
impl Repository for MongoRepository {
    #[instrument(skip(self, spec), fields(collection = %self.collection.name()))]
    async fn find(&self, spec: &QuerySpec) -> StorageResult<Vec<Document>> {
        let filter = filter_document(&self.schema, &spec.criteria)?;
        let limit = i64::try_from(spec.pagination.limit()).unwrap_or(i64::MAX);

        let cursor = self
            .collection
            .find(filter)
            .sort(sort_document(&spec.sort))
            .skip(spec.pagination.offset())
            .limit(limit)
            .projection(projection_document(&spec.projection))
            .await
            .map_err(map_mongo_error)?;

        let documents: Vec<bson::Document> = cursor.try_collect().await.map_err(map_mongo_error)?;
        Ok(documents.into_iter().map(document_to_json).collect())
    }

    #[instrument(skip(self, criteria), fields(collection = %self.collection.name()))]
    async fn count(&self, criteria: &Criteria) -> StorageResult<u64> {
        let filter = filter_document(&self.schema, criteria)?;
        self.collection
            .count_documents(filter)
            .await
            .map_err(map_mongo_error)
    }

    #[instrument(skip(self, populate), fields(collection = %self.collection.name()))]
    async fn find_by_id(&self, id: &str, populate: &[Populate]) -> StorageResult<Option<Document>> {
        let found = self
            .collection
            .find_one(self.id_filter(id)?)
            .await
            .map_err(map_mongo_error)?;
        match found {
            Some(document) => Ok(Some(self.populate(document, populate).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, criteria, populate), fields(collection = %self.collection.name()))]
    async fn find_one(
        &self,
        criteria: &Criteria,
        populate: &[Populate],
    ) -> StorageResult<Option<Document>> {
        let found = self
            .collection
            .find_one(filter_document(&self.schema, criteria)?)
            .await
            .map_err(map_mongo_error)?;
        match found {
            Some(document) => Ok(Some(self.populate(document, populate).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, document), fields(collection = %self.collection.name()))]
    async fn insert(&self, document: Document) -> StorageResult<Document> {
        self.schema.check_required(&document)?;
        let mut stored = json_to_document(&self.schema, &document)?;

        if matches!(stored.get(ID_FIELD), Some(Bson::Null)) {
            stored.remove(ID_FIELD);
        }
        if self.schema.timestamps {
            let now = DateTime::now();
            stored.insert("createdAt", now);
            stored.insert("updatedAt", now);
        }
        stored.insert(VERSION_FIELD, 0);

        let result = self
            .collection
            .insert_one(&stored)
            .await
            .map_err(map_mongo_error)?;
        stored.insert(ID_FIELD, result.inserted_id);

        Ok(document_to_json(stored))
    }

    #[instrument(skip(self, changes), fields(collection = %self.collection.name()))]
    async fn update_by_id(&self, id: &str, mut changes: Document) -> StorageResult<Option<Document>> {
        let filter = self.id_filter(id)?;
        for immutable in [ID_FIELD, "createdAt", VERSION_FIELD] {
            changes.remove(immutable);
        }
        self.schema.check_required_changes(&changes)?;

        let mut set = json_to_document(&self.schema, &changes)?;
        if self.schema.timestamps {
            set.insert("updatedAt", DateTime::now());
        }

        let updated = self
            .collection
            .find_one_and_update(filter, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_mongo_error)?;

        Ok(updated.map(document_to_json))
    }

    #[instrument(skip(self), fields(collection = %self.collection.name()))]
    async fn delete_by_id(&self, id: &str) -> StorageResult<Option<Document>> {
        let deleted = self
            .collection
            .find_one_and_delete(self.id_filter(id)?)
            .await
            .map_err(map_mongo_error)?;
        Ok(deleted.map(document_to_json))
    }
}

/// Classify a driver error; duplicate-key violations name the offending field.
pub fn map_mongo_error(err: mongodb::error::Error) -> StorageError {
    let duplicate_message = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY_CODE => {
            Some(e.message.clone())
        }
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY_CODE => Some(e.message.clone()),
        _ => None,
    };

    match duplicate_message {
        Some(message) => {
            let (field, value) = parse_duplicate_key(&message);
            StorageError::duplicate(field, value)
        }
        None => {
            tracing::error!(error = %err, "MongoDB operation failed");
            StorageError::Backend(err.to_string())
        }
    }
}

/// Extract field and value from
/// `E11000 duplicate key error collection: shop.brands index: name_1 dup key: { name: "Acme" }`.
pub fn parse_duplicate_key(message: &str) -> (String, String) {
    if let Some(body) = message
        .split_once("dup key: {")
        .and_then(|(_, rest)| rest.rsplit_once('}'))
        .map(|(body, _)| body)
    {
        if let Some((field, value)) = body.split_once(':') {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            return (field.trim().to_string(), value.to_string());
        }
    }

    let field = message
        .split_once("index: ")
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .map(|index| index.trim_end_matches("_1").trim_end_matches("_-1"))
        .unwrap_or("field");
    (field.to_string(), String::new())
}
