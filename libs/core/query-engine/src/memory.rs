//! In-process [`Repository`] used by tests and local runs.
//!
//! Behaves like the MongoDB backend where handlers can observe it: ObjectId
//! ids, schema-driven required/unique/reference checks, timestamp stamping,
//! filter coercion, sort ordering across value types and populate.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::StorageError;
use crate::filter::{Condition, equality_candidates, range_operand};
use crate::projection::{ID_FIELD, VERSION_FIELD};
use crate::repository::{CollectionSchema, Document, Populate, Repository, StorageResult};
use crate::sort::SortDirection;
use crate::spec::{Criteria, QuerySpec};

const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

#[derive(Default)]
struct State {
    documents: Vec<Document>,
    last_stamp: Option<DateTime<Utc>>,
}

impl State {
    /// Strictly increasing timestamps, so creation order is always sortable.
    fn next_stamp(&mut self) -> String {
        let mut now = Utc::now();
        if let Some(last) = self.last_stamp {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_stamp = Some(now);
        now.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

pub struct InMemoryRepository {
    schema: CollectionSchema,
    state: RwLock<State>,
    references: HashMap<String, Arc<InMemoryRepository>>,
}

impl InMemoryRepository {
    pub fn new(schema: CollectionSchema) -> Self {
        Self {
            schema,
            state: RwLock::new(State::default()),
            references: HashMap::new(),
        }
    }

    /// Make `collection` resolvable for populate.
    pub fn with_reference(mut self, collection: &str, repository: Arc<InMemoryRepository>) -> Self {
        self.references.insert(collection.to_string(), repository);
        self
    }

    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn get(&self, id: &str) -> Option<Document> {
        self.state
            .read()
            .await
            .documents
            .iter()
            .find(|d| has_id(d, id))
            .cloned()
    }

    fn check_references(&self, document: &Document) -> StorageResult<()> {
        for field in &self.schema.object_id_fields {
            match document.get(field) {
                None | Some(Value::Null) => {}
                Some(Value::Array(items)) => {
                    for item in items {
                        if !is_object_id(item) {
                            return Err(StorageError::cast(field, display_value(item)));
                        }
                    }
                }
                Some(value) if is_object_id(value) => {}
                Some(other) => return Err(StorageError::cast(field, display_value(other))),
            }
        }
        Ok(())
    }

    fn check_unique(
        &self,
        documents: &[Document],
        candidate: &Document,
        skip_id: Option<&str>,
    ) -> StorageResult<()> {
        for field in &self.schema.unique {
            let Some(value) = candidate.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let clash = documents
                .iter()
                .filter(|d| skip_id.is_none_or(|id| !has_id(d, id)))
                .any(|d| d.get(field) == Some(value));
            if clash {
                return Err(StorageError::duplicate(field, display_value(value)));
            }
        }
        Ok(())
    }

    /// Reject equality filters on reference fields that cannot be ids.
    fn check_criteria(&self, criteria: &Criteria) -> StorageResult<()> {
        for (field, condition) in criteria.filter.iter() {
            if !self.schema.is_object_id_field(field) {
                continue;
            }
            if let Condition::Eq(Value::String(s)) = condition {
                if ObjectId::parse_str(s).is_err() {
                    return Err(StorageError::cast(field, s));
                }
            }
        }
        Ok(())
    }

    async fn populate(&self, mut document: Document, populate: &[Populate]) -> Document {
        for p in populate {
            let Some(target) = self.references.get(&p.collection) else {
                continue;
            };
            let Some(Value::String(id)) = document.get(&p.path).cloned() else {
                continue;
            };
            let resolved = match target.get(&id).await {
                Some(referenced) => Value::Object(
                    referenced
                        .into_iter()
                        .filter(|(k, _)| k == ID_FIELD || p.select.contains(k))
                        .collect(),
                ),
                None => Value::Null,
            };
            document.insert(p.path.clone(), resolved);
        }
        document
    }
}

fn parse_id(id: &str) -> StorageResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StorageError::cast(ID_FIELD, id))
}

fn is_object_id(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| ObjectId::parse_str(s).is_ok())
}

fn has_id(document: &Document, id: &str) -> bool {
    document.get(ID_FIELD).and_then(Value::as_str) == Some(id)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(document: &Document, criteria: &Criteria) -> bool {
    let filters_hold = criteria
        .filter
        .iter()
        .all(|(field, condition)| condition_holds(document.get(field), condition));

    let search_holds = criteria.search.as_ref().is_none_or(|search| {
        search.fields().iter().any(|field| {
            document
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|text| search.matches_text(text))
        })
    });

    filters_hold && search_holds
}

fn condition_holds(stored: Option<&Value>, condition: &Condition) -> bool {
    match condition {
        Condition::Eq(expected) => {
            let candidates = equality_candidates(expected);
            match stored {
                Some(Value::Array(items)) => items
                    .iter()
                    .any(|item| candidates.iter().any(|c| loosely_equal(item, c))),
                Some(value) => candidates.iter().any(|c| loosely_equal(value, c)),
                None => candidates.iter().any(Value::is_null),
            }
        }
        Condition::Range(ops) => {
            let Some(value) = stored else {
                return false;
            };
            ops.iter().all(|(op, operand)| {
                compare_same_type(value, &range_operand(operand)).is_some_and(|o| op.accepts(o))
            })
        }
    }
}

/// Numbers compare by value so `5` matches `5.0`.
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare_same_type(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Cross-type order: missing/null, numbers, strings, objects, arrays, booleans.
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    type_rank(a).cmp(&type_rank(b)).then_with(|| match (a, b) {
        (Some(x), Some(y)) => compare_same_type(x, y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    })
}

#[async_trait]
impl Repository for InMemoryRepository {
    #[instrument(skip(self, spec), fields(collection = %self.schema.name))]
    async fn find(&self, spec: &QuerySpec) -> StorageResult<Vec<Document>> {
        self.check_criteria(&spec.criteria)?;
        let state = self.state.read().await;

        let mut hits: Vec<&Document> = state
            .documents
            .iter()
            .filter(|d| matches(d, &spec.criteria))
            .collect();

        hits.sort_by(|a, b| {
            spec.sort.fields().iter().fold(Ordering::Equal, |acc, key| {
                acc.then_with(|| {
                    let ord = compare_field(a.get(&key.field), b.get(&key.field));
                    match key.direction {
                        SortDirection::Ascending => ord,
                        SortDirection::Descending => ord.reverse(),
                    }
                })
            })
        });

        let offset = usize::try_from(spec.pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(spec.pagination.limit()).unwrap_or(usize::MAX);

        Ok(hits
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|d| spec.projection.apply(d.clone()))
            .collect())
    }

    #[instrument(skip(self, criteria), fields(collection = %self.schema.name))]
    async fn count(&self, criteria: &Criteria) -> StorageResult<u64> {
        self.check_criteria(criteria)?;
        let state = self.state.read().await;
        Ok(state.documents.iter().filter(|d| matches(d, criteria)).count() as u64)
    }

    #[instrument(skip(self, populate), fields(collection = %self.schema.name))]
    async fn find_by_id(&self, id: &str, populate: &[Populate]) -> StorageResult<Option<Document>> {
        parse_id(id)?;
        match self.get(id).await {
            Some(document) => Ok(Some(self.populate(document, populate).await)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, criteria, populate), fields(collection = %self.schema.name))]
    async fn find_one(
        &self,
        criteria: &Criteria,
        populate: &[Populate],
    ) -> StorageResult<Option<Document>> {
        self.check_criteria(criteria)?;
        let found = self
            .state
            .read()
            .await
            .documents
            .iter()
            .find(|d| matches(d, criteria))
            .cloned();
        match found {
            Some(document) => Ok(Some(self.populate(document, populate).await)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, document), fields(collection = %self.schema.name))]
    async fn insert(&self, mut document: Document) -> StorageResult<Document> {
        let id = match document.get(ID_FIELD) {
            None | Some(Value::Null) => ObjectId::new().to_hex(),
            Some(Value::String(s)) => parse_id(s)?.to_hex(),
            Some(other) => return Err(StorageError::cast(ID_FIELD, display_value(other))),
        };
        document.insert(ID_FIELD.to_string(), Value::String(id));

        self.schema.check_required(&document)?;
        self.check_references(&document)?;

        let mut state = self.state.write().await;
        self.check_unique(&state.documents, &document, None)?;

        if self.schema.timestamps {
            let stamp = state.next_stamp();
            document.insert(CREATED_AT.to_string(), Value::String(stamp.clone()));
            document.insert(UPDATED_AT.to_string(), Value::String(stamp));
        }
        document.insert(VERSION_FIELD.to_string(), Value::from(0));

        state.documents.push(document.clone());
        Ok(document)
    }

    #[instrument(skip(self, changes), fields(collection = %self.schema.name))]
    async fn update_by_id(&self, id: &str, changes: Document) -> StorageResult<Option<Document>> {
        parse_id(id)?;
        let mut state = self.state.write().await;

        let Some(position) = state.documents.iter().position(|d| has_id(d, id)) else {
            return Ok(None);
        };

        let mut updated = state.documents[position].clone();
        for (field, value) in changes {
            if matches!(field.as_str(), ID_FIELD | CREATED_AT | VERSION_FIELD) {
                continue;
            }
            updated.insert(field, value);
        }

        self.schema.check_required(&updated)?;
        self.check_references(&updated)?;
        self.check_unique(&state.documents, &updated, Some(id))?;

        if self.schema.timestamps {
            let stamp = state.next_stamp();
            updated.insert(UPDATED_AT.to_string(), Value::String(stamp));
        }

        state.documents[position] = updated.clone();
        Ok(Some(updated))
    }

    #[instrument(skip(self), fields(collection = %self.schema.name))]
    async fn delete_by_id(&self, id: &str) -> StorageResult<Option<Document>> {
        parse_id(id)?;
        let mut state = self.state.write().await;
        Ok(state
            .documents
            .iter()
            .position(|d| has_id(d, id))
            .map(|position| state.documents.remove(position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSet;
    use crate::pagination::Pagination;
    use crate::projection::Projection;
    use crate::search::SearchClause;
    use crate::sort::SortSpec;
    use serde_json::json;

    fn obj(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    fn brands() -> InMemoryRepository {
        InMemoryRepository::new(
            CollectionSchema::new("Brand")
                .required(&["name"])
                .unique(&["name", "slug"]),
        )
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    async fn seed_products(repo: &InMemoryRepository) {
        for (title, price) in [("Phone", 300), ("Phone case", 15), ("Laptop", 900), ("Cable", 5)] {
            repo.insert(obj(json!({"title": title, "price": price, "description": "gadget"})))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_insert_stamps_generated_fields() {
        let repo = brands();
        let stored = repo.insert(obj(json!({"name": "Acme"}))).await.unwrap();

        let id = stored["_id"].as_str().unwrap();
        assert!(ObjectId::parse_str(id).is_ok());
        assert_eq!(stored["__v"], json!(0));
        assert_eq!(stored["createdAt"], stored["updatedAt"]);
    }

    #[tokio::test]
    async fn test_required_and_unique_violations() {
        let repo = brands();
        repo.insert(obj(json!({"name": "Acme"}))).await.unwrap();

        let dup = repo.insert(obj(json!({"name": "Acme"}))).await.unwrap_err();
        assert_eq!(dup, StorageError::duplicate("name", "Acme"));

        let missing = repo.insert(obj(json!({"slug": "x"}))).await.unwrap_err();
        assert!(matches!(missing, StorageError::Validation(_)));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_id_is_a_cast_error() {
        let repo = brands();
        let err = repo.find_by_id("not-an-id", &[]).await.unwrap_err();
        assert_eq!(err, StorageError::cast("_id", "not-an-id"));
        assert!(repo.delete_by_id("123").await.is_err());
    }

    #[tokio::test]
    async fn test_update_keeps_immutable_fields() {
        let repo = brands();
        let stored = repo.insert(obj(json!({"name": "Acme"}))).await.unwrap();
        let id = stored["_id"].as_str().unwrap();

        let updated = repo
            .update_by_id(
                id,
                obj(json!({"name": "Acme Corp", "_id": "x", "createdAt": "1970", "__v": 9})),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated["name"], "Acme Corp");
        assert_eq!(updated["_id"], stored["_id"]);
        assert_eq!(updated["createdAt"], stored["createdAt"]);
        assert_eq!(updated["__v"], json!(0));
        assert!(updated["updatedAt"].as_str() > stored["updatedAt"].as_str());
    }

    #[tokio::test]
    async fn test_update_unique_excludes_self() {
        let repo = brands();
        let a = repo.insert(obj(json!({"name": "A"}))).await.unwrap();
        repo.insert(obj(json!({"name": "B"}))).await.unwrap();
        let id = a["_id"].as_str().unwrap();

        assert!(repo.update_by_id(id, obj(json!({"name": "A"}))).await.is_ok());
        assert_eq!(
            repo.update_by_id(id, obj(json!({"name": "B"}))).await.unwrap_err(),
            StorageError::duplicate("name", "B")
        );
    }

    #[tokio::test]
    async fn test_delete_twice_returns_none() {
        let repo = brands();
        let stored = repo.insert(obj(json!({"name": "Acme"}))).await.unwrap();
        let id = stored["_id"].as_str().unwrap();

        assert!(repo.delete_by_id(id).await.unwrap().is_some());
        assert!(repo.delete_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_default_sort_is_newest_first() {
        let repo = brands();
        for name in ["first", "second", "third"] {
            repo.insert(obj(json!({"name": name}))).await.unwrap();
        }

        let found = repo.find(&QuerySpec::default()).await.unwrap();
        let names: Vec<_> = found.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
        assert!(found.iter().all(|d| !d.contains_key("__v")));
    }

    #[tokio::test]
    async fn test_range_filter_with_string_operands() {
        let repo = InMemoryRepository::new(CollectionSchema::new("Product"));
        seed_products(&repo).await;

        let spec = QuerySpec {
            criteria: Criteria::new(FilterSet::from_params(&pairs(&[
                ("price[gte]", "10"),
                ("price[lte]", "300"),
            ]))),
            sort: SortSpec::parse(Some("price")),
            ..Default::default()
        };
        let found = repo.find(&spec).await.unwrap();
        let prices: Vec<_> = found.iter().map(|d| d["price"].as_i64().unwrap()).collect();
        assert_eq!(prices, vec![15, 300]);
    }

    #[tokio::test]
    async fn test_search_and_filter_both_apply() {
        let repo = InMemoryRepository::new(CollectionSchema::new("Product"));
        seed_products(&repo).await;

        let criteria = Criteria {
            filter: FilterSet::from_params(&pairs(&[("price[gt]", "100")])),
            search: SearchClause::new("PHONE", &["title", "description"]),
        };
        assert_eq!(repo.count(&criteria).await.unwrap(), 1);

        let searched_only = Criteria {
            search: SearchClause::new("phone", &["title"]),
            ..Default::default()
        };
        assert_eq!(repo.count(&searched_only).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_equality_coerces_numbers() {
        let repo = InMemoryRepository::new(CollectionSchema::new("Product"));
        seed_products(&repo).await;

        let criteria = Criteria::new(FilterSet::from_params(&pairs(&[("price", "900")])));
        assert_eq!(repo.count(&criteria).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_pagination_and_projection() {
        let repo = InMemoryRepository::new(CollectionSchema::new("Product"));
        seed_products(&repo).await;

        let spec = QuerySpec {
            sort: SortSpec::parse(Some("price")),
            projection: Projection::parse(Some("title,-_id")).unwrap(),
            pagination: Pagination::new(2, 3).unwrap(),
            ..Default::default()
        };
        let found = repo.find(&spec).await.unwrap();
        assert_eq!(found, vec![obj(json!({"title": "Laptop"}))]);
    }

    #[tokio::test]
    async fn test_reference_filter_with_bad_id_is_cast_error() {
        let repo = InMemoryRepository::new(
            CollectionSchema::new("SubCategory").references(&["category"]),
        );
        let criteria = Criteria::field_eq("category", "nope");
        assert_eq!(
            repo.count(&criteria).await.unwrap_err(),
            StorageError::cast("category", "nope")
        );
    }

    #[tokio::test]
    async fn test_populate_replaces_reference() {
        let categories = Arc::new(InMemoryRepository::new(CollectionSchema::new("Category")));
        let category = categories
            .insert(obj(json!({"name": "Phones", "image": "p.png"})))
            .await
            .unwrap();
        let category_id = category["_id"].as_str().unwrap();

        let subcategories = InMemoryRepository::new(
            CollectionSchema::new("SubCategory").references(&["category"]),
        )
        .with_reference("categories", categories.clone());
        let sub = subcategories
            .insert(obj(json!({"name": "Android", "category": category_id})))
            .await
            .unwrap();

        let populate = [Populate::new("category", "categories", &["name"])];
        let found = subcategories
            .find_by_id(sub["_id"].as_str().unwrap(), &populate)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found["category"], json!({"_id": category_id, "name": "Phones"}));
    }

    #[tokio::test]
    async fn test_invalid_reference_on_insert() {
        let repo = InMemoryRepository::new(
            CollectionSchema::new("SubCategory").references(&["category"]),
        );
        let err = repo
            .insert(obj(json!({"name": "x", "category": "123"})))
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::cast("category", "123"));
    }

    #[tokio::test]
    async fn test_reference_lists_are_checked_per_item() {
        let repo = InMemoryRepository::new(
            CollectionSchema::new("Product").references(&["subcategories"]),
        );
        let valid = ObjectId::new().to_hex();

        repo.insert(obj(json!({"title": "ok", "subcategories": [valid]})))
            .await
            .unwrap();

        let err = repo
            .insert(obj(json!({"title": "bad", "subcategories": [valid, "nope"]})))
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::cast("subcategories", "nope"));
    }
}
