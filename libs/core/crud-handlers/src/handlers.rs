//! The generic CRUD operations shared by every catalog resource.

use axum::http::StatusCode;
use axum_helpers::{AppError, Envelope};
use query_engine::{
    Condition, Criteria, Document, FilterSet, PageResult, Pagination, QuerySpec, Repository,
    execute,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::resource::ResourceDef;
use crate::slug::slugify;

/// List, read, create, update and delete for one resource.
///
/// Each operation is independent and reentrant; the struct only holds the
/// repository and the resource definition.
pub struct CrudHandlers<R: ?Sized> {
    repository: Arc<R>,
    resource: Arc<ResourceDef>,
}

impl<R: ?Sized> Clone for CrudHandlers<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            resource: Arc::clone(&self.resource),
        }
    }
}

impl<R: Repository + ?Sized> CrudHandlers<R> {
    pub fn new(repository: Arc<R>, resource: ResourceDef) -> Self {
        Self {
            repository,
            resource: Arc::new(resource),
        }
    }

    pub fn resource(&self) -> &ResourceDef {
        &self.resource
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// `GET /` with filters, keyword search, sort, field selection and
    /// pagination taken from the query string.
    pub async fn list_all(
        &self,
        params: &[(String, String)],
    ) -> Result<Envelope<PageResult<Document>>, AppError> {
        self.list_within(params, &FilterSet::new()).await
    }

    /// Like [`list_all`](Self::list_all) with `base` filters that the
    /// query string cannot override.
    #[instrument(skip(self, params, base), fields(resource = %self.resource.name()))]
    pub async fn list_within(
        &self,
        params: &[(String, String)],
        base: &FilterSet,
    ) -> Result<Envelope<PageResult<Document>>, AppError> {
        let pagination = Pagination::from_query(params, self.resource.limit())?;
        let spec = QuerySpec::from_params(params, pagination, &self.resource.search_fields())?
            .without_fields(&self.resource.presenter().hidden())
            .with_base_filter(base);

        let page = execute(self.repository.as_ref(), &spec).await?;
        let page = page.map(|document| self.present(document));

        let message = format!("{} retrieved successfully", self.resource.plural_name());
        info!(total = page.total_items, "{}", message);
        Ok(Envelope::success(StatusCode::OK, message, Some(page)))
    }

    /// `GET /{id}` with the resource's populate rules applied.
    #[instrument(skip(self), fields(resource = %self.resource.name()))]
    pub async fn get_one(&self, id: &str) -> Result<Envelope<Document>, AppError> {
        let document = self
            .repository
            .find_by_id(id, self.resource.populates())
            .await?
            .ok_or_else(|| self.not_found())?;

        Ok(self.found(document))
    }

    /// `GET /slug/{slug}`, same contract as [`get_one`](Self::get_one).
    #[instrument(skip(self), fields(resource = %self.resource.name()))]
    pub async fn get_by_slug(&self, slug: &str) -> Result<Envelope<Document>, AppError> {
        let document = self
            .repository
            .find_one(&Criteria::field_eq("slug", slug), self.resource.populates())
            .await?
            .ok_or_else(|| self.not_found())?;

        Ok(self.found(document))
    }

    #[instrument(skip(self, document), fields(resource = %self.resource.name()))]
    pub async fn create_one(&self, mut document: Document) -> Result<Envelope<Document>, AppError> {
        self.apply_slug(&mut document);

        let created = self.repository.insert(document).await?;
        let id = created.get("_id").and_then(Value::as_str).unwrap_or_default();
        info!(id, "New {} created", self.resource.name());

        Ok(Envelope::success(
            StatusCode::CREATED,
            format!("{} created successfully", self.resource.name()),
            Some(self.present(created)),
        ))
    }

    /// Create under a parent: `parent_field` is set to `parent_id` when the
    /// body leaves it out.
    pub async fn create_within(
        &self,
        mut document: Document,
        parent_field: &str,
        parent_id: &str,
    ) -> Result<Envelope<Document>, AppError> {
        if matches!(document.get(parent_field), None | Some(Value::Null)) {
            document.insert(parent_field.to_string(), Value::String(parent_id.to_string()));
        }
        self.create_one(document).await
    }

    #[instrument(skip(self, changes), fields(resource = %self.resource.name()))]
    pub async fn update_one(
        &self,
        id: &str,
        mut changes: Document,
    ) -> Result<Envelope<Document>, AppError> {
        self.apply_slug(&mut changes);

        let updated = self
            .repository
            .update_by_id(id, changes)
            .await?
            .ok_or_else(|| self.not_found())?;
        info!("{} updated", self.resource.name());

        Ok(Envelope::success(
            StatusCode::OK,
            format!("{} updated successfully", self.resource.name()),
            Some(self.present(updated)),
        ))
    }

    #[instrument(skip(self), fields(resource = %self.resource.name()))]
    pub async fn delete_one(&self, id: &str) -> Result<Envelope<()>, AppError> {
        self.repository
            .delete_by_id(id)
            .await?
            .ok_or_else(|| self.not_found())?;
        info!("{} deleted", self.resource.name());

        Ok(Envelope::success(
            StatusCode::OK,
            format!("{} deleted successfully", self.resource.name()),
            None,
        ))
    }

    fn apply_slug(&self, document: &mut Document) {
        let Some(source) = self.resource.slug_source() else {
            return;
        };
        if let Some(Value::String(text)) = document.get(source) {
            let slug = slugify(text);
            document.insert("slug".to_string(), Value::String(slug));
        }
    }

    fn found(&self, document: Document) -> Envelope<Document> {
        Envelope::success(
            StatusCode::OK,
            format!("{} retrieved successfully", self.resource.name()),
            Some(self.present(document)),
        )
    }

    fn present(&self, document: Document) -> Document {
        self.resource.presenter().apply(document)
    }

    fn not_found(&self) -> AppError {
        AppError::not_found(self.resource.name())
    }
}

/// Equality filter on `field`, used to scope nested listings.
pub fn parent_filter(field: &str, parent_id: &str) -> FilterSet {
    let mut filter = FilterSet::new();
    filter.insert(field, Condition::Eq(Value::String(parent_id.to_string())));
    filter
}
