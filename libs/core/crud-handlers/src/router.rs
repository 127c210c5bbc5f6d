//! Axum routers over [`CrudHandlers`].
//!
//! ```text
//! GET    /              list (query-string driven)
//! POST   /              create
//! GET    /slug/{slug}   get by slug
//! GET    /{id}          get one
//! PUT    /{id}          update
//! DELETE /{id}          delete
//! ```

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{AppError, QueryPairs, ValidatedJson};
use query_engine::Repository;
use serde_json::Value;
use std::marker::PhantomData;

use crate::handlers::{CrudHandlers, parent_filter};
use crate::payload::{Payload, parse_payload};

/// The six standard routes for one resource.
///
/// `C` validates create bodies, `U` validates update bodies.
pub fn router<R, C, U>(handlers: CrudHandlers<R>) -> Router
where
    R: Repository + 'static,
    C: Payload,
    U: Payload,
{
    Router::new()
        .route("/", get(list::<R>).post(create::<R, C>))
        .route("/slug/{slug}", get(get_by_slug::<R>))
        .route(
            "/{id}",
            get(get_one::<R>)
                .put(update::<R, U>)
                .delete(delete::<R>),
        )
        .with_state(handlers)
}

/// Child listing and creation under a parent, mounted as
/// `/{id}/{segment}` next to the parent's own routes.
///
/// Listings are restricted to children whose `parent_field` equals the
/// path id; creates default `parent_field` to it.
pub fn nested_router<R, C>(handlers: CrudHandlers<R>, segment: &str, parent_field: &str) -> Router
where
    R: Repository + 'static,
    C: Payload,
{
    let state = NestedState {
        handlers,
        parent_field: parent_field.to_string(),
        payload: PhantomData::<fn() -> C>,
    };

    Router::new()
        .route(
            &format!("/{{id}}/{segment}"),
            get(list_nested::<R, C>).post(create_nested::<R, C>),
        )
        .with_state(state)
}

struct NestedState<R, C> {
    handlers: CrudHandlers<R>,
    parent_field: String,
    payload: PhantomData<fn() -> C>,
}

impl<R, C> Clone for NestedState<R, C> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
            parent_field: self.parent_field.clone(),
            payload: PhantomData,
        }
    }
}

async fn list<R: Repository + 'static>(
    State(handlers): State<CrudHandlers<R>>,
    QueryPairs(params): QueryPairs,
) -> Result<impl IntoResponse, AppError> {
    handlers.list_all(&params).await
}

async fn get_one<R: Repository + 'static>(
    State(handlers): State<CrudHandlers<R>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    handlers.get_one(&id).await
}

async fn get_by_slug<R: Repository + 'static>(
    State(handlers): State<CrudHandlers<R>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    handlers.get_by_slug(&slug).await
}

async fn create<R: Repository + 'static, C: Payload>(
    State(handlers): State<CrudHandlers<R>>,
    ValidatedJson(payload): ValidatedJson<C>,
) -> Result<impl IntoResponse, AppError> {
    handlers.create_one(payload.into_document()?).await
}

async fn update<R: Repository + 'static, U: Payload>(
    State(handlers): State<CrudHandlers<R>>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<U>,
) -> Result<impl IntoResponse, AppError> {
    handlers.update_one(&id, payload.into_document()?).await
}

async fn delete<R: Repository + 'static>(
    State(handlers): State<CrudHandlers<R>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    handlers.delete_one(&id).await
}

async fn list_nested<R: Repository + 'static, C: Payload>(
    State(state): State<NestedState<R, C>>,
    Path(parent_id): Path<String>,
    QueryPairs(params): QueryPairs,
) -> Result<impl IntoResponse, AppError> {
    state
        .handlers
        .list_within(&params, &parent_filter(&state.parent_field, &parent_id))
        .await
}

/// The parent id is filled in before validation so a body without it
/// still satisfies the create payload.
async fn create_nested<R: Repository + 'static, C: Payload>(
    State(state): State<NestedState<R, C>>,
    Path(parent_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(mut body) = body?;
    if let Value::Object(fields) = &mut body {
        if matches!(fields.get(&state.parent_field), None | Some(Value::Null)) {
            fields.insert(state.parent_field.clone(), Value::String(parent_id.clone()));
        }
    }

    let payload = parse_payload::<C>(body)?;
    state
        .handlers
        .create_within(payload.into_document()?, &state.parent_field, &parent_id)
        .await
}
