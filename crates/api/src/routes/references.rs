//! Resource and unit endpoints.
//!
//! One set of handlers serves both `/resources` and `/units`; the router
//! instantiates them with [`inventory_store::Resource`] or
//! [`inventory_store::Unit`].

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use inventory_store::{InventoryStore, Reference};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::params;
use crate::state::{AppState, ReferenceServices};

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub include_archived: bool,
    pub must_include: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
}

// -- Handlers --

/// GET /{kind} — list records sorted by name.
///
/// Without `include_archived`, archived records are only returned when named
/// in `must_include`.
#[tracing::instrument(skip(state))]
pub async fn list<S, R>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListParams>,
) -> Result<Json<Vec<R>>, ApiError>
where
    S: InventoryStore + Clone + 'static,
    R: Reference + Serialize,
    AppState<S>: ReferenceServices<S, R>,
{
    let must_include: Vec<R::Id> =
        params::id_list("must_include", query.must_include.as_deref())?;

    let records = state
        .reference_service()
        .list(query.include_archived, &must_include)
        .await?;

    Ok(Json(records))
}

/// POST /{kind} — create a new active record.
#[tracing::instrument(skip(state))]
pub async fn create<S, R>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<R>), ApiError>
where
    S: InventoryStore + Clone + 'static,
    R: Reference + Serialize,
    AppState<S>: ReferenceServices<S, R>,
{
    let record = state.reference_service().create(&req.name).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /{kind}/{id} — load one record.
#[tracing::instrument(skip(state))]
pub async fn get<S, R>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<R>, ApiError>
where
    S: InventoryStore + Clone + 'static,
    R: Reference + Serialize,
    AppState<S>: ReferenceServices<S, R>,
{
    let record = state.reference_service().get(R::Id::from(id)).await?;
    Ok(Json(record))
}

/// PUT /{kind}/{id} — rename and/or (un)archive a record.
#[tracing::instrument(skip(state))]
pub async fn update<S, R>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<R>, ApiError>
where
    S: InventoryStore + Clone + 'static,
    R: Reference + Serialize,
    AppState<S>: ReferenceServices<S, R>,
{
    let record = state
        .reference_service()
        .update(R::Id::from(id), &req.name, req.is_archived)
        .await?;
    Ok(Json(record))
}

/// DELETE /{kind}/{id} — hard-delete a record no receipt uses.
#[tracing::instrument(skip(state))]
pub async fn delete<S, R>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
    S: InventoryStore + Clone + 'static,
    R: Reference + Serialize,
    AppState<S>: ReferenceServices<S, R>,
{
    state.reference_service().delete(R::Id::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
