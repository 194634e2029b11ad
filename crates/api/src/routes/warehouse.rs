//! Warehouse listing endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use inventory_store::{InventoryStore, ItemQuery};
use queries::ItemListing;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::params;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WarehouseParams {
    pub resource_ids: Option<String>,
    pub unit_ids: Option<String>,
}

/// GET /warehouse — every received item, filtered by resource and unit.
#[tracing::instrument(skip(state))]
pub async fn list<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<WarehouseParams>,
) -> Result<Json<ItemListing>, ApiError> {
    let filter = ItemQuery::new()
        .resource_ids(params::id_list(
            "resource_ids",
            query.resource_ids.as_deref(),
        )?)
        .unit_ids(params::id_list("unit_ids", query.unit_ids.as_deref())?);

    let listing = state.warehouse_view.list_items(filter).await?;
    Ok(Json(listing))
}
