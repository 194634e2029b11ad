//! Receipt document endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::DocumentId;
use domain::{DomainError, LineInput, ReceiptForm, ReceiptInput};
use inventory_store::{DocumentQuery, InventoryStore, ReceiptDocument};
use queries::DocumentListing;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::params;
use crate::state::AppState;

// -- Request types --

/// Filter for the receipts listing; list values are comma-separated.
#[derive(Debug, Deserialize)]
pub struct ReceiptsParams {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub resource_ids: Option<String>,
    pub unit_ids: Option<String>,
    pub numbers: Option<String>,
}

impl ReceiptsParams {
    fn to_query(&self) -> Result<DocumentQuery, ApiError> {
        let mut filter = DocumentQuery::new()
            .resource_ids(params::id_list(
                "resource_ids",
                self.resource_ids.as_deref(),
            )?)
            .unit_ids(params::id_list("unit_ids", self.unit_ids.as_deref())?)
            .document_numbers(params::text_list(self.numbers.as_deref()));

        if let Some(from) = params::date("date_from", self.date_from.as_deref())? {
            filter = filter.date_from(from);
        }
        if let Some(to) = params::date("date_to", self.date_to.as_deref())? {
            filter = filter.date_to(to);
        }

        Ok(filter)
    }
}

// -- Handlers --

/// GET /receipts — documents with their items, plus filter options.
#[tracing::instrument(skip(state))]
pub async fn list<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ReceiptsParams>,
) -> Result<Json<DocumentListing>, ApiError> {
    let filter = query.to_query()?;
    let listing = state.receipts_view.list_documents(filter).await?;
    Ok(Json(listing))
}

/// POST /receipts — create a document from a submission.
#[tracing::instrument(skip(state, input))]
pub async fn create<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(input): Json<ReceiptInput>,
) -> Result<(StatusCode, Json<ReceiptDocument>), ApiError> {
    let lines = input.lines.clone();

    match state.receipts.create(input).await {
        Ok(document) => Ok((StatusCode::CREATED, Json(document))),
        Err(e) => Err(rejection(&state, e, &lines).await),
    }
}

/// GET /receipts/new — payload for an empty create form dated today.
#[tracing::instrument(skip(state))]
pub async fn new_form<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ReceiptForm>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let form = state.receipts.create_form(today).await?;
    Ok(Json(form))
}

/// GET /receipts/{id} — load one document with its items.
#[tracing::instrument(skip(state))]
pub async fn get<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<ReceiptDocument>, ApiError> {
    let document = state.receipts.get(DocumentId::new(id)).await?;
    Ok(Json(document))
}

/// GET /receipts/{id}/edit — payload for the edit form.
#[tracing::instrument(skip(state))]
pub async fn edit_form<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<ReceiptForm>, ApiError> {
    let form = state.receipts.edit_form(DocumentId::new(id)).await?;
    Ok(Json(form))
}

/// PUT /receipts/{id} — replace a document's fields and all of its items.
#[tracing::instrument(skip(state, input))]
pub async fn update<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
    Json(input): Json<ReceiptInput>,
) -> Result<Json<ReceiptDocument>, ApiError> {
    let lines = input.lines.clone();

    match state.receipts.update(DocumentId::new(id), input).await {
        Ok(document) => Ok(Json(document)),
        Err(e) => Err(rejection(&state, e, &lines).await),
    }
}

/// DELETE /receipts/{id} — delete a document and its items.
#[tracing::instrument(skip(state))]
pub async fn delete<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.receipts.delete(DocumentId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attaches form options to errors the submitter can correct.
async fn rejection<S: InventoryStore + Clone + 'static>(
    state: &AppState<S>,
    error: DomainError,
    lines: &[LineInput],
) -> ApiError {
    if !matches!(
        error,
        DomainError::Validation { .. }
            | DomainError::DuplicateNumber { .. }
            | DomainError::IncompleteLine { .. }
    ) {
        return error.into();
    }

    match state.receipts.form_options(lines).await {
        Ok(options) => ApiError::Rejected { error, options },
        Err(e) => {
            tracing::warn!(error = %e, "failed to load form options for rejected submission");
            error.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::{ResourceId, UnitId};

    #[test]
    fn test_params_to_query() {
        let params = ReceiptsParams {
            date_from: Some("2024-02-01".to_string()),
            date_to: Some(String::new()),
            resource_ids: Some("1,2".to_string()),
            unit_ids: None,
            numbers: Some("R-1, R-2".to_string()),
        };

        let query = params.to_query().unwrap();

        assert_eq!(query.date_from, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(query.date_to, None);
        assert_eq!(
            query.resource_ids,
            vec![ResourceId::new(1), ResourceId::new(2)]
        );
        assert_eq!(query.unit_ids, Vec::<UnitId>::new());
        assert_eq!(query.document_numbers, vec!["R-1", "R-2"]);
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let params = ReceiptsParams {
            date_from: Some("yesterday".to_string()),
            date_to: None,
            resource_ids: None,
            unit_ids: None,
            numbers: None,
        };

        assert!(matches!(params.to_query(), Err(ApiError::BadRequest(_))));
    }
}
