//! Receipt service applying submissions to the store.

use chrono::NaiveDate;
use common::{DocumentId, ResourceId, UnitId};
use inventory_store::{
    InventoryStore, InventoryStoreExt, NewReceiptDocument, ReceiptDocument, Resource, StoreError,
    Unit,
};

use crate::error::DomainError;
use crate::validation::{LineInput, normalize_lines, normalize_number, require_date};

use super::form::{FormOptions, ReceiptForm, lines_of};
use super::ReceiptInput;

const DOCUMENT: &str = "receipt document";

/// Service for managing receipt documents.
///
/// Every submission runs the same pipeline: field validation, the
/// case-insensitive number check, then line classification. Only when all of
/// them pass is the document written, in one store call.
pub struct ReceiptService<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> ReceiptService<S> {
    /// Creates a new receipt service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a receipt document from a submission.
    #[tracing::instrument(skip(self, input), fields(number = %input.number))]
    pub async fn create(&self, input: ReceiptInput) -> Result<ReceiptDocument, DomainError> {
        let document = self
            .prepare(&input, None)
            .await
            .inspect_err(|e| record_rejection("create", e))?;
        let number = document.number.clone();

        let created = self
            .store
            .insert_document(document)
            .await
            .map_err(|e| duplicate_number_or(e, &number))
            .inspect_err(|e| record_rejection("create", e))?;

        metrics::counter!("receipts_created_total").increment(1);
        tracing::info!(
            document_id = %created.id,
            items = created.items.len(),
            "receipt document created"
        );

        Ok(created)
    }

    /// Replaces a document's number, date and entire item set.
    #[tracing::instrument(skip(self, input), fields(number = %input.number))]
    pub async fn update(
        &self,
        id: DocumentId,
        input: ReceiptInput,
    ) -> Result<ReceiptDocument, DomainError> {
        let document = self
            .prepare(&input, Some(id))
            .await
            .inspect_err(|e| record_rejection("update", e))?;
        let number = document.number.clone();

        let updated = self
            .store
            .replace_document(id, document)
            .await
            .map_err(|e| duplicate_number_or(e, &number))
            .inspect_err(|e| record_rejection("update", e))?;

        metrics::counter!("receipts_updated_total").increment(1);
        tracing::info!(
            document_id = %updated.id,
            items = updated.items.len(),
            "receipt document updated"
        );

        Ok(updated)
    }

    /// Deletes a document together with all of its items.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: DocumentId) -> Result<(), DomainError> {
        self.store.delete_document(id).await?;

        metrics::counter!("receipts_deleted_total").increment(1);
        tracing::info!(document_id = %id, "receipt document deleted");

        Ok(())
    }

    /// Loads a document with its items.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: DocumentId) -> Result<ReceiptDocument, DomainError> {
        self.store
            .get_document(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: DOCUMENT,
                id: id.as_i64(),
            })
    }

    /// Payload for an empty create form.
    #[tracing::instrument(skip(self))]
    pub async fn create_form(&self, today: NaiveDate) -> Result<ReceiptForm, DomainError> {
        let options = self.form_options(&[]).await?;
        Ok(ReceiptForm::blank(today, options))
    }

    /// Payload for editing an existing document.
    #[tracing::instrument(skip(self))]
    pub async fn edit_form(&self, id: DocumentId) -> Result<ReceiptForm, DomainError> {
        let document = self.get(id).await?;
        let options = self.form_options(&lines_of(&document)).await?;
        Ok(ReceiptForm::for_document(&document, options))
    }

    /// Selection lists for the given lines: active records plus any archived
    /// record a line already points at.
    #[tracing::instrument(skip(self, lines))]
    pub async fn form_options(&self, lines: &[LineInput]) -> Result<FormOptions, DomainError> {
        let resource_ids: Vec<ResourceId> = lines
            .iter()
            .map(|line| line.resource_id)
            .filter(|id| !id.is_unset())
            .collect();
        let unit_ids: Vec<UnitId> = lines
            .iter()
            .map(|line| line.unit_id)
            .filter(|id| !id.is_unset())
            .collect();

        Ok(FormOptions {
            resources: self
                .store
                .references::<Resource>(false, &resource_ids)
                .await?,
            units: self.store.references::<Unit>(false, &unit_ids).await?,
        })
    }

    async fn prepare(
        &self,
        input: &ReceiptInput,
        exclude: Option<DocumentId>,
    ) -> Result<NewReceiptDocument, DomainError> {
        let number = normalize_number(&input.number)?;
        let date = require_date(input.date)?;

        if self.store.document_number_taken(&number, exclude).await? {
            return Err(DomainError::DuplicateNumber { number });
        }

        let items = normalize_lines(&input.lines)?;

        Ok(NewReceiptDocument {
            number,
            date,
            items,
        })
    }
}

fn duplicate_number_or(e: StoreError, number: &str) -> DomainError {
    match e {
        StoreError::UniqueViolation { .. } => DomainError::DuplicateNumber {
            number: number.to_string(),
        },
        other => other.into(),
    }
}

fn record_rejection(operation: &'static str, error: &DomainError) {
    let reason = match error {
        DomainError::Validation { .. } => "validation",
        DomainError::DuplicateNumber { .. } => "duplicate_number",
        DomainError::IncompleteLine { .. } => "incomplete_line",
        DomainError::NotFound { .. } => "not_found",
        _ => return,
    };

    metrics::counter!(
        "receipt_submissions_rejected_total",
        "operation" => operation,
        "reason" => reason
    )
    .increment(1);
    tracing::debug!(operation, reason, error = %error, "receipt submission rejected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_store::{InMemoryInventoryStore, ReferenceKind};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (ReceiptService<InMemoryInventoryStore>, ResourceId, UnitId) {
        let store = InMemoryInventoryStore::new();
        let resource = store
            .insert_reference(ReferenceKind::Resource, "Cement")
            .await
            .unwrap();
        let unit = store
            .insert_reference(ReferenceKind::Unit, "kg")
            .await
            .unwrap();
        (
            ReceiptService::new(store),
            ResourceId::new(resource.id),
            UnitId::new(unit.id),
        )
    }

    #[tokio::test]
    async fn test_create_drops_empty_lines() {
        let (service, cement, kg) = setup().await;

        let document = service
            .create(ReceiptInput::new(
                " R-001 ",
                date(2024, 3, 1),
                vec![
                    LineInput::empty(),
                    LineInput::new(cement, kg, Decimal::from(10)),
                    LineInput::empty(),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(document.number, "R-001");
        assert_eq!(document.items.len(), 1);
        assert_eq!(document.items[0].quantity, Decimal::from(10));
    }

    #[tokio::test]
    async fn test_create_without_items() {
        let (service, _, _) = setup().await;

        let document = service
            .create(ReceiptInput::new("R-002", date(2024, 3, 1), vec![LineInput::empty()]))
            .await
            .unwrap();

        assert!(document.items.is_empty());
    }

    #[tokio::test]
    async fn test_partial_line_saves_nothing() {
        let (service, cement, kg) = setup().await;

        let result = service
            .create(ReceiptInput::new(
                "R-003",
                date(2024, 3, 1),
                vec![
                    LineInput::new(cement, kg, Decimal::from(1)),
                    LineInput::new(ResourceId::UNSET, kg, Decimal::from(3)),
                ],
            ))
            .await;

        assert!(matches!(result, Err(DomainError::IncompleteLine { line: 2 })));
        assert_eq!(service.store.document_count().await, 0);
        assert_eq!(service.store.item_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_date_is_validation_error() {
        let (service, _, _) = setup().await;

        let input = ReceiptInput {
            number: "R-004".to_string(),
            date: None,
            lines: vec![],
        };

        assert!(matches!(
            service.create(input).await,
            Err(DomainError::Validation { field: "date", .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_number_checked_before_lines() {
        let (service, _, kg) = setup().await;
        service
            .create(ReceiptInput::new("R-005", date(2024, 3, 1), vec![]))
            .await
            .unwrap();

        let result = service
            .create(ReceiptInput::new(
                "r-005",
                date(2024, 3, 2),
                vec![LineInput::new(ResourceId::UNSET, kg, Decimal::ZERO)],
            ))
            .await;

        assert!(matches!(result, Err(DomainError::DuplicateNumber { .. })));
    }

    #[tokio::test]
    async fn test_unknown_resource_is_not_found() {
        let (service, _, kg) = setup().await;

        let result = service
            .create(ReceiptInput::new(
                "R-006",
                date(2024, 3, 1),
                vec![LineInput::new(ResourceId::new(404), kg, Decimal::from(2))],
            ))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                entity: "resource",
                id: 404
            })
        ));
        assert_eq!(service.store.document_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_keeps_own_number() {
        let (service, cement, kg) = setup().await;
        let document = service
            .create(ReceiptInput::new(
                "R-007",
                date(2024, 3, 1),
                vec![LineInput::new(cement, kg, Decimal::from(1))],
            ))
            .await
            .unwrap();

        let updated = service
            .update(
                document.id,
                ReceiptInput::new(
                    "r-007",
                    date(2024, 3, 9),
                    vec![
                        LineInput::new(cement, kg, Decimal::from(2)),
                        LineInput::new(cement, kg, Decimal::from(3)),
                    ],
                ),
            )
            .await
            .unwrap();

        assert_eq!(updated.number, "r-007");
        assert_eq!(updated.date, date(2024, 3, 9));
        assert_eq!(updated.items.len(), 2);
        assert_eq!(service.store.item_count().await, 2);
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let (service, _, _) = setup().await;

        let result = service
            .update(
                DocumentId::new(99),
                ReceiptInput::new("R-008", date(2024, 3, 1), vec![]),
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { id: 99, .. })));
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let (service, cement, kg) = setup().await;
        let document = service
            .create(ReceiptInput::new(
                "R-009",
                date(2024, 3, 1),
                vec![LineInput::new(cement, kg, Decimal::from(1))],
            ))
            .await
            .unwrap();

        service.delete(document.id).await.unwrap();

        assert!(matches!(
            service.get(document.id).await,
            Err(DomainError::NotFound {
                entity: "receipt document",
                ..
            })
        ));
        assert!(matches!(
            service.delete(document.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert_eq!(service.store.item_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_form_is_blank() {
        let (service, _, _) = setup().await;

        let form = service.create_form(date(2024, 6, 1)).await.unwrap();

        assert!(form.id.is_none());
        assert!(form.number.is_empty());
        assert_eq!(form.date, date(2024, 6, 1));
        assert_eq!(form.lines, vec![LineInput::empty()]);
        assert_eq!(form.options.resources.len(), 1);
        assert_eq!(form.options.units.len(), 1);
    }
}
