//! Receipts read model: documents with their items, filtered.

use std::time::Instant;

use inventory_store::{DocumentDetails, DocumentQuery, InventoryStore};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::options::FilterOptions;
use crate::read_model::ReadModel;

/// One page of the receipts listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentListing {
    /// Matching documents in id order, each with its items.
    pub documents: Vec<DocumentDetails>,

    /// Unfiltered option lists for the filter panel.
    pub options: FilterOptions,

    /// The filter that produced `documents`.
    pub filter: DocumentQuery,
}

/// Read model view for receipt documents.
#[derive(Clone)]
pub struct ReceiptsView<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> ReceiptsView<S> {
    /// Creates a new receipts view over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists documents matching every restriction in `filter`.
    ///
    /// A document matches a resource or unit restriction when at least one of
    /// its items does; the document is then returned with all of its items.
    #[tracing::instrument(skip(self))]
    pub async fn list_documents(&self, filter: DocumentQuery) -> Result<DocumentListing> {
        let started = Instant::now();

        let documents = self.store.query_documents(&filter).await?;
        let options = FilterOptions::load(&self.store).await?;

        self.observe(started, documents.len());

        Ok(DocumentListing {
            documents,
            options,
            filter,
        })
    }
}

impl<S: InventoryStore> ReadModel for ReceiptsView<S> {
    fn name(&self) -> &'static str {
        "ReceiptsView"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use inventory_store::{
        InMemoryInventoryStore, NewReceiptDocument, NewReceiptItem, ReferenceKind, ResourceId,
        UnitId,
    };
    use rust_decimal::Decimal;

    async fn seeded() -> ReceiptsView<InMemoryInventoryStore> {
        let store = InMemoryInventoryStore::new();
        store
            .insert_reference(ReferenceKind::Resource, "Sand")
            .await
            .unwrap();
        store
            .insert_reference(ReferenceKind::Unit, "t")
            .await
            .unwrap();

        for (number, day) in [("B-2", 2), ("A-1", 1)] {
            store
                .insert_document(NewReceiptDocument {
                    number: number.to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                    items: vec![NewReceiptItem {
                        resource_id: ResourceId::new(1),
                        unit_id: UnitId::new(1),
                        quantity: Decimal::from(day),
                    }],
                })
                .await
                .unwrap();
        }

        ReceiptsView::new(store)
    }

    #[tokio::test]
    async fn test_unfiltered_listing_in_id_order() {
        let view = seeded().await;

        let listing = view.list_documents(DocumentQuery::new()).await.unwrap();

        let numbers: Vec<_> = listing.documents.iter().map(|d| d.number.as_str()).collect();
        assert_eq!(numbers, vec!["B-2", "A-1"]);
        assert_eq!(listing.options.document_numbers, vec!["A-1", "B-2"]);
        assert_eq!(listing.documents[0].items[0].resource_name, "Sand");
        assert_eq!(listing.documents[0].items[0].unit_name, "t");
    }

    #[tokio::test]
    async fn test_listing_echoes_filter() {
        let view = seeded().await;
        let filter = DocumentQuery::new().document_numbers(["A-1"]);

        let listing = view.list_documents(filter.clone()).await.unwrap();

        assert_eq!(listing.filter, filter);
        assert_eq!(listing.documents.len(), 1);
        assert_eq!(listing.options.document_numbers.len(), 2);
    }

    #[test]
    fn test_view_name() {
        let view = ReceiptsView::new(InMemoryInventoryStore::new());
        assert_eq!(view.name(), "ReceiptsView");
    }
}
