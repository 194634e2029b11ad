use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::{
    DocumentDetails, DocumentId, DocumentQuery, ItemDetails, ItemId, ItemQuery,
    NewReceiptDocument, NewReceiptItem, ReceiptDocument, ReceiptItem, ReferenceKind,
    ReferenceRecord, Result, StoreError, store::InventoryStore,
};

const DOCUMENT: &str = "receipt document";

#[derive(Debug, Clone)]
struct DocumentRow {
    number: String,
    date: NaiveDate,
}

/// All tables behind one lock so every command is a single critical section.
#[derive(Debug, Default)]
struct InventoryState {
    resources: BTreeMap<i64, ReferenceRecord>,
    units: BTreeMap<i64, ReferenceRecord>,
    documents: BTreeMap<DocumentId, DocumentRow>,
    /// Items in insertion order.
    items: Vec<ReceiptItem>,
    last_resource_id: i64,
    last_unit_id: i64,
    last_document_id: i64,
    last_item_id: i64,
}

impl InventoryState {
    fn table(&self, kind: ReferenceKind) -> &BTreeMap<i64, ReferenceRecord> {
        match kind {
            ReferenceKind::Resource => &self.resources,
            ReferenceKind::Unit => &self.units,
        }
    }

    fn table_mut(&mut self, kind: ReferenceKind) -> &mut BTreeMap<i64, ReferenceRecord> {
        match kind {
            ReferenceKind::Resource => &mut self.resources,
            ReferenceKind::Unit => &mut self.units,
        }
    }

    fn next_reference_id(&mut self, kind: ReferenceKind) -> i64 {
        let seq = match kind {
            ReferenceKind::Resource => &mut self.last_resource_id,
            ReferenceKind::Unit => &mut self.last_unit_id,
        };
        *seq += 1;
        *seq
    }

    fn name_taken(&self, kind: ReferenceKind, name: &str, exclude: Option<i64>) -> bool {
        let needle = name.to_lowercase();
        self.table(kind)
            .values()
            .any(|r| Some(r.id) != exclude && r.name.to_lowercase() == needle)
    }

    fn number_taken(&self, number: &str, exclude: Option<DocumentId>) -> bool {
        let needle = number.to_lowercase();
        self.documents
            .iter()
            .any(|(id, row)| Some(*id) != exclude && row.number.to_lowercase() == needle)
    }

    fn in_use(&self, kind: ReferenceKind, id: i64) -> bool {
        self.items.iter().any(|item| match kind {
            ReferenceKind::Resource => item.resource_id.as_i64() == id,
            ReferenceKind::Unit => item.unit_id.as_i64() == id,
        })
    }

    /// Simulates the foreign keys from items to resources and units.
    fn check_references(&self, items: &[NewReceiptItem]) -> Result<()> {
        for item in items {
            let resource_id = item.resource_id.as_i64();
            if !self.resources.contains_key(&resource_id) {
                return Err(StoreError::MissingReference {
                    kind: ReferenceKind::Resource,
                    id: resource_id,
                });
            }
            let unit_id = item.unit_id.as_i64();
            if !self.units.contains_key(&unit_id) {
                return Err(StoreError::MissingReference {
                    kind: ReferenceKind::Unit,
                    id: unit_id,
                });
            }
        }
        Ok(())
    }

    fn push_items(&mut self, document_id: DocumentId, items: Vec<NewReceiptItem>) {
        for item in items {
            self.last_item_id += 1;
            self.items.push(ReceiptItem {
                id: ItemId::new(self.last_item_id),
                document_id,
                resource_id: item.resource_id,
                unit_id: item.unit_id,
                quantity: item.quantity,
            });
        }
    }

    fn document(&self, id: DocumentId) -> Option<ReceiptDocument> {
        let row = self.documents.get(&id)?;
        Some(ReceiptDocument {
            id,
            number: row.number.clone(),
            date: row.date,
            items: self
                .items
                .iter()
                .filter(|item| item.document_id == id)
                .cloned()
                .collect(),
        })
    }

    fn details(&self, item: &ReceiptItem, document: &DocumentRow) -> ItemDetails {
        let name_of = |kind: ReferenceKind, id: i64| {
            self.table(kind)
                .get(&id)
                .map(|r| r.name.clone())
                .unwrap_or_default()
        };

        ItemDetails {
            id: item.id,
            document_id: item.document_id,
            document_number: document.number.clone(),
            document_date: document.date,
            resource_id: item.resource_id,
            resource_name: name_of(ReferenceKind::Resource, item.resource_id.as_i64()),
            unit_id: item.unit_id,
            unit_name: name_of(ReferenceKind::Unit, item.unit_id.as_i64()),
            quantity: item.quantity,
        }
    }
}

/// In-memory inventory store.
///
/// Provides the same semantics as the PostgreSQL implementation and is used
/// for tests and for running without a database.
#[derive(Clone, Default)]
pub struct InMemoryInventoryStore {
    state: Arc<RwLock<InventoryState>>,
}

impl InMemoryInventoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored line items.
    pub async fn item_count(&self) -> usize {
        self.state.read().await.items.len()
    }

    /// Returns the total number of stored documents.
    pub async fn document_count(&self) -> usize {
        self.state.read().await.documents.len()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn list_references(
        &self,
        kind: ReferenceKind,
        include_archived: bool,
        must_include: &[i64],
    ) -> Result<Vec<ReferenceRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<_> = state
            .table(kind)
            .values()
            .filter(|r| include_archived || !r.is_archived || must_include.contains(&r.id))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn get_reference(&self, kind: ReferenceKind, id: i64) -> Result<Option<ReferenceRecord>> {
        Ok(self.state.read().await.table(kind).get(&id).cloned())
    }

    async fn reference_name_taken(
        &self,
        kind: ReferenceKind,
        name: &str,
        exclude: Option<i64>,
    ) -> Result<bool> {
        Ok(self.state.read().await.name_taken(kind, name, exclude))
    }

    async fn insert_reference(&self, kind: ReferenceKind, name: &str) -> Result<ReferenceRecord> {
        let mut state = self.state.write().await;

        // Unique index simulation
        if state.name_taken(kind, name, None) {
            return Err(StoreError::UniqueViolation {
                entity: kind.label(),
                value: name.to_string(),
            });
        }

        let record = ReferenceRecord {
            id: state.next_reference_id(kind),
            name: name.to_string(),
            is_archived: false,
        };
        state.table_mut(kind).insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_reference(
        &self,
        kind: ReferenceKind,
        record: &ReferenceRecord,
    ) -> Result<ReferenceRecord> {
        let mut state = self.state.write().await;

        if !state.table(kind).contains_key(&record.id) {
            return Err(StoreError::NotFound {
                entity: kind.label(),
                id: record.id,
            });
        }
        if state.name_taken(kind, &record.name, Some(record.id)) {
            return Err(StoreError::UniqueViolation {
                entity: kind.label(),
                value: record.name.clone(),
            });
        }

        state.table_mut(kind).insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn reference_in_use(&self, kind: ReferenceKind, id: i64) -> Result<bool> {
        Ok(self.state.read().await.in_use(kind, id))
    }

    async fn delete_reference(&self, kind: ReferenceKind, id: i64) -> Result<()> {
        let mut state = self.state.write().await;

        if !state.table(kind).contains_key(&id) {
            return Err(StoreError::NotFound {
                entity: kind.label(),
                id,
            });
        }
        // ON DELETE RESTRICT simulation
        if state.in_use(kind, id) {
            return Err(StoreError::InUse { kind, id });
        }

        state.table_mut(kind).remove(&id);
        Ok(())
    }

    async fn document_number_taken(
        &self,
        number: &str,
        exclude: Option<DocumentId>,
    ) -> Result<bool> {
        Ok(self.state.read().await.number_taken(number, exclude))
    }

    async fn insert_document(&self, document: NewReceiptDocument) -> Result<ReceiptDocument> {
        let mut state = self.state.write().await;

        if state.number_taken(&document.number, None) {
            return Err(StoreError::UniqueViolation {
                entity: DOCUMENT,
                value: document.number,
            });
        }
        state.check_references(&document.items)?;

        state.last_document_id += 1;
        let id = DocumentId::new(state.last_document_id);
        state.documents.insert(
            id,
            DocumentRow {
                number: document.number,
                date: document.date,
            },
        );
        state.push_items(id, document.items);

        state.document(id).ok_or(StoreError::NotFound {
            entity: DOCUMENT,
            id: id.as_i64(),
        })
    }

    async fn replace_document(
        &self,
        id: DocumentId,
        document: NewReceiptDocument,
    ) -> Result<ReceiptDocument> {
        let mut state = self.state.write().await;

        if !state.documents.contains_key(&id) {
            return Err(StoreError::NotFound {
                entity: DOCUMENT,
                id: id.as_i64(),
            });
        }
        if state.number_taken(&document.number, Some(id)) {
            return Err(StoreError::UniqueViolation {
                entity: DOCUMENT,
                value: document.number,
            });
        }
        state.check_references(&document.items)?;

        state.documents.insert(
            id,
            DocumentRow {
                number: document.number,
                date: document.date,
            },
        );
        state.items.retain(|item| item.document_id != id);
        state.push_items(id, document.items);

        state.document(id).ok_or(StoreError::NotFound {
            entity: DOCUMENT,
            id: id.as_i64(),
        })
    }

    async fn delete_document(&self, id: DocumentId) -> Result<()> {
        let mut state = self.state.write().await;

        if state.documents.remove(&id).is_none() {
            return Err(StoreError::NotFound {
                entity: DOCUMENT,
                id: id.as_i64(),
            });
        }
        // ON DELETE CASCADE simulation
        state.items.retain(|item| item.document_id != id);
        Ok(())
    }

    async fn get_document(&self, id: DocumentId) -> Result<Option<ReceiptDocument>> {
        Ok(self.state.read().await.document(id))
    }

    async fn query_documents(&self, query: &DocumentQuery) -> Result<Vec<DocumentDetails>> {
        let state = self.state.read().await;

        let documents = state
            .documents
            .iter()
            .filter(|(id, row)| {
                if query.is_unrestricted() {
                    return true;
                }
                if let Some(from) = query.date_from
                    && row.date < from
                {
                    return false;
                }
                if let Some(to) = query.date_to
                    && row.date > to
                {
                    return false;
                }
                if !query.document_numbers.is_empty()
                    && !query.document_numbers.contains(&row.number)
                {
                    return false;
                }
                let mut items = state.items.iter().filter(|i| i.document_id == **id);
                if !query.resource_ids.is_empty()
                    && !items
                        .clone()
                        .any(|i| query.resource_ids.contains(&i.resource_id))
                {
                    return false;
                }
                if !query.unit_ids.is_empty() && !items.any(|i| query.unit_ids.contains(&i.unit_id))
                {
                    return false;
                }
                true
            })
            .map(|(id, row)| DocumentDetails {
                id: *id,
                number: row.number.clone(),
                date: row.date,
                items: state
                    .items
                    .iter()
                    .filter(|item| item.document_id == *id)
                    .map(|item| state.details(item, row))
                    .collect(),
            })
            .collect();

        Ok(documents)
    }

    async fn query_items(&self, query: &ItemQuery) -> Result<Vec<ItemDetails>> {
        let state = self.state.read().await;

        let items = state
            .items
            .iter()
            .filter(|item| query.matches(item.resource_id, item.unit_id))
            .filter_map(|item| {
                let row = state.documents.get(&item.document_id)?;
                Some(state.details(item, row))
            })
            .collect();

        Ok(items)
    }

    async fn document_numbers(&self) -> Result<Vec<String>> {
        let state = self.state.read().await;
        let mut numbers: Vec<_> = state.documents.values().map(|d| d.number.clone()).collect();
        numbers.sort();
        numbers.dedup();
        Ok(numbers)
    }
}
