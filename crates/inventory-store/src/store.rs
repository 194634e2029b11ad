use async_trait::async_trait;

use crate::{
    DocumentDetails, DocumentId, DocumentQuery, ItemDetails, ItemQuery, NewReceiptDocument,
    ReceiptDocument, Reference, ReferenceKind, ReferenceRecord, Result,
};

/// Core trait for inventory store implementations.
///
/// Every mutating method is atomic: it either applies completely or leaves
/// the store untouched. Implementations enforce the same constraints a
/// relational schema would (case-insensitive unique names and numbers,
/// cascade from documents to items, restrict from resources/units to items)
/// and report violations through [`StoreError`](crate::StoreError).
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Lists reference records of one kind, sorted by name.
    ///
    /// With `include_archived` false, archived records are skipped unless
    /// their id is in `must_include`.
    async fn list_references(
        &self,
        kind: ReferenceKind,
        include_archived: bool,
        must_include: &[i64],
    ) -> Result<Vec<ReferenceRecord>>;

    /// Gets a single reference record.
    async fn get_reference(&self, kind: ReferenceKind, id: i64) -> Result<Option<ReferenceRecord>>;

    /// Checks whether another record of this kind already uses `name`
    /// (case-insensitive), ignoring the record with id `exclude`.
    async fn reference_name_taken(
        &self,
        kind: ReferenceKind,
        name: &str,
        exclude: Option<i64>,
    ) -> Result<bool>;

    /// Inserts a new, non-archived reference record.
    ///
    /// Fails with `UniqueViolation` if the name is taken.
    async fn insert_reference(&self, kind: ReferenceKind, name: &str) -> Result<ReferenceRecord>;

    /// Overwrites the name and archive flag of an existing record.
    ///
    /// Fails with `NotFound` if the record does not exist at write time.
    async fn update_reference(
        &self,
        kind: ReferenceKind,
        record: &ReferenceRecord,
    ) -> Result<ReferenceRecord>;

    /// Checks whether any receipt item references the record.
    async fn reference_in_use(&self, kind: ReferenceKind, id: i64) -> Result<bool>;

    /// Hard-deletes a reference record.
    ///
    /// Fails with `InUse` if receipt items still reference it and with
    /// `NotFound` if it does not exist.
    async fn delete_reference(&self, kind: ReferenceKind, id: i64) -> Result<()>;

    /// Checks whether another document already uses `number`
    /// (case-insensitive), ignoring the document with id `exclude`.
    async fn document_number_taken(&self, number: &str, exclude: Option<DocumentId>)
    -> Result<bool>;

    /// Inserts a document and all of its items.
    async fn insert_document(&self, document: NewReceiptDocument) -> Result<ReceiptDocument>;

    /// Replaces a document's header and its entire item set.
    ///
    /// Existing items are deleted and the new ones inserted; nothing is
    /// diffed. Fails with `NotFound` if the document vanished.
    async fn replace_document(
        &self,
        id: DocumentId,
        document: NewReceiptDocument,
    ) -> Result<ReceiptDocument>;

    /// Deletes a document; its items go with it.
    async fn delete_document(&self, id: DocumentId) -> Result<()>;

    /// Gets a document with its items in insertion order.
    async fn get_document(&self, id: DocumentId) -> Result<Option<ReceiptDocument>>;

    /// Retrieves documents matching a query, in id order, with resolved items.
    async fn query_documents(&self, query: &DocumentQuery) -> Result<Vec<DocumentDetails>>;

    /// Retrieves the flattened item list matching a query, in id order.
    async fn query_items(&self, query: &ItemQuery) -> Result<Vec<ItemDetails>>;

    /// Returns every document number, sorted.
    async fn document_numbers(&self) -> Result<Vec<String>>;
}

/// Extension trait providing typed access to reference data.
#[async_trait]
pub trait InventoryStoreExt: InventoryStore {
    /// Lists typed reference records; see [`InventoryStore::list_references`].
    async fn references<R: Reference>(
        &self,
        include_archived: bool,
        must_include: &[R::Id],
    ) -> Result<Vec<R>> {
        let ids: Vec<i64> = must_include.iter().map(|id| (*id).into()).collect();
        let records = self.list_references(R::KIND, include_archived, &ids).await?;
        Ok(records.into_iter().map(R::from_record).collect())
    }

    /// Gets a typed reference record.
    async fn reference<R: Reference>(&self, id: R::Id) -> Result<Option<R>> {
        let record = self.get_reference(R::KIND, id.into()).await?;
        Ok(record.map(R::from_record))
    }
}

// Blanket implementation for all InventoryStore implementations
impl<T: InventoryStore + ?Sized> InventoryStoreExt for T {}
