//! Reference data services for resources and units.

use std::marker::PhantomData;

use inventory_store::{
    InventoryStore, InventoryStoreExt, Reference, ReferenceKind, ReferenceRecord, Resource,
    StoreError, Unit,
};

use crate::error::DomainError;
use crate::validation::normalize_name;

/// Service for managing one kind of reference data.
///
/// Resources and units share all of their rules; only the name length limit
/// differs, and that comes from [`Reference::KIND`].
pub struct ReferenceService<S: InventoryStore, R: Reference> {
    store: S,
    _phantom: PhantomData<R>,
}

/// Service for resources (materials).
pub type ResourceService<S> = ReferenceService<S, Resource>;

/// Service for units of measure.
pub type UnitService<S> = ReferenceService<S, Unit>;

impl<S: InventoryStore, R: Reference> ReferenceService<S, R> {
    /// Creates a new reference service with the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Lists records sorted by name.
    ///
    /// With `include_archived` false this is the selection list for forms:
    /// active records plus the archived ones in `must_include`.
    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        include_archived: bool,
        must_include: &[R::Id],
    ) -> Result<Vec<R>, DomainError> {
        Ok(self
            .store
            .references::<R>(include_archived, must_include)
            .await?)
    }

    /// Loads a record by id.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: R::Id) -> Result<R, DomainError> {
        self.store
            .reference::<R>(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: R::KIND.label(),
                id: id.into(),
            })
    }

    /// Creates a new, active record.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<R, DomainError> {
        let kind = R::KIND;
        let name = normalize_name(kind, name)?;

        if self.store.reference_name_taken(kind, &name, None).await? {
            return Err(DomainError::DuplicateName { kind, name });
        }

        let record = self
            .store
            .insert_reference(kind, &name)
            .await
            .map_err(|e| duplicate_name_or(e, kind, &name))?;

        metrics::counter!("reference_records_created_total", "kind" => kind.label()).increment(1);
        tracing::info!(%kind, id = record.id, name = %record.name, "reference record created");

        Ok(R::from_record(record))
    }

    /// Renames and/or (un)archives a record.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: R::Id, name: &str, is_archived: bool) -> Result<R, DomainError> {
        let kind = R::KIND;
        let name = normalize_name(kind, name)?;
        let id: i64 = id.into();

        if self.store.reference_name_taken(kind, &name, Some(id)).await? {
            return Err(DomainError::DuplicateName { kind, name });
        }

        let record = self
            .store
            .update_reference(
                kind,
                &ReferenceRecord {
                    id,
                    name: name.clone(),
                    is_archived,
                },
            )
            .await
            .map_err(|e| duplicate_name_or(e, kind, &name))?;

        tracing::info!(%kind, id, is_archived, "reference record updated");
        Ok(R::from_record(record))
    }

    /// Hard-deletes a record that no receipt item references.
    ///
    /// A referenced record is left untouched and [`DomainError::InUse`] is
    /// returned; its message advises archiving instead.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: R::Id) -> Result<(), DomainError> {
        let kind = R::KIND;
        let id: i64 = id.into();

        if self.store.reference_in_use(kind, id).await? {
            metrics::counter!("reference_deletes_blocked_total", "kind" => kind.label())
                .increment(1);
            tracing::warn!(%kind, id, "delete refused, record is in use");
            return Err(DomainError::InUse { kind, id });
        }

        self.store.delete_reference(kind, id).await?;

        tracing::info!(%kind, id, "reference record deleted");
        Ok(())
    }
}

fn duplicate_name_or(e: StoreError, kind: ReferenceKind, name: &str) -> DomainError {
    match e {
        StoreError::UniqueViolation { .. } => DomainError::DuplicateName {
            kind,
            name: name.to_string(),
        },
        other => other.into(),
    }
}
