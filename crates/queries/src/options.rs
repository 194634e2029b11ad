//! Option lists for the filter panels.

use inventory_store::{InventoryStore, InventoryStoreExt, Resource, Unit};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Everything a filter panel can offer.
///
/// Always loaded without applying the current filter, so narrowing a listing
/// never hides the options needed to widen it again. Archived records are
/// included: old documents still reference them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// All resources, sorted by name.
    pub resources: Vec<Resource>,

    /// All units, sorted by name.
    pub units: Vec<Unit>,

    /// All distinct document numbers, sorted.
    pub document_numbers: Vec<String>,
}

impl FilterOptions {
    /// Loads resources, units and document numbers.
    pub async fn load<S: InventoryStore>(store: &S) -> Result<Self> {
        Ok(Self {
            resources: store.references::<Resource>(true, &[]).await?,
            units: store.references::<Unit>(true, &[]).await?,
            document_numbers: store.document_numbers().await?,
        })
    }
}
