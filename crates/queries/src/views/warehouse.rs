//! Warehouse read model: every received item as its own row.

use std::time::Instant;

use inventory_store::{InventoryStore, InventoryStoreExt, ItemDetails, ItemQuery, Resource, Unit};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::read_model::ReadModel;

/// One page of the warehouse listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemListing {
    /// Matching items with their document number and date.
    pub items: Vec<ItemDetails>,

    /// All resources for the filter panel, sorted by name.
    pub resources: Vec<Resource>,

    /// All units for the filter panel, sorted by name.
    pub units: Vec<Unit>,

    /// The filter that produced `items`.
    pub filter: ItemQuery,
}

/// Read model view for received items across all documents.
#[derive(Clone)]
pub struct WarehouseView<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> WarehouseView<S> {
    /// Creates a new warehouse view over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists items whose resource and unit pass `filter`.
    #[tracing::instrument(skip(self))]
    pub async fn list_items(&self, filter: ItemQuery) -> Result<ItemListing> {
        let started = Instant::now();

        let items = self.store.query_items(&filter).await?;
        let resources = self.store.references::<Resource>(true, &[]).await?;
        let units = self.store.references::<Unit>(true, &[]).await?;

        self.observe(started, items.len());

        Ok(ItemListing {
            items,
            resources,
            units,
            filter,
        })
    }
}

impl<S: InventoryStore> ReadModel for WarehouseView<S> {
    fn name(&self) -> &'static str {
        "WarehouseView"
    }
}
