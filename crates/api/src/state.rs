//! Shared application state.

use domain::{ReceiptService, ReferenceService, ResourceService, UnitService};
use inventory_store::{InventoryStore, Reference, Resource, Unit};
use queries::{ReceiptsView, WarehouseView};

/// Shared application state accessible from all handlers.
pub struct AppState<S: InventoryStore> {
    pub resources: ResourceService<S>,
    pub units: UnitService<S>,
    pub receipts: ReceiptService<S>,
    pub receipts_view: ReceiptsView<S>,
    pub warehouse_view: WarehouseView<S>,
}

impl<S: InventoryStore + Clone> AppState<S> {
    /// Builds every service and view over one store.
    pub fn new(store: S) -> Self {
        Self {
            resources: ResourceService::new(store.clone()),
            units: UnitService::new(store.clone()),
            receipts: ReceiptService::new(store.clone()),
            receipts_view: ReceiptsView::new(store.clone()),
            warehouse_view: WarehouseView::new(store),
        }
    }
}

/// Selects the reference service for `R`, so the resource and unit routes
/// can share one set of handlers.
pub trait ReferenceServices<S: InventoryStore, R: Reference> {
    fn reference_service(&self) -> &ReferenceService<S, R>;
}

impl<S: InventoryStore> ReferenceServices<S, Resource> for AppState<S> {
    fn reference_service(&self) -> &ReferenceService<S, Resource> {
        &self.resources
    }
}

impl<S: InventoryStore> ReferenceServices<S, Unit> for AppState<S> {
    fn reference_service(&self) -> &ReferenceService<S, Unit> {
        &self.units
    }
}
