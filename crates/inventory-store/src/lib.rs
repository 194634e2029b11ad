pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod query;
pub mod store;

pub use common::{DocumentId, ItemId, ResourceId, UnitId};
pub use error::{Result, StoreError};
pub use memory::InMemoryInventoryStore;
pub use model::{
    DocumentDetails, ItemDetails, NewReceiptDocument, NewReceiptItem, ReceiptDocument,
    ReceiptItem, Reference, ReferenceKind, ReferenceRecord, Resource, Unit,
};
pub use postgres::PostgresInventoryStore;
pub use query::{DocumentQuery, ItemQuery};
pub use store::{InventoryStore, InventoryStoreExt};
