//! Read views for the query side.

pub mod receipts;
pub mod warehouse;

pub use receipts::{DocumentListing, ReceiptsView};
pub use warehouse::{ItemListing, WarehouseView};
