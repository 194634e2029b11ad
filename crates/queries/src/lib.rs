//! Filtered read views for the receipts and warehouse pages.
//!
//! This crate provides the query side over the inventory store:
//! - [`ReadModel`] trait shared by the views
//! - [`FilterOptions`], the unfiltered option lists shown next to a listing
//! - Two views: receipt documents with their items, and the flattened
//!   warehouse item list

pub mod error;
pub mod options;
pub mod read_model;
pub mod views;

pub use error::{QueryError, Result};
pub use options::FilterOptions;
pub use read_model::ReadModel;
pub use views::{DocumentListing, ItemListing, ReceiptsView, WarehouseView};
