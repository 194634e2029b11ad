//! Shared types for the warehouse receipts system.

pub mod ids;

pub use ids::{DocumentId, ItemId, ResourceId, UnitId};
