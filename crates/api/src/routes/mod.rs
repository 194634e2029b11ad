//! HTTP route handlers.

pub mod health;
pub mod metrics;
pub mod params;
pub mod receipts;
pub mod references;
pub mod warehouse;
