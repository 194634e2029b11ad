//! Domain layer for the warehouse receipts system.
//!
//! This crate provides the command side of the application:
//! - Validation and normalization of submitted names, numbers and lines
//! - Reference data services (resources, units) with the deletion guard
//! - Receipt document commands and form payloads

pub mod error;
pub mod receipt;
pub mod reference;
pub mod validation;

pub use error::DomainError;
pub use receipt::{FormOptions, ReceiptForm, ReceiptInput, ReceiptService};
pub use reference::{ReferenceService, ResourceService, UnitService};
pub use validation::{LineInput, LineKind, MAX_NUMBER_LEN};
