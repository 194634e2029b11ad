//! Receipt documents: submission input, form payloads and the service that
//! applies them.

mod commands;
mod form;
mod service;

pub use commands::ReceiptInput;
pub use form::{FormOptions, ReceiptForm};
pub use service::ReceiptService;
