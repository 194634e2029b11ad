//! Payloads for rendering the receipt create/edit form.

use chrono::NaiveDate;
use common::DocumentId;
use inventory_store::{ReceiptDocument, Resource, Unit};
use serde::{Deserialize, Serialize};

use crate::validation::LineInput;

/// Resources and units offered in a form's line selectors.
///
/// Active records, plus archived ones that the lines already reference so an
/// existing selection stays visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormOptions {
    pub resources: Vec<Resource>,
    pub units: Vec<Unit>,
}

/// Everything needed to render a receipt form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptForm {
    /// Set when editing an existing document.
    pub id: Option<DocumentId>,
    pub number: String,
    pub date: NaiveDate,
    pub lines: Vec<LineInput>,
    pub options: FormOptions,
}

impl ReceiptForm {
    /// A blank form dated `today` with a single empty line.
    pub(crate) fn blank(today: NaiveDate, options: FormOptions) -> Self {
        Self {
            id: None,
            number: String::new(),
            date: today,
            lines: vec![LineInput::empty()],
            options,
        }
    }

    /// A form prefilled from a stored document.
    pub(crate) fn for_document(document: &ReceiptDocument, options: FormOptions) -> Self {
        Self {
            id: Some(document.id),
            number: document.number.clone(),
            date: document.date,
            lines: lines_of(document),
            options,
        }
    }
}

/// One line per stored item, or one empty line for a document without items.
pub(crate) fn lines_of(document: &ReceiptDocument) -> Vec<LineInput> {
    if document.items.is_empty() {
        return vec![LineInput::empty()];
    }

    document
        .items
        .iter()
        .map(|item| LineInput::new(item.resource_id, item.unit_id, item.quantity))
        .collect()
}
