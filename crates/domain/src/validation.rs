//! Normalization and validation of submitted fields and receipt lines.

use chrono::NaiveDate;
use common::{ResourceId, UnitId};
use inventory_store::{NewReceiptItem, ReferenceKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Maximum receipt document number length in characters.
pub const MAX_NUMBER_LEN: usize = 50;

/// Trims a resource or unit name and checks it against the kind's limit.
pub fn normalize_name(kind: ReferenceKind, name: &str) -> Result<String, DomainError> {
    required_text("name", name, kind.max_name_len())
}

/// Trims a receipt document number and checks its length.
pub fn normalize_number(number: &str) -> Result<String, DomainError> {
    required_text("number", number, MAX_NUMBER_LEN)
}

/// Rejects a submission without a document date.
pub fn require_date(date: Option<NaiveDate>) -> Result<NaiveDate, DomainError> {
    date.ok_or_else(|| DomainError::validation("date", "date is required"))
}

fn required_text(field: &'static str, value: &str, max_len: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(DomainError::validation(
            field,
            format!("{field} must be at most {max_len} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// One submitted receipt line; zero means "not selected".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineInput {
    pub resource_id: ResourceId,
    pub unit_id: UnitId,
    pub quantity: Decimal,
}

/// How filled-in a submitted line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Nothing selected and zero quantity; silently dropped.
    Empty,
    /// Resource and unit selected and a positive quantity.
    Complete,
    /// Anything else; rejects the whole submission.
    Partial,
}

impl LineInput {
    pub fn new(resource_id: ResourceId, unit_id: UnitId, quantity: Decimal) -> Self {
        Self {
            resource_id,
            unit_id,
            quantity,
        }
    }

    /// A blank line, as offered by an empty form.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn classify(&self) -> LineKind {
        if self.resource_id.is_unset() && self.unit_id.is_unset() && self.quantity.is_zero() {
            LineKind::Empty
        } else if !self.resource_id.is_unset()
            && !self.unit_id.is_unset()
            && self.quantity > Decimal::ZERO
        {
            LineKind::Complete
        } else {
            LineKind::Partial
        }
    }
}

/// Keeps the complete lines, in order, and drops the empty ones.
///
/// Stops at the first partial line with [`DomainError::IncompleteLine`]
/// carrying its 1-based position; later lines are not inspected.
pub fn normalize_lines(lines: &[LineInput]) -> Result<Vec<NewReceiptItem>, DomainError> {
    let mut items = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        match line.classify() {
            LineKind::Empty => {}
            LineKind::Complete => items.push(NewReceiptItem {
                resource_id: line.resource_id,
                unit_id: line.unit_id,
                quantity: line.quantity,
            }),
            LineKind::Partial => return Err(DomainError::IncompleteLine { line: index + 1 }),
        }
    }

    Ok(items)
}
