//! Persisted records and the read shapes returned by queries.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::NaiveDate;
use common::{DocumentId, ItemId, ResourceId, UnitId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two kinds of reference data a receipt line points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Resource,
    Unit,
}

impl ReferenceKind {
    /// Maximum name length in characters.
    pub const fn max_name_len(self) -> usize {
        match self {
            ReferenceKind::Resource => 100,
            ReferenceKind::Unit => 50,
        }
    }

    /// Lower-case singular label used in messages.
    pub const fn label(self) -> &'static str {
        match self {
            ReferenceKind::Resource => "resource",
            ReferenceKind::Unit => "unit",
        }
    }

    pub(crate) const fn table(self) -> &'static str {
        match self {
            ReferenceKind::Resource => "resources",
            ReferenceKind::Unit => "units",
        }
    }

    pub(crate) const fn item_column(self) -> &'static str {
        match self {
            ReferenceKind::Resource => "resource_id",
            ReferenceKind::Unit => "unit_id",
        }
    }
}

impl Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Untyped row shared by the `resources` and `units` tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    pub id: i64,
    pub name: String,
    pub is_archived: bool,
}

/// A typed reference data record (resource or unit).
///
/// Services are written once against this trait and instantiated for
/// [`Resource`] and [`Unit`].
pub trait Reference: Clone + Debug + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + Debug + Display + Send + Sync + From<i64> + Into<i64>;

    const KIND: ReferenceKind;

    fn id(&self) -> Self::Id;
    fn name(&self) -> &str;
    fn is_archived(&self) -> bool;
    fn from_record(record: ReferenceRecord) -> Self;
}

/// A material or good that can be received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    pub is_archived: bool,
}

/// A unit of measure (kg, piece, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub is_archived: bool,
}

impl Reference for Resource {
    type Id = ResourceId;

    const KIND: ReferenceKind = ReferenceKind::Resource;

    fn id(&self) -> ResourceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_archived(&self) -> bool {
        self.is_archived
    }

    fn from_record(record: ReferenceRecord) -> Self {
        Self {
            id: ResourceId::new(record.id),
            name: record.name,
            is_archived: record.is_archived,
        }
    }
}

impl Reference for Unit {
    type Id = UnitId;

    const KIND: ReferenceKind = ReferenceKind::Unit;

    fn id(&self) -> UnitId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_archived(&self) -> bool {
        self.is_archived
    }

    fn from_record(record: ReferenceRecord) -> Self {
        Self {
            id: UnitId::new(record.id),
            name: record.name,
            is_archived: record.is_archived,
        }
    }
}

/// A line item ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReceiptItem {
    pub resource_id: ResourceId,
    pub unit_id: UnitId,
    pub quantity: Decimal,
}

/// A receipt document ready to be inserted (or to replace an existing one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReceiptDocument {
    pub number: String,
    pub date: NaiveDate,
    pub items: Vec<NewReceiptItem>,
}

/// A stored line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub id: ItemId,
    pub document_id: DocumentId,
    pub resource_id: ResourceId,
    pub unit_id: UnitId,
    pub quantity: Decimal,
}

/// A stored receipt document together with the items it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptDocument {
    pub id: DocumentId,
    pub number: String,
    pub date: NaiveDate,
    pub items: Vec<ReceiptItem>,
}

/// A line item with its resource, unit and document resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub id: ItemId,
    pub document_id: DocumentId,
    pub document_number: String,
    pub document_date: NaiveDate,
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub unit_id: UnitId,
    pub unit_name: String,
    pub quantity: Decimal,
}

/// A receipt document with resolved item details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDetails {
    pub id: DocumentId,
    pub number: String,
    pub date: NaiveDate,
    pub items: Vec<ItemDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_limits_per_kind() {
        assert_eq!(ReferenceKind::Resource.max_name_len(), 100);
        assert_eq!(ReferenceKind::Unit.max_name_len(), 50);
    }

    #[test]
    fn typed_records_from_rows() {
        let record = ReferenceRecord {
            id: 3,
            name: "Steel".to_string(),
            is_archived: true,
        };
        let resource = Resource::from_record(record.clone());
        assert_eq!(resource.id(), ResourceId::new(3));
        assert!(resource.is_archived());

        let unit = Unit::from_record(record);
        assert_eq!(unit.id(), UnitId::new(3));
        assert_eq!(unit.name(), "Steel");
    }
}
