use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ResourceId, UnitId};

/// Builder for filtering receipt documents.
///
/// Every criterion is optional and they combine with AND. An empty id or
/// number set means "no restriction", not "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentQuery {
    /// Keep documents dated on or after this day.
    pub date_from: Option<NaiveDate>,

    /// Keep documents dated on or before this day.
    pub date_to: Option<NaiveDate>,

    /// Keep documents with at least one item for any of these resources.
    pub resource_ids: Vec<ResourceId>,

    /// Keep documents with at least one item in any of these units.
    pub unit_ids: Vec<UnitId>,

    /// Keep documents whose number is exactly one of these.
    pub document_numbers: Vec<String>,
}

impl DocumentQuery {
    /// Creates a query matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn resource_ids(mut self, ids: impl IntoIterator<Item = ResourceId>) -> Self {
        self.resource_ids = ids.into_iter().collect();
        self
    }

    pub fn unit_ids(mut self, ids: impl IntoIterator<Item = UnitId>) -> Self {
        self.unit_ids = ids.into_iter().collect();
        self
    }

    pub fn document_numbers<I, N>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.document_numbers = numbers.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true when no criterion is set.
    pub fn is_unrestricted(&self) -> bool {
        self.date_from.is_none()
            && self.date_to.is_none()
            && self.resource_ids.is_empty()
            && self.unit_ids.is_empty()
            && self.document_numbers.is_empty()
    }
}

/// Builder for filtering the flattened list of received items.
///
/// Unlike [`DocumentQuery`], the id sets are matched against each item's own
/// resource and unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    pub resource_ids: Vec<ResourceId>,
    pub unit_ids: Vec<UnitId>,
}

impl ItemQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource_ids(mut self, ids: impl IntoIterator<Item = ResourceId>) -> Self {
        self.resource_ids = ids.into_iter().collect();
        self
    }

    pub fn unit_ids(mut self, ids: impl IntoIterator<Item = UnitId>) -> Self {
        self.unit_ids = ids.into_iter().collect();
        self
    }

    /// Returns true if an item with these references passes the filter.
    pub fn matches(&self, resource_id: ResourceId, unit_id: UnitId) -> bool {
        (self.resource_ids.is_empty() || self.resource_ids.contains(&resource_id))
            && (self.unit_ids.is_empty() || self.unit_ids.contains(&unit_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_unrestricted() {
        assert!(DocumentQuery::new().is_unrestricted());
        assert!(DocumentQuery::new().resource_ids([]).is_unrestricted());
    }

    #[test]
    fn query_builder_chain() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let query = DocumentQuery::new()
            .date_from(from)
            .date_to(to)
            .resource_ids([ResourceId::new(1)])
            .unit_ids([UnitId::new(2), UnitId::new(3)])
            .document_numbers(["R-1"]);

        assert_eq!(query.date_from, Some(from));
        assert_eq!(query.date_to, Some(to));
        assert_eq!(query.resource_ids, vec![ResourceId::new(1)]);
        assert_eq!(query.unit_ids.len(), 2);
        assert_eq!(query.document_numbers, vec!["R-1".to_string()]);
        assert!(!query.is_unrestricted());
    }

    #[test]
    fn item_query_matches_per_item() {
        let query = ItemQuery::new().resource_ids([ResourceId::new(1)]);
        assert!(query.matches(ResourceId::new(1), UnitId::new(9)));
        assert!(!query.matches(ResourceId::new(2), UnitId::new(9)));

        let query = query.unit_ids([UnitId::new(4)]);
        assert!(!query.matches(ResourceId::new(1), UnitId::new(9)));
        assert!(query.matches(ResourceId::new(1), UnitId::new(4)));

        assert!(ItemQuery::new().matches(ResourceId::new(5), UnitId::new(5)));
    }
}
