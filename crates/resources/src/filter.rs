//! Conjunctive record filtering.

use sr_core::types::{Priority, ResourceRecord, ResourceType};

/// Optional predicates, combined with AND. An empty filter matches every
/// record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceFilter {
    pub resource_type: Option<ResourceType>,
    pub priority: Option<Priority>,
    /// Exact location match.
    pub location: Option<String>,
    /// Case-insensitive substring of the record name.
    pub name_contains: Option<String>,
}

impl ResourceFilter {
    pub fn is_empty(&self) -> bool {
        self.resource_type.is_none()
            && self.priority.is_none()
            && self.location.is_none()
            && self.name_contains.is_none()
    }

    pub fn matches(&self, record: &ResourceRecord) -> bool {
        if self.resource_type.is_some_and(|t| t != record.resource_type) {
            return false;
        }
        if self.priority.is_some_and(|p| p != record.priority) {
            return false;
        }
        if let Some(location) = &self.location {
            if *location != record.location {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            if !record.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Records passing every predicate, in input order.
pub fn filter<'a>(records: &'a [ResourceRecord], predicates: &ResourceFilter) -> Vec<&'a ResourceRecord> {
    records.iter().filter(|r| predicates.matches(r)).collect()
}
