//! Stable multi-field sorting of ledger records.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::str::FromStr;

use sr_core::types::ResourceRecord;

/// Sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Type,
    Location,
    Unit,
    Available,
    Allocated,
    Required,
    Priority,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "type" => Ok(SortField::Type),
            "location" => Ok(SortField::Location),
            "unit" => Ok(SortField::Unit),
            "available" => Ok(SortField::Available),
            "allocated" => Ok(SortField::Allocated),
            "required" => Ok(SortField::Required),
            "priority" => Ok(SortField::Priority),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Ascending comparison on one field.
///
/// Strings compare case-insensitively (see [`compare_text`]). Quantities
/// compare numerically and priority by rank (low < medium < high).
pub fn compare(a: &ResourceRecord, b: &ResourceRecord, field: SortField) -> Ordering {
    match field {
        SortField::Name => compare_text(&a.name, &b.name),
        SortField::Type => compare_text(a.resource_type.as_str(), b.resource_type.as_str()),
        SortField::Location => compare_text(&a.location, &b.location),
        SortField::Unit => compare_text(&a.unit, &b.unit),
        SortField::Available => a.available.cmp(&b.available),
        SortField::Allocated => a.allocated.cmp(&b.allocated),
        SortField::Required => a.required.cmp(&b.required),
        SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
    }
}

/// Lowercased text first, then the raw text, so `"bandages"` sorts before
/// `"Water"` and `"aid"`/`"Aid"` still have a fixed order.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Sort in place. Equal keys keep their input order in both directions.
///
/// Works on owned records or on references returned by
/// [`filter`](crate::filter::filter).
pub fn sort_by<T: Borrow<ResourceRecord>>(records: &mut [T], field: SortField, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ord = compare(a.borrow(), b.borrow(), field);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}
