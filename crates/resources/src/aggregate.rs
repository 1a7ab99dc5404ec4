//! Grouped allocation metrics.
//!
//! Quantities are summed per bucket first and the percentage is derived once
//! from the sums, so merging buckets never accumulates rounding error.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use sr_core::types::ResourceRecord;

/// Errors from allocation arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    /// Percentage of a zero requirement. Distinct from both 0% and 100%.
    #[error("allocation percentage undefined: required quantity is zero")]
    DivisionUndefined,
}

/// Grouping key for [`group_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Type,
    Location,
}

impl Dimension {
    fn key_of(&self, record: &ResourceRecord) -> String {
        match self {
            Dimension::Type => record.resource_type.as_str().to_string(),
            Dimension::Location => record.location.clone(),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "type" => Ok(Dimension::Type),
            "location" => Ok(Dimension::Location),
            other => Err(format!("unknown grouping dimension: {other}")),
        }
    }
}

/// Allocation band of a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationUrgency {
    /// Below 40%.
    Critical,
    /// 40% up to but excluding 70%.
    Caution,
    /// 70% and above.
    Adequate,
}

impl AllocationUrgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationUrgency::Critical => "critical",
            AllocationUrgency::Caution => "caution",
            AllocationUrgency::Adequate => "adequate",
        }
    }
}

impl fmt::Display for AllocationUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summed quantities of one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceAggregate {
    pub available: u64,
    pub allocated: u64,
    pub required: u64,
    pub member_count: usize,
}

impl ResourceAggregate {
    pub fn accumulate(&mut self, record: &ResourceRecord) {
        self.available = self.available.saturating_add(record.available);
        self.allocated = self.allocated.saturating_add(record.allocated);
        self.required = self.required.saturating_add(record.required);
        self.member_count += 1;
    }

    /// `round(allocated / required × 100)`, halves rounding up.
    pub fn allocation_percentage(&self) -> Result<u64, AggregationError> {
        if self.required == 0 {
            return Err(AggregationError::DivisionUndefined);
        }
        let allocated = u128::from(self.allocated);
        let required = u128::from(self.required);
        let rounded = (allocated * 200 + required) / (2 * required);
        Ok(u64::try_from(rounded).unwrap_or(u64::MAX))
    }

    /// Serializable view with the derived fields filled in.
    pub fn report(&self) -> AggregateReport {
        let percentage = self.allocation_percentage().ok();
        AggregateReport {
            available: self.available,
            allocated: self.allocated,
            required: self.required,
            member_count: self.member_count,
            allocation_percentage: percentage,
            urgency: percentage
                .map(|p| classify_percentage(p).as_str())
                .unwrap_or("undefined"),
        }
    }
}

/// Wire form of a [`ResourceAggregate`].
///
/// A zero requirement serializes as a null percentage and `"undefined"`
/// urgency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub available: u64,
    pub allocated: u64,
    pub required: u64,
    pub member_count: usize,
    pub allocation_percentage: Option<u64>,
    pub urgency: &'static str,
}

/// Band a rounded percentage.
pub fn classify_percentage(percentage: u64) -> AllocationUrgency {
    if percentage < 40 {
        AllocationUrgency::Critical
    } else if percentage < 70 {
        AllocationUrgency::Caution
    } else {
        AllocationUrgency::Adequate
    }
}

/// Band an aggregate by its rounded allocation percentage.
pub fn classify_urgency(aggregate: &ResourceAggregate) -> Result<AllocationUrgency, AggregationError> {
    aggregate.allocation_percentage().map(classify_percentage)
}

/// Bucket records by `dimension`. Keys come back sorted.
pub fn group_by<'a, I>(records: I, dimension: Dimension) -> BTreeMap<String, ResourceAggregate>
where
    I: IntoIterator<Item = &'a ResourceRecord>,
{
    let mut groups: BTreeMap<String, ResourceAggregate> = BTreeMap::new();
    for record in records {
        groups
            .entry(dimension.key_of(record))
            .or_default()
            .accumulate(record);
    }
    groups
}
