//! Ledger-wide headline numbers.

use serde::Serialize;

use sr_core::types::{Priority, ResourceRecord};

use crate::aggregate::{classify_percentage, AllocationUrgency, ResourceAggregate};

/// Share of the requirement below which a high-priority record is a
/// critical shortage.
const SHORTAGE_RATIO: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub record_count: usize,
    pub total_available: u64,
    pub total_allocated: u64,
    pub total_required: u64,
    /// `None` when nothing is required.
    pub allocation_percentage: Option<u64>,
    pub urgency: Option<AllocationUrgency>,
    pub high_priority_count: usize,
    /// High-priority records with less than half their requirement
    /// allocated. Records requiring nothing are never short.
    pub critical_shortage_count: usize,
}

impl LedgerSummary {
    pub fn compute(records: &[ResourceRecord]) -> Self {
        let mut totals = ResourceAggregate::default();
        let mut high_priority_count = 0;
        let mut critical_shortage_count = 0;

        for record in records {
            totals.accumulate(record);
            if record.priority == Priority::High {
                high_priority_count += 1;
                if is_critical_shortage(record) {
                    critical_shortage_count += 1;
                }
            }
        }

        let allocation_percentage = totals.allocation_percentage().ok();
        Self {
            record_count: totals.member_count,
            total_available: totals.available,
            total_allocated: totals.allocated,
            total_required: totals.required,
            allocation_percentage,
            urgency: allocation_percentage.map(classify_percentage),
            high_priority_count,
            critical_shortage_count,
        }
    }
}

fn is_critical_shortage(record: &ResourceRecord) -> bool {
    record.required > 0 && (record.allocated as f64) < (record.required as f64) * SHORTAGE_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr_core::types::ResourceType;

    fn record(priority: Priority, allocated: u64, required: u64) -> ResourceRecord {
        ResourceRecord {
            id: format!("{priority}-{allocated}-{required}"),
            resource_type: ResourceType::Medical,
            name: "kits".to_string(),
            available: allocated,
            allocated,
            required,
            unit: "kits".to_string(),
            location: "Houston, TX".to_string(),
            coordinates: [0.0, 0.0],
            priority,
            last_updated: "now".to_string(),
        }
    }

    #[test]
    fn test_counts_and_totals() {
        let records = vec![
            record(Priority::High, 40, 100),  // short
            record(Priority::High, 50, 100),  // exactly half, not short
            record(Priority::Low, 10, 100),   // short but not high priority
            record(Priority::High, 0, 0),     // nothing required
        ];
        let s = LedgerSummary::compute(&records);
        assert_eq!(s.record_count, 4);
        assert_eq!(s.total_allocated, 100);
        assert_eq!(s.total_required, 300);
        assert_eq!(s.allocation_percentage, Some(33));
        assert_eq!(s.urgency, Some(AllocationUrgency::Critical));
        assert_eq!(s.high_priority_count, 3);
        assert_eq!(s.critical_shortage_count, 1);
    }

    #[test]
    fn test_empty_ledger() {
        let s = LedgerSummary::compute(&[]);
        assert_eq!(s.record_count, 0);
        assert_eq!(s.allocation_percentage, None);
        assert_eq!(s.urgency, None);
        assert_eq!(s.critical_shortage_count, 0);
    }
}
