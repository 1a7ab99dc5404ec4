//! Tallies over classified social posts.

use std::collections::BTreeMap;

use serde::Serialize;

use sr_core::types::{NeedType, SocialSignal, Urgency};

pub fn count_by_need(signals: &[SocialSignal]) -> BTreeMap<NeedType, usize> {
    let mut counts = BTreeMap::new();
    for s in signals {
        *counts.entry(s.need_type).or_insert(0) += 1;
    }
    counts
}

pub fn count_by_urgency(signals: &[SocialSignal]) -> BTreeMap<Urgency, usize> {
    let mut counts = BTreeMap::new();
    for s in signals {
        *counts.entry(s.urgency).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSummary {
    pub total: usize,
    pub verified: usize,
    pub by_need: BTreeMap<NeedType, usize>,
    pub by_urgency: BTreeMap<Urgency, usize>,
}

impl SignalSummary {
    pub fn compute(signals: &[SocialSignal]) -> Self {
        Self {
            total: signals.len(),
            verified: signals.iter().filter(|s| s.verified).count(),
            by_need: count_by_need(signals),
            by_urgency: count_by_urgency(signals),
        }
    }
}
