use std::collections::BTreeMap;

use crate::model::{GroupReport, ReconSummary};

/// Compute run-level statistics from all group reports.
pub fn compute_summary(groups: &[GroupReport], priority_items: usize) -> ReconSummary {
    let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut summary = ReconSummary {
        priority_items,
        ..ReconSummary::default()
    };

    for slot in groups.iter().flat_map(|g| g.slots.iter()) {
        summary.total_slots += 1;
        if slot.summary.any_mismatch {
            summary.mismatched_slots += 1;
        }
        summary.missing += slot.summary.missing.len();
        summary.extras += slot.summary.extras.len();
        summary.date_mismatches += slot.summary.date_mismatches.len();
        if slot.summary.likely_pair.is_some() {
            summary.likely_pairs += 1;
        }

        for row in &slot.rows {
            *status_counts.entry(row.status.to_string()).or_insert(0) += 1;
            if let Some(found_status) = row.found_status {
                *status_counts.entry(found_status.to_string()).or_insert(0) += 1;
            }
        }
    }

    summary.status_counts = status_counts;
    summary
}
