//! Natural-key deduplication: collapse every group of records sharing an
//! `id` down to a single survivor.

use crate::store::Store;
use anyhow::Result;
use serde::Serialize;

/// Both numbers are reported because they diverge: a triple-ingested id is
/// one group but two removals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DedupeReport {
    pub duplicate_groups: usize,
    pub removed: u64,
}

/// Group by `id`, count occurrences, and delete one record per excess
/// occurrence. Any multiplicity >= 2 is collapsed to one survivor (the
/// most recently ingested copy). Idempotent: a second pass finds zero
/// groups and removes nothing.
pub fn dedupe(store: &dyn Store) -> Result<DedupeReport> {
    let mut counts: ahash::AHashMap<String, u64> = ahash::AHashMap::with_capacity(1024);
    for rec in store.snapshot()? {
        *counts.entry(rec.id).or_insert(0) += 1;
    }

    // Materialize the offending ids into a side set before mutating, so the
    // deletion loop never observes its own effects.
    let mut offenders: Vec<(String, u64)> = counts
        .into_iter()
        .filter(|(_, c)| *c >= 2)
        .collect();
    offenders.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut removed: u64 = 0;
    for (id, occurrences) in &offenders {
        for _ in 1..*occurrences {
            removed += store.delete_one(id)? as u64;
        }
    }

    let report = DedupeReport { duplicate_groups: offenders.len(), removed };
    tracing::info!(
        groups = report.duplicate_groups,
        removed = report.removed,
        "dedupe complete"
    );
    Ok(report)
}
