//! Duplicate cycle cleanup.
//!
//! Records are grouped by their canonical date range. Any group with more than
//! one record keeps exactly one and the rest are deleted. Records whose dates
//! can't be normalized never join a group and are never deleted.
//!
//! Groups are handled one at a time and deletes are issued one at a time, so a
//! failure part-way leaves earlier groups clean and later ones untouched.
//! Nothing is rolled back; running the sweep again finishes the job.

use std::collections::BTreeMap;

use serde::Deserialize;
use uuid::Uuid;

use crate::key::{derive_key, RangeKey};
use crate::models::{CycleRecord, DuplicateGroup, SweepReport};
use crate::store::{CycleStore, StoreError};

/// Which record of a duplicate group survives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Latest `created_at` wins; a missing timestamp counts as oldest.
    KeepNewest,
    /// The first record, in listing order, that has symptom data wins.
    /// Without any, the first record in the group wins. Recency is not
    /// consulted.
    #[default]
    PreferSymptoms,
}

impl DedupPolicy {
    /// Index into `group` of the record to keep.
    fn keeper(self, group: &[CycleRecord]) -> usize {
        match self {
            DedupPolicy::KeepNewest => {
                let mut order: Vec<usize> = (0..group.len()).collect();
                order.sort_by(|&a, &b| {
                    let a = group[a].created_at.unwrap_or_default();
                    let b = group[b].created_at.unwrap_or_default();
                    b.cmp(&a)
                });
                order[0]
            }
            DedupPolicy::PreferSymptoms => group
                .iter()
                .position(CycleRecord::has_symptoms)
                .unwrap_or(0),
        }
    }
}

struct Partition {
    groups: BTreeMap<RangeKey, Vec<CycleRecord>>,
    malformed: usize,
}

fn partition(records: Vec<CycleRecord>) -> Partition {
    let mut groups = BTreeMap::<RangeKey, Vec<CycleRecord>>::new();
    let mut malformed = 0;

    for record in records {
        match derive_key(&record) {
            Some(key) => groups.entry(key).or_default().push(record),
            None => {
                tracing::warn!("⚠️ Cycle {} has unreadable dates, leaving it alone", record.id);
                malformed += 1;
            }
        }
    }

    Partition { groups, malformed }
}

/// Groups of two or more records sharing a date range, earliest range first.
/// Reads only.
pub async fn find_duplicate_cycles<S: CycleStore + ?Sized>(
    store: &S,
    user_id: &str,
) -> Result<Vec<DuplicateGroup>, StoreError> {
    let records = store.list_cycles(user_id).await?;

    Ok(partition(records)
        .groups
        .into_iter()
        .filter(|(_, records)| records.len() > 1)
        .map(|(key, records)| DuplicateGroup {
            key: key.to_string(),
            records,
        })
        .collect())
}

/// Deletes all but one record of every duplicate group for `user_id`.
///
/// A record that is already gone when its delete is issued is not an error
/// and is not counted in `removed_count`.
pub async fn dedup_cycles<S: CycleStore + ?Sized>(
    store: &S,
    user_id: &str,
    policy: DedupPolicy,
) -> Result<SweepReport, StoreError> {
    let records = store.list_cycles(user_id).await?;
    let Partition { groups, malformed } = partition(records);

    let mut report = SweepReport {
        skipped_malformed: malformed,
        ..Default::default()
    };

    for (key, group) in groups.iter().filter(|(_, g)| g.len() > 1) {
        report.duplicate_group_count += 1;

        let keep = policy.keeper(group);
        tracing::debug!("🧹 {} duplicates for {}, keeping {}", group.len(), key, group[keep].id);

        let doomed: Vec<Uuid> = group
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != keep)
            .map(|(_, c)| c.id)
            .collect();

        for id in doomed {
            match store.delete_cycle(user_id, id).await {
                Ok(()) => report.removed_count += 1,
                Err(StoreError::NotFound(_)) => {
                    tracing::warn!("⚠️ Cycle {} was already deleted", id);
                }
                Err(e) => {
                    tracing::error!("❌ Sweep for {} stopped at {}: {}", user_id, key, e);
                    return Err(e);
                }
            }
        }
    }

    tracing::info!(
        "✅ Sweep for {} ({:?}): removed {} across {} groups",
        user_id,
        policy,
        report.removed_count,
        report.duplicate_group_count
    );

    Ok(report)
}
