//! Merge-on-write for cycle saves.
//!
//! A save first looks for the cycle it refers to: by month key when one is
//! given, otherwise by date range. A match is overwritten in place; no match
//! becomes a new record.
//!
//! The lookup and the write are two separate store calls with nothing held in
//! between. Two saves of the same cycle racing each other (two open tabs, say)
//! can both miss and both insert. That is accepted: the dedup sweep removes
//! the extra record later.

use chrono::Utc;

use crate::key::derive_key;
use crate::models::{CycleDraft, CycleRecord, UpsertOutcome};
use crate::store::{CycleStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchedBy {
    MonthKey,
    DateRange,
}

fn find_match<'a>(existing: &'a [CycleRecord], incoming: &CycleDraft) -> Option<(&'a CycleRecord, MatchedBy)> {
    if let Some(month_key) = incoming.month_key.as_deref() {
        if let Some(found) = existing.iter().find(|c| c.month_key.as_deref() == Some(month_key)) {
            return Some((found, MatchedBy::MonthKey));
        }
    }

    let key = derive_key(incoming)?;
    existing
        .iter()
        .find(|c| derive_key(*c) == Some(key))
        .map(|found| (found, MatchedBy::DateRange))
}

/// Saves `incoming` for `user_id`, updating the matching record if there is
/// one. The returned id is the existing record's on update.
pub async fn upsert_cycle<S: CycleStore + ?Sized>(
    store: &S,
    user_id: &str,
    incoming: CycleDraft,
) -> Result<UpsertOutcome, StoreError> {
    let existing = store.list_cycles(user_id).await?;
    let now = Utc::now();

    if let Some((matched, by)) = find_match(&existing, &incoming) {
        let record = CycleDraft {
            created_at: matched.created_at.or(incoming.created_at),
            updated_at: Some(now),
            ..incoming
        };
        store.overwrite_cycle(user_id, matched.id, &record).await?;

        tracing::info!("✏️ Updated cycle {} for {} (matched by {:?})", matched.id, user_id, by);
        return Ok(UpsertOutcome { id: matched.id, updated: true });
    }

    let record = CycleDraft {
        created_at: Some(now),
        updated_at: None,
        ..incoming
    };
    let id = store.insert_cycle(user_id, &record).await?;

    tracing::info!("🆕 Inserted cycle {} for {}", id, user_id);
    Ok(UpsertOutcome { id, updated: false })
}
