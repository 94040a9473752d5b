use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CycleStore, StoreError};
use crate::models::{CycleDraft, CycleRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Insert,
    Overwrite,
    Delete,
}

#[derive(Default)]
struct Inner {
    cycles: HashMap<String, Vec<CycleRecord>>,
    // Remaining successful calls before the operation starts failing.
    failures: HashMap<Operation, usize>,
}

impl Inner {
    fn check(&mut self, op: Operation) -> Result<(), StoreError> {
        match self.failures.get_mut(&op) {
            Some(0) => Err(StoreError::Unavailable(format!("injected {op:?} failure"))),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// Process-local store. Used when no database is configured and as the fake
/// in tests. Fault injection and seeding are only compiled for tests and the
/// `test-util` feature.
#[derive(Default)]
pub struct MemoryCycleStore {
    inner: Mutex<Inner>,
}

impl MemoryCycleStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(any(test, feature = "test-util"))]
    /// Lets `successes` calls of `op` through, then fails every later one
    /// with `Unavailable`.
    pub async fn fail_after(&self, op: Operation, successes: usize) {
        self.inner.lock().await.failures.insert(op, successes);
    }

    #[cfg(any(test, feature = "test-util"))]
    pub async fn clear_failures(&self) {
        self.inner.lock().await.failures.clear();
    }

    #[cfg(any(test, feature = "test-util"))]
    /// Stores a fully formed record as-is, bypassing id assignment.
    pub async fn seed(&self, user_id: &str, record: CycleRecord) {
        self.inner
            .lock()
            .await
            .cycles
            .entry(user_id.to_string())
            .or_default()
            .push(record);
    }
}

#[async_trait]
impl CycleStore for MemoryCycleStore {
    async fn list_cycles(&self, user_id: &str) -> Result<Vec<CycleRecord>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::List)?;
        Ok(inner.cycles.get(user_id).cloned().unwrap_or_default())
    }

    async fn insert_cycle(&self, user_id: &str, record: &CycleDraft) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::Insert)?;

        let id = Uuid::new_v4();
        inner
            .cycles
            .entry(user_id.to_string())
            .or_default()
            .push(CycleRecord::from_draft(id, record.clone()));
        Ok(id)
    }

    async fn overwrite_cycle(
        &self,
        user_id: &str,
        id: Uuid,
        record: &CycleDraft,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::Overwrite)?;

        let slot = inner
            .cycles
            .get_mut(user_id)
            .and_then(|cycles| cycles.iter_mut().find(|c| c.id == id))
            .ok_or(StoreError::NotFound(id))?;
        *slot = CycleRecord::from_draft(id, record.clone());
        Ok(())
    }

    async fn delete_cycle(&self, user_id: &str, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::Delete)?;

        let cycles = inner
            .cycles
            .get_mut(user_id)
            .ok_or(StoreError::NotFound(id))?;
        let before = cycles.len();
        cycles.retain(|c| c.id != id);

        if cycles.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateValue;

    fn draft(start: &str) -> CycleDraft {
        CycleDraft {
            start_date: Some(DateValue::Iso(start.into())),
            end_date: Some(DateValue::Iso(start.into())),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn users_do_not_see_each_other() {
        let store = MemoryCycleStore::new();
        store.insert_cycle("ana", &draft("2025-01-01")).await.unwrap();
        store.insert_cycle("bea", &draft("2025-02-01")).await.unwrap();

        assert_eq!(store.list_cycles("ana").await.unwrap().len(), 1);
        assert_eq!(store.list_cycles("bea").await.unwrap().len(), 1);
        assert!(store.list_cycles("cat").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_keeps_insertion_order() {
        let store = MemoryCycleStore::new();
        let a = store.insert_cycle("ana", &draft("2025-03-01")).await.unwrap();
        let b = store.insert_cycle("ana", &draft("2025-01-01")).await.unwrap();

        let ids: Vec<_> = store.list_cycles("ana").await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn overwrite_keeps_id_and_position() {
        let store = MemoryCycleStore::new();
        let a = store.insert_cycle("ana", &draft("2025-01-01")).await.unwrap();
        store.insert_cycle("ana", &draft("2025-02-01")).await.unwrap();

        store.overwrite_cycle("ana", a, &draft("2025-01-03")).await.unwrap();

        let cycles = store.list_cycles("ana").await.unwrap();
        assert_eq!(cycles[0].id, a);
        assert_eq!(cycles[0].start_date, Some(DateValue::Iso("2025-01-03".into())));
    }

    #[tokio::test]
    async fn missing_records_report_not_found() {
        let store = MemoryCycleStore::new();
        let id = store.insert_cycle("ana", &draft("2025-01-01")).await.unwrap();
        store.delete_cycle("ana", id).await.unwrap();

        assert!(matches!(store.delete_cycle("ana", id).await, Err(StoreError::NotFound(x)) if x == id));
        assert!(matches!(
            store.overwrite_cycle("ana", id, &draft("2025-01-01")).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn injected_failures_kick_in_after_budget() {
        let store = MemoryCycleStore::new();
        store.fail_after(Operation::Insert, 1).await;

        assert!(store.insert_cycle("ana", &draft("2025-01-01")).await.is_ok());
        assert!(matches!(
            store.insert_cycle("ana", &draft("2025-02-01")).await,
            Err(StoreError::Unavailable(_))
        ));

        store.clear_failures().await;
        assert!(store.insert_cycle("ana", &draft("2025-02-01")).await.is_ok());
    }
}
