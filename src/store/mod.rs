//! Cycle persistence.
//!
//! Records live in a per-user collection. The reconciliation code only ever
//! talks to [`CycleStore`], so the in-memory store and PostgreSQL store are
//! interchangeable.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CycleDraft, CycleRecord};

mod memory;
mod postgres;

pub use memory::MemoryCycleStore;
#[cfg(any(test, feature = "test-util"))]
pub use memory::Operation;
pub use postgres::PgCycleStore;

pub type SharedStore = Arc<dyn CycleStore>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Cycle {0} not found")]
    NotFound(Uuid),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

#[async_trait]
pub trait CycleStore: Send + Sync {
    /// Every record for the user, in a stable insertion order.
    async fn list_cycles(&self, user_id: &str) -> Result<Vec<CycleRecord>, StoreError>;

    /// Creates a record and returns its new id.
    async fn insert_cycle(&self, user_id: &str, record: &CycleDraft) -> Result<Uuid, StoreError>;

    /// Replaces every field of an existing record.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record with `id` exists for the user.
    async fn overwrite_cycle(
        &self,
        user_id: &str,
        id: Uuid,
        record: &CycleDraft,
    ) -> Result<(), StoreError>;

    /// Permanently removes a record.
    ///
    /// # Errors
    ///
    /// `NotFound` if it was already gone.
    async fn delete_cycle(&self, user_id: &str, id: Uuid) -> Result<(), StoreError>;
}
