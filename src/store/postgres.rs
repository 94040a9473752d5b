use async_trait::async_trait;
use sqlx::{postgres::PgRow, types::Json, PgPool, Row};
use uuid::Uuid;

use super::{CycleStore, StoreError};
use crate::models::{CycleDraft, CycleRecord, DateValue, Symptoms};

const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Cycles table in PostgreSQL. `seq` keeps listing in insertion order.
#[derive(Clone)]
pub struct PgCycleStore {
    pool: PgPool,
}

impl PgCycleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_db_error(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        tracing::error!("❌ DB call failed: {}", db_err.message());

        if let Some(constraint) = db_err.constraint() {
            tracing::info!("🔒 Constraint violated: {}", constraint);
        }

        if db_err.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) {
            return StoreError::PermissionDenied;
        }
    } else {
        tracing::error!("❌ DB transport error: {}", e);
    }

    StoreError::from(e)
}

fn row_to_record(row: &PgRow) -> Result<CycleRecord, sqlx::Error> {
    let start_date: Option<Json<DateValue>> = row.try_get("start_date")?;
    let end_date: Option<Json<DateValue>> = row.try_get("end_date")?;
    let symptoms: Json<Symptoms> = row.try_get("symptoms")?;

    Ok(CycleRecord {
        id: row.try_get("id")?,
        start_date: start_date.map(|j| j.0),
        end_date: end_date.map(|j| j.0),
        month_key: row.try_get("month_key")?,
        symptoms: symptoms.0,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CycleStore for PgCycleStore {
    async fn list_cycles(&self, user_id: &str) -> Result<Vec<CycleRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, start_date, end_date, month_key, symptoms, created_at, updated_at
             FROM cycles WHERE user_id = $1 ORDER BY seq ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_db_error)
    }

    async fn insert_cycle(&self, user_id: &str, record: &CycleDraft) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO cycles (id, user_id, start_date, end_date, month_key, symptoms, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(id)
        .bind(user_id)
        .bind(record.start_date.clone().map(Json))
        .bind(record.end_date.clone().map(Json))
        .bind(record.month_key.as_deref())
        .bind(Json(&record.symptoms))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(id)
    }

    async fn overwrite_cycle(
        &self,
        user_id: &str,
        id: Uuid,
        record: &CycleDraft,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE cycles
             SET start_date = $3, end_date = $4, month_key = $5, symptoms = $6, created_at = $7, updated_at = $8
             WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id)
        .bind(id)
        .bind(record.start_date.clone().map(Json))
        .bind(record.end_date.clone().map(Json))
        .bind(record.month_key.as_deref())
        .bind(Json(&record.symptoms))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        match result.rows_affected() {
            0 => Err(StoreError::NotFound(id)),
            _ => Ok(()),
        }
    }

    async fn delete_cycle(&self, user_id: &str, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM cycles WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        match result.rows_affected() {
            0 => Err(StoreError::NotFound(id)),
            _ => Ok(()),
        }
    }
}
