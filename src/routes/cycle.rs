use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use super::{require_user, UserQuery};
use crate::error::AppError;
use crate::models::{CycleRecord, CycleSummary, NewCycle, UpsertOutcome};
use crate::stats::cycle_summary;
use crate::store::SharedStore;
use crate::upsert::upsert_cycle;

pub fn routes(store: SharedStore) -> Router {
    Router::new()
        .route("/cycles", get(list_cycles).post(save_cycle))
        .route("/cycle", get(get_cycle_summary))
        .with_state(store)
}

async fn list_cycles(
    State(store): State<SharedStore>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Vec<CycleRecord>>, AppError> {
    let user_id = require_user(&params.user_id)?;
    Ok(Json(store.list_cycles(user_id).await?))
}

async fn save_cycle(
    State(store): State<SharedStore>,
    Json(body): Json<NewCycle>,
) -> Result<(StatusCode, Json<UpsertOutcome>), AppError> {
    let user_id = require_user(&body.user_id)?;
    let outcome = upsert_cycle(store.as_ref(), user_id, body.cycle).await?;

    let status = if outcome.updated { StatusCode::OK } else { StatusCode::CREATED };
    Ok((status, Json(outcome)))
}

async fn get_cycle_summary(
    State(store): State<SharedStore>,
    Query(params): Query<UserQuery>,
) -> Result<Json<CycleSummary>, AppError> {
    let user_id = require_user(&params.user_id)?;
    let cycles = store.list_cycles(user_id).await?;

    let today = Utc::now().date_naive();
    cycle_summary(&cycles, today)
        .map(Json)
        .ok_or(AppError::NotFound)
}
