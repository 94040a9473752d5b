use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::{require_user, UserQuery};
use crate::dedup::{dedup_cycles, find_duplicate_cycles, DedupPolicy};
use crate::error::AppError;
use crate::models::{DuplicateGroup, SweepReport};
use crate::store::SharedStore;

#[derive(Deserialize)]
pub struct SweepQuery {
    pub user_id: String,
    #[serde(default)]
    pub policy: DedupPolicy,
}

pub fn routes(store: SharedStore) -> Router {
    Router::new()
        .route("/cycles/duplicates", get(list_duplicates))
        .route("/cycles/dedup", post(run_sweep))
        .with_state(store)
}

async fn list_duplicates(
    State(store): State<SharedStore>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Vec<DuplicateGroup>>, AppError> {
    let user_id = require_user(&params.user_id)?;
    Ok(Json(find_duplicate_cycles(store.as_ref(), user_id).await?))
}

async fn run_sweep(
    State(store): State<SharedStore>,
    Query(params): Query<SweepQuery>,
) -> Result<Json<SweepReport>, AppError> {
    let user_id = require_user(&params.user_id)?;
    Ok(Json(dedup_cycles(store.as_ref(), user_id, params.policy).await?))
}
