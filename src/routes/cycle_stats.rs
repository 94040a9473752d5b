use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};

use super::{require_user, UserQuery};
use crate::error::AppError;
use crate::models::CycleStatsResponse;
use crate::stats::cycle_stats;
use crate::store::SharedStore;

pub async fn get_cycle_stats(
    State(store): State<SharedStore>,
    Query(query): Query<UserQuery>,
) -> Result<Json<CycleStatsResponse>, AppError> {
    let user_id = require_user(&query.user_id)?;
    let cycles = store.list_cycles(user_id).await?;

    Ok(Json(cycle_stats(&cycles)))
}

pub fn routes(store: SharedStore) -> Router {
    Router::new()
        .route("/cycle-stats", get(get_cycle_stats))
        .with_state(store)
}
