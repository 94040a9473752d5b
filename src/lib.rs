//! Cycle record reconciliation for the cycle-tracking app.
//!
//! Saves go through [`upsert::upsert_cycle`], which overwrites the record for
//! the same month or date range instead of adding another. Duplicates that
//! slip through anyway (concurrent saves, older clients) are cleaned up on
//! demand by [`dedup::dedup_cycles`].

use axum::{routing::get, Router};

pub mod config;
pub mod dedup;
pub mod error;
pub mod key;
pub mod models;
pub mod routes;
pub mod stats;
pub mod store;
pub mod upsert;

use store::SharedStore;

pub fn app(store: SharedStore) -> Router {
    Router::new()
        .merge(routes::cycle::routes(store.clone()))
        .merge(routes::dedup::routes(store.clone()))
        .merge(routes::cycle_stats::routes(store))
        .route("/health", get(|| async { "✅ Backend up" }))
}
