use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{fmt, EnvFilter};

use cycle_reconcile::{
    app,
    config::Config,
    store::{MemoryCycleStore, PgCycleStore, SharedStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;

    let store: SharedStore = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            Arc::new(PgCycleStore::new(pool))
        }
        None => {
            tracing::warn!("⚠️ DATABASE_URL not set, cycles are kept in memory only");
            Arc::new(MemoryCycleStore::new())
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🧠 Server running at {}", addr);

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app(store).into_make_service(),
    )
    .await?;

    Ok(())
}
