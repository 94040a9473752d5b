use std::{env, fmt::Display, str::FromStr};

use anyhow::{anyhow, Result};
use tracing::info;

pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: try_load("PORT", "3050")?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            max_connections: try_load("DATABASE_MAX_CONNECTIONS", "5")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow!("Invalid {key} value {raw:?}: {e}"))
}
