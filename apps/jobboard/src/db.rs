use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the pool behind `PgJobStore`.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!(max_connections, "Connecting to the job store database");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .context("Failed to connect to the job store database")?;

    info!("Job store pool ready ({max_connections} connections max)");
    Ok(pool)
}
