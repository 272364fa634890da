mod config;
mod connectors;
mod db;
mod errors;
mod evidence;
mod ingestion;
mod models;
mod outreach;
mod queue;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::connectors::ConnectorSettings;
use crate::db::create_pool;
use crate::ingestion::{process_ingestion_task, IngestionTask};
use crate::outreach::{OutreachDispatcher, OutreachTask};
use crate::queue::{run_worker, RedisQueue, INGESTION_QUEUE, OUTREACH_QUEUE};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{JobStore, PgJobStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job board API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;
    let store: Arc<dyn JobStore> = Arc::new(PgJobStore::new(db));

    // Initialize Redis queues
    let redis = redis::Client::open(config.redis_url.clone())?;
    let ingestion_queue = RedisQueue::new(redis.clone(), INGESTION_QUEUE)
        .with_redacted_fields(IngestionTask::SECRET_FIELDS);
    let outreach_queue = RedisQueue::new(redis, OUTREACH_QUEUE);
    info!("Redis queues initialized");

    spawn_workers(&config, store.clone(), &ingestion_queue, &outreach_queue);

    let state = AppState {
        store,
        ingestion_queue,
        outreach_queue,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Starts one background worker per queue.
fn spawn_workers(
    config: &Config,
    store: Arc<dyn JobStore>,
    ingestion_queue: &RedisQueue,
    outreach_queue: &RedisQueue,
) {
    let poll_timeout = Duration::from_secs(config.worker_poll_timeout_secs);
    let settings = ConnectorSettings {
        greenhouse_base_url: config.greenhouse_base_url.clone(),
    };

    let ingest_store = store.clone();
    tokio::spawn(run_worker(
        ingestion_queue.clone(),
        poll_timeout,
        move |task: IngestionTask| {
            let settings = settings.clone();
            let store = ingest_store.clone();
            async move {
                process_ingestion_task(task, &settings, store.as_ref()).await?;
                Ok::<_, anyhow::Error>(())
            }
        },
    ));

    let dispatcher = OutreachDispatcher::logging();
    tokio::spawn(run_worker(
        outreach_queue.clone(),
        poll_timeout,
        move |task: OutreachTask| {
            let dispatcher = dispatcher.clone();
            let store = store.clone();
            async move {
                dispatcher.dispatch(&task, store.as_ref()).await?;
                Ok::<_, anyhow::Error>(())
            }
        },
    ));
}
