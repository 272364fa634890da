use std::sync::Arc;

use crate::queue::RedisQueue;
use crate::storage::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Storage port. Postgres in production, in-memory in tests.
    pub store: Arc<dyn JobStore>,
    pub ingestion_queue: RedisQueue,
    pub outreach_queue: RedisQueue,
}
