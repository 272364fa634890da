use axum::Json;
use serde_json::{json, Value};

use crate::queue::{INGESTION_QUEUE, OUTREACH_QUEUE};

/// GET /health
/// Liveness plus the names of the queues the workers consume.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobboard-api",
        "queues": [INGESTION_QUEUE, OUTREACH_QUEUE]
    }))
}
