pub mod health;
pub mod jobs;

use axum::{
    routing::{get, post},
    Router,
};

use crate::evidence::handlers as evidence;
use crate::ingestion::handlers as ingestion;
use crate::outreach::handlers as outreach;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route(
            "/api/v1/jobs/:id/evidence",
            post(evidence::handle_job_evidence),
        )
        // Ingestion
        .route("/api/v1/ingest", post(ingestion::handle_enqueue_ingestion))
        .route("/api/v1/admin/queues", get(ingestion::handle_queue_stats))
        // Outreach
        .route("/api/v1/outreach", post(outreach::handle_enqueue_outreach))
        .route(
            "/api/v1/outreach/templates",
            get(outreach::handle_list_templates),
        )
        .route(
            "/api/v1/outreach/preview",
            post(outreach::handle_preview_template),
        )
        .with_state(state)
}
