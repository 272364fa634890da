//! Axum route handlers for the ingestion and queue admin API.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::connectors::ConnectorType;
use crate::errors::AppError;
use crate::ingestion::IngestionTask;
use crate::queue::QueueStats;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct QueueStatsResponse {
    pub ingestion: QueueStats,
    pub outreach: QueueStats,
}

/// POST /api/v1/ingest
///
/// Validates and enqueues an ingestion task. The worker picks it up async.
pub async fn handle_enqueue_ingestion(
    State(state): State<AppState>,
    Json(task): Json<IngestionTask>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_task(&task)?;

    state.ingestion_queue.push(&task).await?;
    tracing::info!(
        "Queued {} ingestion for company {}",
        task.connector_type,
        task.company_id
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "queued": true, "queue": state.ingestion_queue.name() })),
    ))
}

/// GET /api/v1/admin/queues
pub async fn handle_queue_stats(
    State(state): State<AppState>,
) -> Result<Json<QueueStatsResponse>, AppError> {
    Ok(Json(QueueStatsResponse {
        ingestion: state.ingestion_queue.stats().await?,
        outreach: state.outreach_queue.stats().await?,
    }))
}

fn validate_task(task: &IngestionTask) -> Result<(), AppError> {
    task.connector_type
        .parse::<ConnectorType>()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if task.company_id.trim().is_empty() {
        return Err(AppError::Validation("company_id cannot be empty".to_string()));
    }
    if task.api_key.trim().is_empty() {
        return Err(AppError::Validation("api_key cannot be empty".to_string()));
    }
    Ok(())
}
