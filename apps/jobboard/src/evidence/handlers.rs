//! Axum route handlers for match evidence.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evidence::generator::{summarize_evidence, EvidenceSummary, MatchSignals};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvidenceRequest {
    pub user_id: Uuid,
    pub signals: MatchSignals,
}

/// POST /api/v1/jobs/:id/evidence
///
/// Builds evidence chips for one job and user from precomputed match signals.
pub async fn handle_job_evidence(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(request): Json<EvidenceRequest>,
) -> Result<Json<EvidenceSummary>, AppError> {
    let job = state
        .store
        .get_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let profile = state
        .store
        .get_user_profile(request.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Profile for user {} not found", request.user_id))
        })?;

    Ok(Json(summarize_evidence(&job, &profile, &request.signals)))
}
