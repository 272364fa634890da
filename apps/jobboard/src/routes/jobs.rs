use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::job::Job;
use crate::state::AppState;

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, AppError> {
    state
        .store
        .get_job(&job_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}
