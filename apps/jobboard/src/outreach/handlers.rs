//! Axum route handlers for the outreach composer.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::outreach::OutreachChannel;
use crate::outreach::templates::{
    find_template, render_message, RenderedMessage, TemplateContext, TEMPLATES,
};
use crate::outreach::OutreachTask;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub channel: OutreachChannel,
    pub template_id: String,
    pub context: TemplateContext,
}

#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub channel: OutreachChannel,
    pub has_subject: bool,
}

/// GET /api/v1/outreach/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateSummary>> {
    let templates = TEMPLATES
        .iter()
        .map(|t| TemplateSummary {
            id: t.id,
            name: t.name,
            channel: t.channel,
            has_subject: t.subject.is_some(),
        })
        .collect();
    Json(templates)
}

/// POST /api/v1/outreach
///
/// Enqueues a composed message for delivery.
pub async fn handle_enqueue_outreach(
    State(state): State<AppState>,
    Json(task): Json<OutreachTask>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if task.recipient.trim().is_empty() {
        return Err(AppError::Validation("recipient cannot be empty".to_string()));
    }
    if task.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    state.outreach_queue.push(&task).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "queued": true, "queue": state.outreach_queue.name() })),
    ))
}

/// POST /api/v1/outreach/preview
///
/// Renders a built-in template for a candidate and job.
pub async fn handle_preview_template(
    Json(request): Json<PreviewRequest>,
) -> Result<Json<RenderedMessage>, AppError> {
    let template = find_template(request.channel, &request.template_id).ok_or_else(|| {
        AppError::NotFound(format!(
            "No {} template '{}'",
            request.channel.as_str(),
            request.template_id
        ))
    })?;

    Ok(Json(render_message(template, &request.context)))
}
