//! Incident handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::classify::{Category, ClassifyJob};
use crate::middleware::auth::UserContext;
use crate::models::{CreateIncident, Incident, IncidentFilter, UpdateIncident};
use crate::{AppError, AppResult, AppState};

/// Create an incident and schedule its classification
pub async fn create(
    State(state): State<AppState>,
    user: UserContext,
    Json(req): Json<CreateIncident>,
) -> AppResult<Json<Incident>> {
    req.validate()?;

    let incident = Incident::create(&state.pool, req).await?;
    tracing::info!("Incident {} created by {}", incident.id, user.email);

    // The row is committed before the job is queued, so the worker's
    // write-back always finds it.
    state.classify_queue.submit(ClassifyJob {
        incident_id: incident.id,
        description: incident.description.clone(),
    });

    Ok(Json(incident))
}

/// List incidents, optionally filtered by status or category
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<IncidentFilter>,
) -> AppResult<Json<Vec<Incident>>> {
    let incidents = Incident::list(&state.pool, filter).await?;
    Ok(Json(incidents))
}

/// Get single incident
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Incident>> {
    let incident = Incident::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Incident not found".to_string()))?;

    Ok(Json(incident))
}

/// Update incident fields; absent fields stay as they are
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateIncident>,
) -> AppResult<Json<Incident>> {
    // A manually assigned category has to come from the fixed label set.
    if let Some(category) = &req.category {
        if Category::parse(category).is_none() {
            return Err(AppError::ValidationError(format!(
                "Unknown category '{}'",
                category
            )));
        }
    }

    let incident = Incident::update(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::NotFound("Incident not found".to_string()))?;

    Ok(Json(incident))
}

/// Delete incident
pub async fn delete(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = Incident::delete(&state.pool, id).await?;

    if !deleted {
        return Err(AppError::NotFound("Incident not found".to_string()));
    }

    tracing::info!("Incident {} deleted by user {}", id, user.user_id);
    Ok(Json(json!({ "deleted": true })))
}

/// Re-queue classification for an existing incident
pub async fn classify(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let incident = Incident::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Incident not found".to_string()))?;

    state.classify_queue.submit(ClassifyJob {
        incident_id: incident.id,
        description: incident.description,
    });

    Ok(Json(json!({ "scheduled": true })))
}
