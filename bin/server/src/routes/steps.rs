//! Itinerary step route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use waypost_core::{StepId, TripId};
use waypost_trips::Step;

use crate::auth::{AppState, RequireAuth};
use crate::error::ApiError;
use crate::routes::parse_id;
use crate::services::{StepService, step::StepPatch};

#[derive(Debug, Deserialize)]
pub struct CreateStepBody {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStepBody {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    pub location: Option<Option<String>>,
    /// Replaces the schedule as a whole when present, so the range check
    /// always sees both ends.
    #[serde(default)]
    pub schedule: Option<ScheduleBody>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleBody {
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// GET /api/trips/{id}/steps
pub async fn list_steps(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Vec<Step>>, ApiError> {
    let id = parse_id::<TripId>(&id, "trip")?;
    let steps = StepService::new(state.db_pool.clone())
        .list_steps(&auth.actor(), id)
        .await?;
    Ok(Json(steps))
}

/// POST /api/trips/{id}/steps
pub async fn create_step(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
    Json(body): Json<CreateStepBody>,
) -> Result<(StatusCode, Json<Step>), ApiError> {
    let id = parse_id::<TripId>(&id, "trip")?;
    let patch = StepPatch {
        title: None,
        description: body.description.map(Some),
        location: body.location.map(Some),
        schedule: Some((body.starts_at, body.ends_at)),
    };
    let step = StepService::new(state.db_pool.clone())
        .create_step(&auth.actor(), id, body.title, patch)
        .await?;
    Ok((StatusCode::CREATED, Json(step)))
}

/// PATCH /api/steps/{id}
pub async fn update_step(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
    Json(body): Json<UpdateStepBody>,
) -> Result<Json<Step>, ApiError> {
    let id = parse_id::<StepId>(&id, "step")?;
    let patch = StepPatch {
        title: body.title,
        description: body.description,
        location: body.location,
        schedule: body.schedule.map(|s| (s.starts_at, s.ends_at)),
    };
    let step = StepService::new(state.db_pool.clone())
        .update_step(&auth.actor(), id, patch)
        .await?;
    Ok(Json(step))
}

/// DELETE /api/steps/{id}
pub async fn delete_step(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id::<StepId>(&id, "step")?;
    StepService::new(state.db_pool.clone())
        .delete_step(&auth.actor(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
