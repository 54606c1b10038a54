//! Trip and membership route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use waypost_authority::{TripMembership, TripRole, Visibility};
use waypost_core::{TripId, UserId};
use waypost_trips::Trip;

use crate::auth::{AppState, RequireAuth};
use crate::error::ApiError;
use crate::routes::parse_id;
use crate::services::{TripService, trip::TripPatch};

#[derive(Debug, Deserialize)]
pub struct CreateTripBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_visibility")]
    pub visibility: Visibility,
}

fn default_visibility() -> Visibility {
    Visibility::Private
}

#[derive(Debug, Deserialize)]
pub struct UpdateTripBody {
    pub name: Option<String>,
    /// Double-optional: absent leaves the description alone, `null` clears it.
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    pub description: Option<Option<String>>,
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberBody {
    pub user_id: UserId,
    #[serde(default = "default_member_role")]
    pub role: TripRole,
}

fn default_member_role() -> TripRole {
    TripRole::Member
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleBody {
    pub role: TripRole,
}

/// POST /api/trips
pub async fn create_trip(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Json(body): Json<CreateTripBody>,
) -> Result<(StatusCode, Json<Trip>), ApiError> {
    let trip = TripService::new(state.db_pool.clone())
        .create_trip(&auth.actor(), body.name, body.description, body.visibility)
        .await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

/// GET /api/trips/{id}
pub async fn get_trip(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Trip>, ApiError> {
    let id = parse_id::<TripId>(&id, "trip")?;
    let trip = TripService::new(state.db_pool.clone())
        .get_trip(&auth.actor(), id)
        .await?;
    Ok(Json(trip))
}

/// PATCH /api/trips/{id}
pub async fn update_trip(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
    Json(body): Json<UpdateTripBody>,
) -> Result<Json<Trip>, ApiError> {
    let id = parse_id::<TripId>(&id, "trip")?;
    let patch = TripPatch {
        name: body.name,
        description: body.description,
        visibility: body.visibility,
    };
    let trip = TripService::new(state.db_pool.clone())
        .update_trip(&auth.actor(), id, patch)
        .await?;
    Ok(Json(trip))
}

/// DELETE /api/trips/{id}
pub async fn delete_trip(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id::<TripId>(&id, "trip")?;
    TripService::new(state.db_pool.clone())
        .delete_trip(&auth.actor(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/trips/{id}/members
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Vec<TripMembership>>, ApiError> {
    let id = parse_id::<TripId>(&id, "trip")?;
    let members = TripService::new(state.db_pool.clone())
        .list_members(&auth.actor(), id)
        .await?;
    Ok(Json(members))
}

/// POST /api/trips/{id}/members
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
    Json(body): Json<AddMemberBody>,
) -> Result<(StatusCode, Json<TripMembership>), ApiError> {
    let id = parse_id::<TripId>(&id, "trip")?;
    let member = TripService::new(state.db_pool.clone())
        .add_member(&auth.actor(), id, body.user_id, body.role)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// PATCH /api/trips/{id}/members/{user_id}
pub async fn change_member_role(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path((id, user_id)): Path<(String, String)>,
    Json(body): Json<ChangeRoleBody>,
) -> Result<Json<TripMembership>, ApiError> {
    let id = parse_id::<TripId>(&id, "trip")?;
    let user_id = parse_id::<UserId>(&user_id, "member")?;
    let member = TripService::new(state.db_pool.clone())
        .change_member_role(&auth.actor(), id, user_id, body.role)
        .await?;
    Ok(Json(member))
}

/// DELETE /api/trips/{id}/members/{user_id}
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id::<TripId>(&id, "trip")?;
    let user_id = parse_id::<UserId>(&user_id, "member")?;
    TripService::new(state.db_pool.clone())
        .remove_member(&auth.actor(), id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
