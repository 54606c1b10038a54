//! Profile route handlers.
//!
//! Profile responses never expose the OIDC subject or issuer; those stay
//! between the platform and the identity provider.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use waypost_authority::Visibility;
use waypost_core::UserId;
use waypost_platform_access::User;

use crate::auth::{AppState, RequireAuth};
use crate::error::ApiError;
use crate::routes::parse_id;
use crate::services::{UserService, user::ProfilePatch};

/// Wire form of a user profile.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: UserId,
    pub display_name: Option<String>,
    pub profile_visibility: Visibility,
    pub is_active: bool,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            display_name: user.display_name().map(str::to_string),
            profile_visibility: user.profile_visibility(),
            is_active: user.is_active(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    pub display_name: Option<Option<String>>,
    pub profile_visibility: Option<Visibility>,
}

/// GET /api/users/{id}
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let id = parse_id::<UserId>(&id, "user")?;
    let user = UserService::new(state.db_pool.clone())
        .get_profile(&auth.actor(), id)
        .await?;
    Ok(Json(user.into()))
}

/// PATCH /api/users/me
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let patch = ProfilePatch {
        display_name: body.display_name,
        profile_visibility: body.profile_visibility,
    };
    let user = UserService::new(state.db_pool.clone())
        .update_me(auth.user(), patch)
        .await?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/me
///
/// Soft-deactivates the account. The row survives; all sessions end.
pub async fn deactivate_me(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
) -> Result<StatusCode, ApiError> {
    UserService::new(state.db_pool.clone())
        .deactivate_me(auth.user())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
