//! JSON route handlers for the API surface.

pub mod comments;
pub mod friends;
pub mod steps;
pub mod trips;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::str::FromStr;
use std::sync::Arc;

use crate::auth::AppState;
use crate::error::ApiError;

/// Deserializer for patch fields where "absent" and "null" differ: an
/// absent field stays `None` via `#[serde(default)]`, an explicit `null`
/// becomes `Some(None)` and clears the value.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Parses a typed ID from a path segment.
///
/// A malformed ID cannot reference anything, so it reads as not-found
/// rather than leaking whether the format was the problem.
pub(crate) fn parse_id<T: FromStr>(raw: &str, resource: &'static str) -> Result<T, ApiError> {
    T::from_str(raw).map_err(|_| ApiError::NotFound { resource })
}

/// Builds the `/api` router.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Users
        .route("/users/{id}", get(users::get_profile))
        .route("/users/me", axum::routing::patch(users::update_me))
        .route("/users/me", delete(users::deactivate_me))
        // Friends
        .route("/friends", get(friends::list_friends))
        .route("/friends/requests", get(friends::list_requests))
        .route("/friends/requests", post(friends::send_request))
        .route("/friends/requests/{id}/accept", post(friends::accept_request))
        .route("/friends/requests/{id}", delete(friends::reject_request))
        .route("/friends/{user_id}", delete(friends::remove_friend))
        .route("/friends/{user_id}/block", post(friends::block_user))
        .route("/friends/{user_id}/block", delete(friends::unblock_user))
        // Trips
        .route("/trips", post(trips::create_trip))
        .route("/trips/{id}", get(trips::get_trip))
        .route("/trips/{id}", axum::routing::patch(trips::update_trip))
        .route("/trips/{id}", delete(trips::delete_trip))
        .route("/trips/{id}/members", get(trips::list_members))
        .route("/trips/{id}/members", post(trips::add_member))
        .route(
            "/trips/{id}/members/{user_id}",
            axum::routing::patch(trips::change_member_role),
        )
        .route("/trips/{id}/members/{user_id}", delete(trips::remove_member))
        // Steps
        .route("/trips/{id}/steps", get(steps::list_steps))
        .route("/trips/{id}/steps", post(steps::create_step))
        .route("/steps/{id}", axum::routing::patch(steps::update_step))
        .route("/steps/{id}", delete(steps::delete_step))
        // Comments
        .route("/steps/{id}/comments", get(comments::list_comments))
        .route("/steps/{id}/comments", post(comments::create_comment))
        .route("/comments/{id}", delete(comments::delete_comment))
}
