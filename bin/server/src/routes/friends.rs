//! Friendship route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use waypost_authority::{Friendship, FriendshipStatus};
use waypost_core::{FriendshipId, UserId};
use waypost_platform_access::User;

use crate::auth::{AppState, RequireAuth};
use crate::error::ApiError;
use crate::routes::parse_id;
use crate::routes::users::ProfileResponse;
use crate::services::FriendshipService;

/// Wire form of a friendship edge.
#[derive(Debug, Serialize)]
pub struct FriendshipResponse {
    pub id: FriendshipId,
    pub requester: UserId,
    pub recipient: UserId,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Friendship> for FriendshipResponse {
    fn from(f: Friendship) -> Self {
        Self {
            id: f.id,
            requester: f.requester,
            recipient: f.recipient,
            status: f.status,
            created_at: f.created_at,
        }
    }
}

/// Wire form of an accepted friendship with both endpoint users resolved.
#[derive(Debug, Serialize)]
pub struct FriendResponse {
    pub id: FriendshipId,
    pub requester: ProfileResponse,
    pub recipient: ProfileResponse,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<(Friendship, User, User)> for FriendResponse {
    fn from((edge, requester, recipient): (Friendship, User, User)) -> Self {
        Self {
            id: edge.id,
            requester: requester.into(),
            recipient: recipient.into(),
            status: edge.status,
            created_at: edge.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendRequestBody {
    pub user_id: UserId,
}

/// GET /api/friends
pub async fn list_friends(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
) -> Result<Json<Vec<FriendResponse>>, ApiError> {
    let friendships = FriendshipService::new(state.db_pool.clone())
        .list_friends(&auth.actor())
        .await?;
    Ok(Json(friendships.into_iter().map(Into::into).collect()))
}

/// GET /api/friends/requests
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
) -> Result<Json<Vec<FriendshipResponse>>, ApiError> {
    let requests = FriendshipService::new(state.db_pool.clone())
        .list_pending_requests(&auth.actor())
        .await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// POST /api/friends/requests
pub async fn send_request(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Json(body): Json<SendRequestBody>,
) -> Result<(StatusCode, Json<FriendshipResponse>), ApiError> {
    let friendship = FriendshipService::new(state.db_pool.clone())
        .request_friend(&auth.actor(), body.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(friendship.into())))
}

/// POST /api/friends/requests/{id}/accept
pub async fn accept_request(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<FriendshipResponse>, ApiError> {
    let id = parse_id::<FriendshipId>(&id, "friend request")?;
    let friendship = FriendshipService::new(state.db_pool.clone())
        .accept_request(&auth.actor(), id)
        .await?;
    Ok(Json(friendship.into()))
}

/// DELETE /api/friends/requests/{id}
pub async fn reject_request(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id::<FriendshipId>(&id, "friend request")?;
    FriendshipService::new(state.db_pool.clone())
        .reject_request(&auth.actor(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/friends/{user_id}
pub async fn remove_friend(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_id::<UserId>(&user_id, "friendship")?;
    FriendshipService::new(state.db_pool.clone())
        .remove_friend(&auth.actor(), user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/friends/{user_id}/block
pub async fn block_user(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_id::<UserId>(&user_id, "user")?;
    FriendshipService::new(state.db_pool.clone())
        .block_user(&auth.actor(), user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/friends/{user_id}/block
pub async fn unblock_user(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_id::<UserId>(&user_id, "user")?;
    FriendshipService::new(state.db_pool.clone())
        .unblock_user(&auth.actor(), user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypost_authority::GlobalRole;

    fn test_user(display_name: &str) -> User {
        let mut user = User::new(
            format!("sub_{display_name}"),
            "https://auth.example.com".to_string(),
            GlobalRole::User,
        );
        user.set_display_name(Some(display_name.to_string()));
        user
    }

    #[test]
    fn accepted_edge_resolves_to_both_endpoint_profiles() {
        let alice = test_user("alice");
        let bob = test_user("bob");

        let mut edge = Friendship::new_request(alice.id(), bob.id());
        edge.accept();

        let response = FriendResponse::from((edge.clone(), alice.clone(), bob.clone()));

        assert_eq!(response.id, edge.id);
        assert_eq!(response.status, FriendshipStatus::Accepted);
        assert_eq!(response.requester.id, alice.id());
        assert_eq!(response.requester.display_name.as_deref(), Some("alice"));
        assert_eq!(response.recipient.id, bob.id());
        assert_eq!(response.recipient.display_name.as_deref(), Some("bob"));
    }

    #[test]
    fn friend_response_carries_profiles_not_oidc_identity() {
        let alice = test_user("alice");
        let bob = test_user("bob");
        let edge = Friendship::new_request(alice.id(), bob.id());

        let response = FriendResponse::from((edge, alice, bob));
        let json = serde_json::to_value(&response).expect("serialize");

        assert!(json["requester"].get("subject").is_none());
        assert!(json["recipient"].get("issuer").is_none());
    }
}
