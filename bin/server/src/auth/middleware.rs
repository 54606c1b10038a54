//! Authentication extractors for Axum.
//!
//! This is a JSON API, so unauthenticated requests get 401 rather than a
//! redirect to the login page.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::json;
use std::sync::Arc;
use waypost_platform_access::{AuthenticatedUser, SessionId};

use super::{
    AppState,
    db::{SessionRepository, UserRepository},
    routes::SESSION_COOKIE,
};

/// Extractor for requiring an authenticated user.
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthRejection::InternalError)?;

        // Get session ID from cookie
        let session_cookie = jar
            .get(SESSION_COOKIE)
            .ok_or(AuthRejection::NotAuthenticated)?;

        let session_id = SessionId::new(session_cookie.value().to_string());

        // Look up session in database
        let session_repo = SessionRepository::new(app_state.db_pool.clone());
        let session = session_repo
            .find_by_id(&session_id)
            .await
            .map_err(|_| AuthRejection::InternalError)?
            .ok_or(AuthRejection::NotAuthenticated)?;

        // Check if session is expired
        if session.is_expired() {
            // Delete the expired session
            let _ = session_repo.delete(&session_id).await;
            return Err(AuthRejection::SessionExpired);
        }

        // Load user from database
        let user_repo = UserRepository::new(app_state.db_pool.clone());
        let user = user_repo
            .find_by_id(session.user_id())
            .await
            .map_err(|_| AuthRejection::InternalError)?
            .ok_or(AuthRejection::NotAuthenticated)?;

        // Deactivated accounts keep their rows but lose all access
        if !user.is_active() {
            return Err(AuthRejection::AccountDeactivated);
        }

        Ok(RequireAuth(AuthenticatedUser::new(session, user)))
    }
}

/// Rejection type for authentication extractors.
#[derive(Debug)]
pub enum AuthRejection {
    NotAuthenticated,
    SessionExpired,
    AccountDeactivated,
    InternalError,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotAuthenticated => (StatusCode::UNAUTHORIZED, "not authenticated"),
            Self::SessionExpired => (StatusCode::UNAUTHORIZED, "session expired"),
            Self::AccountDeactivated => (StatusCode::FORBIDDEN, "account is deactivated"),
            Self::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
