//! Comment route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use waypost_core::{CommentId, StepId};
use waypost_trips::Comment;

use crate::auth::{AppState, RequireAuth};
use crate::error::ApiError;
use crate::routes::parse_id;
use crate::services::CommentService;

#[derive(Debug, Deserialize)]
pub struct CreateCommentBody {
    pub body: String,
}

/// GET /api/steps/{id}/comments
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let id = parse_id::<StepId>(&id, "step")?;
    let comments = CommentService::new(state.db_pool.clone())
        .list_comments(&auth.actor(), id)
        .await?;
    Ok(Json(comments))
}

/// POST /api/steps/{id}/comments
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
    Json(body): Json<CreateCommentBody>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let id = parse_id::<StepId>(&id, "step")?;
    let comment = CommentService::new(state.db_pool.clone())
        .create_comment(&auth.actor(), id, body.body)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id::<CommentId>(&id, "comment")?;
    CommentService::new(state.db_pool.clone())
        .delete_comment(&auth.actor(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
