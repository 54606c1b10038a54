//! Repository for step comments.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use waypost_core::{CommentId, StepId, UserId};
use waypost_trips::Comment;

use crate::auth::db::decode_err;

/// Row type for comment queries.
#[derive(FromRow)]
struct CommentRow {
    id: String,
    step_id: String,
    user_id: String,
    body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CommentRow {
    fn try_into_comment(self) -> Result<Comment, sqlx::Error> {
        let id =
            CommentId::from_str(&self.id).map_err(|e| decode_err("comment id", &self.id, e))?;
        let step_id =
            StepId::from_str(&self.step_id).map_err(|e| decode_err("step id", &self.step_id, e))?;
        let user_id =
            UserId::from_str(&self.user_id).map_err(|e| decode_err("user id", &self.user_id, e))?;

        Ok(Comment::with_all_fields(
            id,
            step_id,
            user_id,
            self.body,
            self.created_at,
            self.updated_at,
        ))
    }
}

/// Repository for comment operations.
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Creates a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new comment.
    pub async fn create(&self, comment: &Comment) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, step_id, user_id, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id().to_string())
        .bind(comment.step_id().to_string())
        .bind(comment.user_id().to_string())
        .bind(comment.body())
        .bind(comment.created_at())
        .bind(comment.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Finds a comment by ID.
    pub async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, sqlx::Error> {
        let row: Option<CommentRow> = sqlx::query_as(
            r#"
            SELECT id, step_id, user_id, body, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_comment()?)),
            None => Ok(None),
        }
    }

    /// Lists a step's comments, oldest first.
    pub async fn list_for_step(&self, step_id: StepId) -> Result<Vec<Comment>, sqlx::Error> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            r#"
            SELECT id, step_id, user_id, body, created_at, updated_at
            FROM comments
            WHERE step_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(step_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into_comment()).collect()
    }

    /// Deletes a comment.
    pub async fn delete(&self, id: CommentId) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
