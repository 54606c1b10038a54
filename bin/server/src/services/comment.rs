//! Comment operations.
//!
//! Anyone who can see a trip may comment on its steps. A comment is deleted
//! by its author or by anyone holding the trip's Update permission.

use sqlx::PgPool;
use waypost_authority::{Actor, AuthorityError, TripAction, decide};
use waypost_core::{CommentId, StepId};
use waypost_trips::{Comment, Step, Trip};

use crate::db::{CommentRepository, StepRepository, TripRepository};
use crate::error::ApiError;
use crate::services::ensure_trip_viewable;

/// Service for comment operations.
pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> CommentRepository {
        CommentRepository::new(self.pool.clone())
    }

    async fn find_step_and_trip(&self, step_id: StepId) -> Result<(Step, Trip), ApiError> {
        let step = StepRepository::new(self.pool.clone())
            .find_by_id(step_id)
            .await?
            .ok_or(ApiError::NotFound { resource: "step" })?;
        let trip = TripRepository::new(self.pool.clone())
            .find_by_id(step.trip_id())
            .await?
            .ok_or(ApiError::NotFound { resource: "trip" })?;
        Ok((step, trip))
    }

    /// Lists a step's comments, enforcing trip visibility.
    pub async fn list_comments(
        &self,
        actor: &Actor,
        step_id: StepId,
    ) -> Result<Vec<Comment>, ApiError> {
        let (step, trip) = self.find_step_and_trip(step_id).await?;
        ensure_trip_viewable(&self.pool, actor, &trip).await?;
        Ok(self.repo().list_for_step(step.id()).await?)
    }

    /// Adds a comment to a step. Commenting rights follow viewing rights.
    pub async fn create_comment(
        &self,
        actor: &Actor,
        step_id: StepId,
        body: String,
    ) -> Result<Comment, ApiError> {
        let (step, trip) = self.find_step_and_trip(step_id).await?;
        ensure_trip_viewable(&self.pool, actor, &trip).await?;

        let comment = Comment::new(step.id(), actor.id, body)?;
        self.repo().create(&comment).await?;
        Ok(comment)
    }

    /// Deletes a comment. Author or trip moderator only.
    pub async fn delete_comment(
        &self,
        actor: &Actor,
        comment_id: CommentId,
    ) -> Result<(), ApiError> {
        let comment = self
            .repo()
            .find_by_id(comment_id)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "comment",
            })?;

        if !actor.is_active {
            return Err(ApiError::Denied(AuthorityError::ActorInactive {
                user_id: actor.id,
            }));
        }

        if comment.user_id() != actor.id {
            let (step, _) = self.find_step_and_trip(comment.step_id()).await?;
            let membership = TripRepository::new(self.pool.clone())
                .find_membership(step.trip_id(), actor.id)
                .await?;

            decide::trip_action(actor, step.trip_id(), membership.as_ref(), TripAction::Update)
                .map_err(|err| match err.kind() {
                    waypost_authority::DenialKind::Forbidden => {
                        ApiError::Denied(AuthorityError::NotCommentAuthor)
                    }
                    _ => ApiError::Denied(err),
                })?;
        }

        self.repo().delete(comment_id).await?;
        Ok(())
    }
}
