//! Comment domain type.

use crate::error::TripValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waypost_core::{CommentId, StepId, UserId};

/// A comment on an itinerary step.
///
/// Comments are authored directly by users, unlike steps: anyone who can
/// see the trip may comment, member or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier.
    id: CommentId,
    /// The step this comment is attached to.
    step_id: StepId,
    /// The commenting user.
    user_id: UserId,
    /// Comment text.
    body: String,
    /// When the comment was created.
    created_at: DateTime<Utc>,
    /// When the comment was last updated.
    updated_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment.
    ///
    /// # Errors
    ///
    /// Fails if the body is empty or whitespace.
    pub fn new(step_id: StepId, user_id: UserId, body: String) -> Result<Self, TripValidationError> {
        if body.trim().is_empty() {
            return Err(TripValidationError::EmptyCommentBody);
        }
        let now = Utc::now();
        Ok(Self {
            id: CommentId::new(),
            step_id,
            user_id,
            body,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a comment with all fields specified.
    ///
    /// Use this when reconstituting a comment from storage.
    #[must_use]
    pub fn with_all_fields(
        id: CommentId,
        step_id: StepId,
        user_id: UserId,
        body: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            step_id,
            user_id,
            body,
            created_at,
            updated_at,
        }
    }

    /// Returns the comment's ID.
    #[must_use]
    pub fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the step this comment is attached to.
    #[must_use]
    pub fn step_id(&self) -> StepId {
        self.step_id
    }

    /// Returns the commenting user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the comment text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns when the comment was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the comment was last updated.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Edits the comment text.
    ///
    /// # Errors
    ///
    /// Fails if the body is empty or whitespace.
    pub fn set_body(&mut self, body: String) -> Result<(), TripValidationError> {
        if body.trim().is_empty() {
            return Err(TripValidationError::EmptyCommentBody);
        }
        self.body = body;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_comment_has_generated_id() {
        let comment = Comment::new(StepId::new(), UserId::new(), "Looks great!".to_string())
            .expect("valid");
        assert!(comment.id().to_string().starts_with("cmt_"));
        assert_eq!(comment.body(), "Looks great!");
    }

    #[test]
    fn empty_body_is_rejected() {
        let result = Comment::new(StepId::new(), UserId::new(), "\n\t".to_string());
        assert_eq!(result.unwrap_err(), TripValidationError::EmptyCommentBody);
    }

    #[test]
    fn edit_validates_and_bumps_timestamp() {
        let mut comment =
            Comment::new(StepId::new(), UserId::new(), "First".to_string()).expect("valid");
        let before = comment.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(1));
        comment.set_body("Edited".to_string()).expect("valid body");

        assert_eq!(comment.body(), "Edited");
        assert!(comment.updated_at() > before);
    }

    #[test]
    fn comment_serialization_roundtrip() {
        let comment =
            Comment::new(StepId::new(), UserId::new(), "Nice".to_string()).expect("valid");
        let json = serde_json::to_string(&comment).expect("serialize");
        let parsed: Comment = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(comment, parsed);
    }
}
