//! Friendship operations: request, accept, reject, remove, block, unblock.

use sqlx::PgPool;
use waypost_authority::{Actor, BlockAction, Friendship, decide};
use waypost_core::{FriendshipId, UserId};
use waypost_platform_access::User;

use crate::auth::db::UserRepository;
use crate::db::FriendshipRepository;
use crate::error::ApiError;
use crate::services::map_insert_err;

/// Service for friendship operations.
pub struct FriendshipService {
    pool: PgPool,
}

impl FriendshipService {
    /// Creates a new friendship service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> FriendshipRepository {
        FriendshipRepository::new(self.pool.clone())
    }

    async fn require_user_exists(&self, user_id: UserId) -> Result<(), ApiError> {
        UserRepository::new(self.pool.clone())
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::NotFound { resource: "user" })?;
        Ok(())
    }

    /// Sends a friend request from `actor` to `target`.
    ///
    /// The insert races against the unordered-pair unique index; a
    /// concurrent duplicate resolves to Conflict.
    pub async fn request_friend(
        &self,
        actor: &Actor,
        target: UserId,
    ) -> Result<Friendship, ApiError> {
        self.require_user_exists(target).await?;

        let repo = self.repo();
        let existing = repo.find_between(actor.id, target).await?;
        decide::request_friend(actor, target, existing.as_ref())?;

        let friendship = Friendship::new_request(actor.id, target);
        repo.create(&friendship)
            .await
            .map_err(|e| map_insert_err(e, "a relationship already exists for this pair"))?;

        tracing::info!(friendship_id = %friendship.id, "friend request sent");
        Ok(friendship)
    }

    /// Accepts a pending request. Only the recipient may.
    pub async fn accept_request(
        &self,
        actor: &Actor,
        friendship_id: FriendshipId,
    ) -> Result<Friendship, ApiError> {
        let repo = self.repo();
        let mut friendship = repo.find_by_id(friendship_id).await?.ok_or(ApiError::NotFound {
            resource: "friend request",
        })?;

        decide::accept_request(actor, &friendship)?;

        friendship.accept();
        repo.update(&friendship).await?;
        Ok(friendship)
    }

    /// Rejects a pending request. Rejection deletes the edge; a new request
    /// may follow later.
    pub async fn reject_request(
        &self,
        actor: &Actor,
        friendship_id: FriendshipId,
    ) -> Result<(), ApiError> {
        let repo = self.repo();
        let friendship = repo.find_by_id(friendship_id).await?.ok_or(ApiError::NotFound {
            resource: "friend request",
        })?;

        decide::reject_request(actor, &friendship)?;

        repo.delete(friendship.id).await?;
        Ok(())
    }

    /// Removes the friendship between `actor` and `other`.
    pub async fn remove_friend(&self, actor: &Actor, other: UserId) -> Result<(), ApiError> {
        let repo = self.repo();
        let friendship = repo
            .find_between(actor.id, other)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "friendship",
            })?;

        decide::remove_friend(actor, &friendship)?;

        repo.delete(friendship.id).await?;
        Ok(())
    }

    /// Blocks `target`, flipping an existing edge or creating a new one.
    pub async fn block_user(&self, actor: &Actor, target: UserId) -> Result<(), ApiError> {
        self.require_user_exists(target).await?;

        let repo = self.repo();
        let existing = repo.find_between(actor.id, target).await?;

        match decide::block_user(actor, target, existing.as_ref())? {
            BlockAction::FlagExisting(_) => {
                // The decision only fires when `existing` is present.
                if let Some(mut edge) = existing {
                    edge.block(actor.id);
                    repo.update(&edge).await?;
                }
            }
            BlockAction::CreateBlocked => {
                let edge = Friendship::new_block(actor.id, target);
                repo.create(&edge)
                    .await
                    .map_err(|e| map_insert_err(e, "a relationship already exists for this pair"))?;
            }
        }

        tracing::info!(target = %target, "user blocked");
        Ok(())
    }

    /// Lifts the actor's block against `target`.
    pub async fn unblock_user(&self, actor: &Actor, target: UserId) -> Result<(), ApiError> {
        let repo = self.repo();
        let existing = repo.find_between(actor.id, target).await?;

        let edge_id = decide::unblock_user(actor, target, existing.as_ref())?;
        repo.delete(edge_id).await?;
        Ok(())
    }

    /// Lists the actor's accepted friendships with both endpoint users
    /// resolved.
    pub async fn list_friends(
        &self,
        actor: &Actor,
    ) -> Result<Vec<(Friendship, User, User)>, ApiError> {
        let edges = self.repo().list_accepted_for(actor.id).await?;
        let users = UserRepository::new(self.pool.clone());

        let mut resolved = Vec::with_capacity(edges.len());
        for edge in edges {
            // Both rows exist while the edge does; the foreign keys cascade.
            let requester = users
                .find_by_id(edge.requester)
                .await?
                .ok_or(ApiError::NotFound { resource: "user" })?;
            let recipient = users
                .find_by_id(edge.recipient)
                .await?
                .ok_or(ApiError::NotFound { resource: "user" })?;
            resolved.push((edge, requester, recipient));
        }
        Ok(resolved)
    }

    /// Lists pending requests the actor has received.
    pub async fn list_pending_requests(&self, actor: &Actor) -> Result<Vec<Friendship>, ApiError> {
        Ok(self.repo().list_pending_received(actor.id).await?)
    }
}
