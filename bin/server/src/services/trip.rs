//! Trip and membership operations.

use sqlx::PgPool;
use waypost_authority::{
    Actor, AuthorityError, TripAction, TripMembership, TripRole, Visibility, decide,
};
use waypost_core::{TripId, UserId};
use waypost_trips::Trip;

use crate::auth::db::UserRepository;
use crate::db::TripRepository;
use crate::error::ApiError;
use crate::services::{ensure_trip_viewable, map_insert_err};

/// Fields a trip update may change. `None` leaves a field untouched.
#[derive(Debug, Default)]
pub struct TripPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub visibility: Option<Visibility>,
}

/// Service for trip and membership operations.
pub struct TripService {
    pool: PgPool,
}

impl TripService {
    /// Creates a new trip service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> TripRepository {
        TripRepository::new(self.pool.clone())
    }

    async fn find_trip(&self, trip_id: TripId) -> Result<Trip, ApiError> {
        self.repo()
            .find_by_id(trip_id)
            .await?
            .ok_or(ApiError::NotFound { resource: "trip" })
    }

    /// Creates a trip with the actor as its Creator, atomically.
    pub async fn create_trip(
        &self,
        actor: &Actor,
        name: String,
        description: Option<String>,
        visibility: Visibility,
    ) -> Result<Trip, ApiError> {
        // Trip creation has no membership precondition, but a deactivated
        // account still may not write.
        if !actor.is_active {
            return Err(ApiError::Denied(AuthorityError::ActorInactive {
                user_id: actor.id,
            }));
        }

        let mut trip = Trip::new(name, visibility)?;
        trip.set_description(description);

        let creator = TripMembership::creator(trip.id(), actor.id);
        self.repo().create_with_creator(&trip, &creator).await?;

        tracing::info!(trip_id = %trip.id(), "trip created");
        Ok(trip)
    }

    /// Fetches a trip, enforcing its visibility.
    pub async fn get_trip(&self, actor: &Actor, trip_id: TripId) -> Result<Trip, ApiError> {
        let trip = self.find_trip(trip_id).await?;
        ensure_trip_viewable(&self.pool, actor, &trip).await?;
        Ok(trip)
    }

    /// Applies a patch to a trip. Requires the Update permission.
    pub async fn update_trip(
        &self,
        actor: &Actor,
        trip_id: TripId,
        patch: TripPatch,
    ) -> Result<Trip, ApiError> {
        let mut trip = self.find_trip(trip_id).await?;

        let membership = self.repo().find_membership(trip_id, actor.id).await?;
        decide::trip_action(actor, trip_id, membership.as_ref(), TripAction::Update)?;

        if let Some(name) = patch.name {
            trip.set_name(name)?;
        }
        if let Some(description) = patch.description {
            trip.set_description(description);
        }
        if let Some(visibility) = patch.visibility {
            trip.set_visibility(visibility);
        }

        self.repo().update(&trip).await?;
        Ok(trip)
    }

    /// Deletes a trip. Creator only (or a platform admin).
    pub async fn delete_trip(&self, actor: &Actor, trip_id: TripId) -> Result<(), ApiError> {
        self.find_trip(trip_id).await?;

        let membership = self.repo().find_membership(trip_id, actor.id).await?;
        decide::trip_action(actor, trip_id, membership.as_ref(), TripAction::Delete)?;

        self.repo().delete(trip_id).await?;
        tracing::info!(trip_id = %trip_id, "trip deleted");
        Ok(())
    }

    /// Lists a trip's memberships, enforcing trip visibility.
    pub async fn list_members(
        &self,
        actor: &Actor,
        trip_id: TripId,
    ) -> Result<Vec<TripMembership>, ApiError> {
        let trip = self.find_trip(trip_id).await?;
        ensure_trip_viewable(&self.pool, actor, &trip).await?;
        Ok(self.repo().list_members(trip_id).await?)
    }

    /// Adds a member to a trip. Requires the ManageMembers permission.
    pub async fn add_member(
        &self,
        actor: &Actor,
        trip_id: TripId,
        user_id: UserId,
        role: TripRole,
    ) -> Result<TripMembership, ApiError> {
        self.find_trip(trip_id).await?;

        if role == TripRole::Creator {
            return Err(ApiError::Conflict {
                details: "a trip has exactly one creator".to_string(),
            });
        }

        UserRepository::new(self.pool.clone())
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::NotFound { resource: "user" })?;

        let membership = self.repo().find_membership(trip_id, actor.id).await?;
        decide::trip_action(actor, trip_id, membership.as_ref(), TripAction::ManageMembers)?;

        let new_member = TripMembership::new(trip_id, user_id, role);
        self.repo()
            .add_member(&new_member)
            .await
            .map_err(|e| map_insert_err(e, "user is already a member of this trip"))?;

        Ok(new_member)
    }

    /// Changes a member's role. Self-changes are refused regardless of role.
    pub async fn change_member_role(
        &self,
        actor: &Actor,
        trip_id: TripId,
        user_id: UserId,
        role: TripRole,
    ) -> Result<TripMembership, ApiError> {
        self.find_trip(trip_id).await?;

        let repo = self.repo();
        let mut target = repo
            .find_membership(trip_id, user_id)
            .await?
            .ok_or(ApiError::NotFound { resource: "member" })?;

        let actor_membership = repo.find_membership(trip_id, actor.id).await?;
        decide::change_member_role(actor, actor_membership.as_ref(), &target)?;

        // The Creator role is assigned once, at trip creation.
        if target.role == TripRole::Creator || role == TripRole::Creator {
            return Err(ApiError::Conflict {
                details: "the creator role cannot be granted or revoked".to_string(),
            });
        }

        repo.update_member_role(target.id, role).await?;
        target.role = role;
        Ok(target)
    }

    /// Removes a member. A member may leave on their own; removing someone
    /// else requires the ManageMembers permission. The Creator never leaves.
    pub async fn remove_member(
        &self,
        actor: &Actor,
        trip_id: TripId,
        user_id: UserId,
    ) -> Result<(), ApiError> {
        self.find_trip(trip_id).await?;

        let repo = self.repo();
        let target = repo
            .find_membership(trip_id, user_id)
            .await?
            .ok_or(ApiError::NotFound { resource: "member" })?;

        if target.role == TripRole::Creator {
            return Err(ApiError::Conflict {
                details: "the creator cannot be removed from their trip".to_string(),
            });
        }

        if user_id != actor.id {
            let actor_membership = repo.find_membership(trip_id, actor.id).await?;
            decide::trip_action(
                actor,
                trip_id,
                actor_membership.as_ref(),
                TripAction::ManageMembers,
            )?;
        } else if !actor.is_active {
            return Err(ApiError::Denied(AuthorityError::ActorInactive {
                user_id: actor.id,
            }));
        }

        repo.delete_member(target.id).await?;
        Ok(())
    }
}
